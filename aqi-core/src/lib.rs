//! Core library for the `aqi` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The WAQI feed client behind the [`FeedSource`] abstraction
//! - Flattening and field mapping of feed payloads into tables
//! - The AQI advisory classifier
//!
//! It is used by `aqi-cli`, but can also be reused by other binaries or services.

pub mod advisory;
pub mod config;
pub mod error;
pub mod fields;
pub mod flatten;
pub mod forecast;
pub mod provider;
pub mod report;
pub mod table;

pub use advisory::{Advisory, AqiCategory, Color, classify};
pub use config::Config;
pub use error::FetchError;
pub use fields::FieldMap;
pub use flatten::{FlatRecord, flatten, flatten_with};
pub use forecast::{ForecastEntry, ForecastSeries, ForecastTriple, Pollutant};
pub use provider::{FeedSource, RawResponse, WaqiClient};
pub use report::{CityReport, city_report};
pub use table::{CityTable, ForecastTable, assemble_current, assemble_forecast};
