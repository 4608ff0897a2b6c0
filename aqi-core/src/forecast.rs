use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::FetchError;

/// Pollutants the feed forecasts daily.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Pollutant {
    Ozone,
    Pm10,
    Pm25,
}

impl Pollutant {
    /// Key under `forecast.daily`, also used as the column prefix.
    pub fn tag(&self) -> &'static str {
        match self {
            Pollutant::Ozone => "o3",
            Pollutant::Pm10 => "pm10",
            Pollutant::Pm25 => "pm25",
        }
    }

    pub const fn all() -> &'static [Pollutant] {
        &[Pollutant::Ozone, Pollutant::Pm10, Pollutant::Pm25]
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One day of a pollutant forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub day: NaiveDate,
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

/// Daily entries for one pollutant, date-ascending, one entry per date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastSeries {
    entries: Vec<ForecastEntry>,
}

impl ForecastSeries {
    /// Sort by date and drop repeated dates, keeping the first one seen.
    pub fn new(entries: impl IntoIterator<Item = ForecastEntry>) -> Self {
        let mut by_day = BTreeMap::new();
        for e in entries {
            by_day.entry(e.day).or_insert(e);
        }

        Self {
            entries: by_day.into_values().collect(),
        }
    }

    pub fn entries(&self) -> &[ForecastEntry] {
        &self.entries
    }

    pub fn get(&self, day: NaiveDate) -> Option<&ForecastEntry> {
        self.entries
            .binary_search_by_key(&day, |e| e.day)
            .ok()
            .map(|i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The three daily series of a feed: (ozone, PM10, PM2.5).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastTriple {
    pub ozone: ForecastSeries,
    pub pm10: ForecastSeries,
    pub pm25: ForecastSeries,
}

impl ForecastTriple {
    pub fn series(&self, pollutant: Pollutant) -> &ForecastSeries {
        match pollutant {
            Pollutant::Ozone => &self.ozone,
            Pollutant::Pm10 => &self.pm10,
            Pollutant::Pm25 => &self.pm25,
        }
    }

    fn series_mut(&mut self, pollutant: Pollutant) -> &mut ForecastSeries {
        match pollutant {
            Pollutant::Ozone => &mut self.ozone,
            Pollutant::Pm10 => &mut self.pm10,
            Pollutant::Pm25 => &mut self.pm25,
        }
    }
}

/// Pull the daily pollutant series out of a feed's `data` object.
///
/// `data.forecast.daily` must exist and be an object. A pollutant missing from
/// it gives an empty series; a pollutant whose entries don't decode fails the
/// whole extraction.
pub fn extract_forecast(data: &Value) -> Result<ForecastTriple, FetchError> {
    let daily = data
        .get("forecast")
        .and_then(|f| f.get("daily"))
        .ok_or_else(|| FetchError::UnexpectedShape("missing data.forecast.daily".to_string()))?;

    let Value::Object(daily) = daily else {
        return Err(FetchError::UnexpectedShape(format!(
            "data.forecast.daily is {}, expected an object",
            json_type(daily)
        )));
    };

    let mut triple = ForecastTriple::default();
    for &pollutant in Pollutant::all() {
        let Some(raw) = daily.get(pollutant.tag()) else {
            log::debug!("No {pollutant} forecast in feed");
            continue;
        };

        let entries: Vec<ForecastEntry> = serde_json::from_value(raw.clone()).map_err(|e| {
            FetchError::UnexpectedShape(format!("data.forecast.daily.{pollutant}: {e}"))
        })?;

        *triple.series_mut(pollutant) = ForecastSeries::new(entries);
    }

    Ok(triple)
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
