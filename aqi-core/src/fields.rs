//! The WAQI field table: which flattened feed keys are dropped, and what the
//! kept ones are called in a [`CityTable`](crate::table::CityTable).

use std::collections::HashSet;

/// What a field's values are expected to look like once renamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Must read as a number; anything else is left out of the table.
    Numeric,
    Text,
    /// Passed through untouched (e.g. the `[lat, long]` pair).
    Opaque,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAction {
    Drop,
    Rename {
        label: &'static str,
        kind: FieldKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub source: &'static str,
    pub action: FieldAction,
}

const fn dropped(source: &'static str) -> FieldRule {
    FieldRule {
        source,
        action: FieldAction::Drop,
    }
}

const fn renamed(source: &'static str, label: &'static str, kind: FieldKind) -> FieldRule {
    FieldRule {
        source,
        action: FieldAction::Rename { label, kind },
    }
}

pub const AQI: &str = "AQI";
pub const STATION_ID: &str = "Station_id";
pub const STATION_GEO: &str = "Station_lat/long";
pub const DOMINANT_POLLUTANT: &str = "Dominant_pollutant";
pub const TEMPERATURE: &str = "Temperature";
pub const PRESSURE: &str = "Atmospheric_Pressure";
pub const WIND: &str = "Wind";
pub const HUMIDITY: &str = "Relative_Humidity";

/// Rules for the flattened `data` object of a WAQI feed response.
pub const WAQI_FIELDS: &[FieldRule] = &[
    // superseded by friendlier columns, or noisy
    dropped("city_location"),
    dropped("forecast_daily_uvi"),
    dropped("city_name"),
    dropped("attributions"),
    dropped("city_url"),
    dropped("time_v"),
    dropped("debug_sync"),
    dropped("time_tz"),
    dropped("time_iso"),
    // handled by the forecast table
    dropped("forecast_daily_o3"),
    dropped("forecast_daily_pm10"),
    dropped("forecast_daily_pm25"),
    renamed("aqi", AQI, FieldKind::Numeric),
    renamed("idx", STATION_ID, FieldKind::Numeric),
    renamed("dominentpol", DOMINANT_POLLUTANT, FieldKind::Text),
    renamed("city_geo", STATION_GEO, FieldKind::Opaque),
    renamed("time_s", "Local_measurement_time", FieldKind::Text),
    renamed("iaqi_co_v", "Carbon_Monoxide", FieldKind::Numeric),
    renamed("iaqi_h_v", HUMIDITY, FieldKind::Numeric),
    renamed("iaqi_no2_v", "Nitrogen_Dioxide", FieldKind::Numeric),
    renamed("iaqi_o3_v", "Ozone", FieldKind::Numeric),
    renamed("iaqi_p_v", PRESSURE, FieldKind::Numeric),
    renamed("iaqi_pm10_v", "Particulate_Matter_(10µm)", FieldKind::Numeric),
    renamed("iaqi_pm25_v", "Particulate_Matter_(2.5µm)", FieldKind::Numeric),
    renamed("iaqi_so2_v", "Sulphur_Dioxide", FieldKind::Numeric),
    renamed("iaqi_t_v", TEMPERATURE, FieldKind::Numeric),
    renamed("iaqi_w_v", WIND, FieldKind::Numeric),
    renamed("iaqi_dew_v", "Dew", FieldKind::Numeric),
    renamed("iaqi_r_v", "Rain_(precipitation)", FieldKind::Numeric),
];

/// Columns left out of the rendered current-conditions table.
pub const DISPLAY_HIDDEN: &[&str] = &[STATION_ID, "iaqi_wa_v", "iaqi_wg_v"];

/// A field table consumed generically by the assembler.
#[derive(Debug, Clone, Copy)]
pub struct FieldMap {
    rules: &'static [FieldRule],
}

impl Default for FieldMap {
    fn default() -> Self {
        Self::waqi()
    }
}

impl FieldMap {
    pub const fn new(rules: &'static [FieldRule]) -> Self {
        Self { rules }
    }

    pub const fn waqi() -> Self {
        Self::new(WAQI_FIELDS)
    }

    pub fn rule(&self, source: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|r| r.source == source)
    }

    /// Source keys the flattener should skip.
    pub fn excluded(&self) -> HashSet<&'static str> {
        self.rules
            .iter()
            .filter(|r| r.action == FieldAction::Drop)
            .map(|r| r.source)
            .collect()
    }

    /// Output column name and kind for a kept key; `None` if the key is dropped.
    ///
    /// Keys without a rule keep their flattened name and are passed through.
    pub fn target<'a>(&self, source: &'a str) -> Option<(&'a str, FieldKind)> {
        match self.rule(source).map(|r| r.action) {
            Some(FieldAction::Drop) => None,
            Some(FieldAction::Rename { label, kind }) => Some((label, kind)),
            None => Some((source, FieldKind::Opaque)),
        }
    }
}
