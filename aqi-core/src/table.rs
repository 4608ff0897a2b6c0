//! Tabular views over a feed: the current-conditions row of a city and its
//! date-indexed pollutant forecast.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

use crate::{
    error::FetchError,
    fields::{self, FieldKind, FieldMap},
    flatten::flatten,
    forecast::{ForecastEntry, ForecastTriple, Pollutant},
};

/// Current conditions for one city: a single row keyed by the city id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityTable {
    city: String,
    row: Map<String, Value>,
}

impl CityTable {
    /// The row key, exactly as it was queried.
    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn row_count(&self) -> usize {
        1
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.row.keys().map(String::as_str)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.row.contains_key(column)
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.row.get(column)
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(Value::as_f64)
    }

    pub fn cells(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.row.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The overall AQI; `NoData` when the feed gave no usable reading.
    pub fn aqi(&self) -> Result<f64, FetchError> {
        self.number(fields::AQI)
            .ok_or_else(|| FetchError::NoData(format!("no AQI reading for {}", self.city)))
    }

    /// Station `(latitude, longitude)`, from either a `[lat, long]` list or a
    /// `"lat,long"` string.
    pub fn station_coordinates(&self) -> Option<(f64, f64)> {
        match self.get(fields::STATION_GEO)? {
            Value::Array(pair) => match pair.as_slice() {
                [lat, long] => Some((lat.as_f64()?, long.as_f64()?)),
                _ => None,
            },
            Value::String(s) => {
                let (lat, long) = s.split_once(',')?;
                Some((lat.trim().parse().ok()?, long.trim().parse().ok()?))
            }
            _ => None,
        }
    }

    /// A copy without the given columns; names that aren't present are ignored.
    pub fn without_columns(&self, columns: &[&str]) -> Self {
        let row = self
            .row
            .iter()
            .filter(|(k, _)| !columns.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Self {
            city: self.city.clone(),
            row,
        }
    }
}

/// Build the current-conditions table for `location_id` from a feed's `data`
/// object.
///
/// Numeric fields whose value can't be read as a number (the feed sends
/// `"-"` when a station has no reading) are left out rather than zeroed.
pub fn assemble_current(
    location_id: &str,
    data: &Value,
    field_map: &FieldMap,
) -> Result<CityTable, FetchError> {
    if location_id.is_empty() {
        return Err(FetchError::NoData("empty city name".to_string()));
    }

    let flat = flatten(data, &field_map.excluded());

    let mut row = Map::new();
    for (key, value) in flat {
        let Some((label, kind)) = field_map.target(&key) else {
            continue;
        };

        let value = match kind {
            FieldKind::Numeric => match as_number(&value) {
                Some(n) => n,
                None => {
                    log::debug!("Dropping non-numeric {label} ({value}) for {location_id}");
                    continue;
                }
            },
            FieldKind::Text | FieldKind::Opaque => value,
        };

        row.insert(label.to_string(), value);
    }

    log::info!("Assembled {} columns for {location_id}", row.len());

    Ok(CityTable {
        city: location_id.to_string(),
        row,
    })
}

fn as_number(value: &Value) -> Option<Value> {
    match value {
        Value::Number(_) => Some(value.clone()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                Some(Value::from(i))
            } else {
                s.parse::<f64>().ok().and_then(Number::from_f64).map(Value::Number)
            }
        }
        _ => None,
    }
}

/// Daily reading columns for each pollutant, after the pollutant tag prefix.
const READING_COLUMNS: [&str; 3] = ["avg", "min", "max"];

/// Name of the row-key column of a [`ForecastTable`].
pub const DATE_COLUMN: &str = "Date";

/// One forecast row: a reading per pollutant, any of which may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastRow {
    pub ozone: Option<ForecastEntry>,
    pub pm10: Option<ForecastEntry>,
    pub pm25: Option<ForecastEntry>,
}

impl ForecastRow {
    pub fn reading(&self, pollutant: Pollutant) -> Option<&ForecastEntry> {
        match pollutant {
            Pollutant::Ozone => self.ozone.as_ref(),
            Pollutant::Pm10 => self.pm10.as_ref(),
            Pollutant::Pm25 => self.pm25.as_ref(),
        }
    }

    fn slot(&mut self, pollutant: Pollutant) -> &mut Option<ForecastEntry> {
        match pollutant {
            Pollutant::Ozone => &mut self.ozone,
            Pollutant::Pm10 => &mut self.pm10,
            Pollutant::Pm25 => &mut self.pm25,
        }
    }
}

/// Pollutant forecast for one city, keyed by date ascending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastTable {
    city: String,
    rows: BTreeMap<NaiveDate, ForecastRow>,
}

impl ForecastTable {
    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.keys().copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = (NaiveDate, &ForecastRow)> {
        self.rows.iter().map(|(d, r)| (*d, r))
    }

    pub fn row(&self, date: NaiveDate) -> Option<&ForecastRow> {
        self.rows.get(&date)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value columns, pollutant-prefixed: `o3_avg`, `o3_min`, ..., `pm25_max`.
    pub fn columns() -> Vec<String> {
        Pollutant::all()
            .iter()
            .flat_map(|p| READING_COLUMNS.iter().map(move |c| format!("{}_{c}", p.tag())))
            .collect()
    }

    /// Cell lookup by prefixed column name.
    pub fn value(&self, date: NaiveDate, column: &str) -> Option<f64> {
        let (tag, field) = column.split_once('_')?;
        let pollutant = Pollutant::all().iter().find(|p| p.tag() == tag)?;
        let entry = self.row(date)?.reading(*pollutant)?;

        match field {
            "avg" => Some(entry.avg),
            "min" => Some(entry.min),
            "max" => Some(entry.max),
            _ => None,
        }
    }
}

/// Join the three series of `triple` on date into one table for `location_id`.
///
/// Dates present in only some series give rows with the other readings empty.
pub fn assemble_forecast(location_id: &str, triple: &ForecastTriple) -> ForecastTable {
    let mut rows: BTreeMap<NaiveDate, ForecastRow> = BTreeMap::new();

    for &pollutant in Pollutant::all() {
        for entry in triple.series(pollutant).entries() {
            *rows.entry(entry.day).or_default().slot(pollutant) = Some(*entry);
        }
    }

    ForecastTable {
        city: location_id.to_string(),
        rows,
    }
}
