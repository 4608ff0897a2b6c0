//! Plain-text rendering of a [`CityReport`].

use aqi_core::{
    CityReport, CityTable, ForecastTable,
    fields::{self, DISPLAY_HIDDEN},
    table::DATE_COLUMN,
};
use chrono::{DateTime, Local};
use serde_json::Value;

const MISSING: &str = "-";

pub fn render_report(report: &CityReport, fetched_at: DateTime<Local>) -> String {
    let city = report.current.city();
    let advisory = &report.advisory;

    let mut out = format!(
        "Air quality in {city} (fetched {})\n",
        fetched_at.format("%Y-%m-%d %H:%M")
    );
    out.push_str(&format!(
        "[{}] AQI {}: {}\n",
        advisory.color,
        format_number(report.aqi),
        advisory.category
    ));
    out.push_str(advisory.message);
    out.push_str("\n\n");

    out.push_str(&render_current(&report.current.without_columns(DISPLAY_HIDDEN)));
    out.push('\n');

    // The marker needs coordinates, and hidden columns are still wanted in it.
    if let Some(marker) = render_marker(&report.current) {
        out.push_str(&marker);
        out.push('\n');
    }

    match &report.forecast {
        Some(forecast) if !forecast.is_empty() => out.push_str(&render_forecast(forecast)),
        _ => out.push_str("No forecast available.\n"),
    }

    out
}

/// One `column: value` line per cell, labels padded to a common width.
pub fn render_current(table: &CityTable) -> String {
    let width = table.columns().map(|c| c.chars().count()).max().unwrap_or(0);

    let mut out = format!("Current conditions ({})\n", table.city());
    for (column, value) in table.cells() {
        let pad = width - column.chars().count();
        out.push_str(&format!("  {column}{:pad$} : {}\n", "", format_value(value)));
    }
    out
}

/// Station marker summary: where it is and what it reads.
pub fn render_marker(table: &CityTable) -> Option<String> {
    let (lat, long) = table.station_coordinates()?;

    let cell = |column: &str| {
        table
            .get(column)
            .map(format_value)
            .unwrap_or_else(|| MISSING.to_string())
    };

    let mut out = format!("Station marker at {lat:.4}, {long:.4}\n  {}\n", table.city());
    for (label, column) in [
        ("AQI", fields::AQI),
        ("Temperature", fields::TEMPERATURE),
        ("Pressure", fields::PRESSURE),
        ("Wind", fields::WIND),
        ("Humidity", fields::HUMIDITY),
        ("Dominant pollutant", fields::DOMINANT_POLLUTANT),
    ] {
        out.push_str(&format!("  {label}: {}\n", cell(column)));
    }
    Some(out)
}

pub fn render_forecast(table: &ForecastTable) -> String {
    const WIDTH: usize = 9;
    let columns = ForecastTable::columns();

    let mut out = format!("Pollutant forecast ({})\n{:<10}", table.city(), DATE_COLUMN);
    for column in &columns {
        out.push_str(&format!(" {column:>width$}", width = WIDTH));
    }
    out.push('\n');

    for date in table.dates() {
        out.push_str(&date.format("%Y-%m-%d").to_string());
        for column in &columns {
            let cell = table
                .value(date, column)
                .map(format_number)
                .unwrap_or_else(|| MISSING.to_string());
            out.push_str(&format!(" {cell:>width$}", width = WIDTH));
        }
        out.push('\n');
    }
    out
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => MISSING.to_string(),
        Value::Number(n) => n.as_f64().map(format_number).unwrap_or_else(|| n.to_string()),
        other => other.to_string(),
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{n:.0}")
    } else {
        format!("{n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqi_core::{
        FieldMap, ForecastEntry, ForecastSeries, ForecastTriple, assemble_current,
        assemble_forecast, classify,
    };
    use chrono::{NaiveDate, TimeZone};
    use serde_json::json;

    fn table() -> CityTable {
        let data = json!({
            "aqi": 42,
            "idx": 123,
            "dominentpol": "pm25",
            "city": {"geo": [52.4, 16.9]},
            "iaqi": {"pm25": {"v": 10}, "t": {"v": 3.5}, "wg": {"v": 8}}
        });
        assemble_current("Poznan", &data, &FieldMap::waqi()).unwrap()
    }

    fn forecast() -> ForecastTable {
        let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
        let triple = ForecastTriple {
            ozone: ForecastSeries::new([ForecastEntry {
                day: day(1),
                avg: 10.0,
                min: 8.0,
                max: 12.0,
            }]),
            pm10: ForecastSeries::default(),
            pm25: ForecastSeries::new([ForecastEntry {
                day: day(2),
                avg: 55.5,
                min: 40.0,
                max: 70.0,
            }]),
        };
        assemble_forecast("Poznan", &triple)
    }

    #[test]
    fn current_lists_cells() {
        let text = render_current(&table());

        assert!(text.starts_with("Current conditions (Poznan)"));
        assert!(text.contains("Particulate_Matter_(2.5µm) : 10"));
        assert!(text.contains("Station_lat/long"));
    }

    #[test]
    fn marker_shows_missing_values_as_dash() {
        let text = render_marker(&table()).unwrap();

        assert!(text.starts_with("Station marker at 52.4000, 16.9000"));
        assert!(text.contains("AQI: 42"));
        assert!(text.contains("Temperature: 3.5"));
        assert!(text.contains("Wind: -"));
        assert!(text.contains("Dominant pollutant: pm25"));
    }

    #[test]
    fn marker_needs_coordinates() {
        let t = assemble_current("Lodz", &json!({"aqi": 1}), &FieldMap::waqi()).unwrap();
        assert!(render_marker(&t).is_none());
    }

    #[test]
    fn forecast_has_date_header_and_gaps() {
        let text = render_forecast(&forecast());
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("Date"));
        assert!(lines[1].contains("pm25_max"));
        assert!(lines[2].starts_with("2024-03-01"));
        assert!(lines[3].starts_with("2024-03-02"));
        assert!(lines[3].contains("55.5"));
        assert!(lines[3].contains(" -"));
    }

    #[test]
    fn report_hides_station_id_and_names_color() {
        let report = CityReport {
            current: table(),
            aqi: 42.0,
            advisory: classify(42.0),
            forecast: Some(forecast()),
        };
        let at = Local.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();

        let text = render_report(&report, at);

        assert!(text.contains("Air quality in Poznan (fetched 2024-03-01 12:30)"));
        assert!(text.contains("[lightgreen] AQI 42: Good"));
        assert!(!text.contains("Station_id"));
        assert!(!text.contains("iaqi_wg_v"));
        assert!(text.contains("Pollutant forecast (Poznan)"));
    }

    #[test]
    fn report_sections_follow_each_other() {
        let report = CityReport {
            current: table(),
            aqi: 42.0,
            advisory: classify(42.0),
            forecast: Some(forecast()),
        };
        let at = Local.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();

        let text = render_report(&report, at);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "Air quality in Poznan (fetched 2024-03-01 12:30)");
        assert_eq!(lines[1], "[lightgreen] AQI 42: Good");
        assert_eq!(lines[2], report.advisory.message);
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "Current conditions (Poznan)");
        assert!(text.contains("\n\nStation marker at 52.4000, 16.9000\n  Poznan\n  AQI: 42\n"));
        assert!(text.ends_with("\n"));
        assert_eq!(text.matches("2024-03-0").count(), 3);
    }

    #[test]
    fn forecast_columns_line_up() {
        let text = render_forecast(&forecast());
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[1].len(), lines[2].len());
        assert_eq!(lines[2].len(), lines[3].len());
        assert_eq!(&lines[1][..10], "Date      ");
    }

    #[test]
    fn report_without_forecast_says_so() {
        let report = CityReport {
            current: table(),
            aqi: 42.0,
            advisory: classify(42.0),
            forecast: None,
        };
        let at = Local.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();

        assert!(render_report(&report, at).contains("No forecast available."));
    }
}
