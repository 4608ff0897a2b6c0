use serde::Serialize;

use crate::{
    advisory::{Advisory, classify},
    error::FetchError,
    fields::FieldMap,
    provider::FeedSource,
    table::{CityTable, ForecastTable, assemble_current, assemble_forecast},
};

/// Everything shown for one city after a single fetch cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityReport {
    pub current: CityTable,
    pub aqi: f64,
    pub advisory: Advisory,
    /// `None` when the feed carried no usable forecast.
    pub forecast: Option<ForecastTable>,
}

/// Fetch, reshape and classify the air quality of `location_id`.
///
/// Failures of the current-conditions request (or a missing AQI) are
/// returned. A failed forecast is only logged: the report is still useful
/// without it.
pub async fn city_report(
    source: &dyn FeedSource,
    location_id: &str,
) -> Result<CityReport, FetchError> {
    let data = source.fetch_current(location_id).await?;
    let current = assemble_current(location_id, &data, &FieldMap::waqi())?;

    let aqi = current.aqi()?;
    let advisory = classify(aqi);
    log::info!("{location_id}: AQI {aqi} ({})", advisory.category);

    let forecast = match source.fetch_forecast(location_id).await {
        Ok(triple) => Some(assemble_forecast(location_id, &triple)),
        Err(e) => {
            log::warn!("No forecast for {location_id}: {e}");
            None
        }
    };

    Ok(CityReport {
        current,
        aqi,
        advisory,
        forecast,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{advisory::AqiCategory, provider::tests::StubSource};
    use serde_json::json;

    fn feed(daily: serde_json::Value) -> serde_json::Value {
        json!({"status": "ok", "data": {
            "aqi": 63,
            "idx": 8041,
            "dominentpol": "pm25",
            "city": {"geo": [52.4, 16.9], "name": "Poznan, Poland"},
            "iaqi": {"pm25": {"v": 63}, "t": {"v": 4.2}},
            "forecast": {"daily": daily}
        }})
    }

    #[tokio::test]
    async fn full_report_for_city() {
        let source = StubSource::default().with(
            "Poznan",
            feed(json!({"o3": [{"avg": 10, "day": "2024-03-02", "max": 12, "min": 8}]})),
        );

        let report = city_report(&source, "Poznan").await.unwrap();

        assert_eq!(report.current.city(), "Poznan");
        assert_eq!(report.aqi, 63.0);
        assert_eq!(report.advisory.category, AqiCategory::Moderate);
        assert_eq!(report.forecast.map(|f| f.len()), Some(1));
    }

    #[tokio::test]
    async fn bad_forecast_keeps_current_conditions() {
        let source = StubSource::default().with("Poznan", feed(json!("unavailable")));

        let report = city_report(&source, "Poznan").await.unwrap();

        assert!(report.forecast.is_none());
        assert_eq!(report.current.number("Temperature"), Some(4.2));
    }

    #[tokio::test]
    async fn missing_aqi_is_no_data() {
        let source = StubSource::default()
            .with("Opole", json!({"status": "ok", "data": {"aqi": "-", "idx": 1}}));

        let err = city_report(&source, "Opole").await.unwrap_err();
        assert!(matches!(err, FetchError::NoData(_)));
    }

    #[tokio::test]
    async fn api_error_is_returned() {
        let source = StubSource::default()
            .with("Atlantis", json!({"status": "error", "data": "Unknown station"}));

        let err = city_report(&source, "Atlantis").await.unwrap_err();
        assert_eq!(err, FetchError::Api("error: Unknown station".into()));
    }

    #[tokio::test]
    async fn failed_city_does_not_affect_next_one() {
        let source = StubSource::default().with("Poznan", feed(json!({})));

        assert!(city_report(&source, "Nowhere").await.is_err());
        assert!(city_report(&source, "Poznan").await.is_ok());
    }
}
