use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Debug;

use crate::{
    error::FetchError,
    forecast::{ForecastTriple, extract_forecast},
};

pub mod waqi;

pub use waqi::WaqiClient;

/// A decoded feed response.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    /// `status: "ok"`, carrying the nested `data` object.
    Success(Value),
    /// Any other status, with the provider's explanation.
    Failure { status: String, message: String },
}

#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    message: Option<String>,
}

impl RawResponse {
    /// Decode a feed body: `{"status": "...", "data": ...}`.
    pub fn from_body(body: &str) -> Result<Self, FetchError> {
        let envelope: Envelope = serde_json::from_str(body)
            .map_err(|e| FetchError::UnexpectedShape(format!("not a feed response: {e}")))?;

        Ok(Self::from_envelope(envelope))
    }

    /// The `data` object of a successful response.
    pub fn into_data(self) -> Result<Value, FetchError> {
        match self {
            RawResponse::Success(data @ Value::Object(_)) => Ok(data),
            RawResponse::Success(other) => Err(FetchError::UnexpectedShape(format!(
                "feed data is not an object: {}",
                truncate(&other.to_string())
            ))),
            RawResponse::Failure { status, message } => {
                Err(FetchError::Api(format!("{status}: {message}")))
            }
        }
    }

    fn from_envelope(e: Envelope) -> Self {
        if e.status == "ok" {
            return RawResponse::Success(e.data);
        }

        // WAQI puts the error text in `data`; some gateways use `message`.
        let message = match (e.message, e.data) {
            (Some(m), _) => m,
            (None, Value::String(s)) => s,
            (None, Value::Null) => "no message".to_string(),
            (None, other) => truncate(&other.to_string()),
        };

        RawResponse::Failure {
            status: e.status,
            message,
        }
    }
}

/// Where city feeds come from.
///
/// Implementors only provide [`feed`](FeedSource::feed); the current
/// conditions and forecast fetchers are built on top of it and perform
/// exactly one request each, without retrying.
#[async_trait]
pub trait FeedSource: Send + Sync + Debug {
    async fn feed(&self, location_id: &str) -> Result<RawResponse, FetchError>;

    /// The `data` object of the city's feed.
    async fn fetch_current(&self, location_id: &str) -> Result<Value, FetchError> {
        self.feed(location_id).await?.into_data()
    }

    /// The (ozone, PM10, PM2.5) daily forecast of the city's feed.
    async fn fetch_forecast(&self, location_id: &str) -> Result<ForecastTriple, FetchError> {
        let data = self.fetch_current(location_id).await?;
        extract_forecast(&data)
    }
}

pub(crate) fn truncate(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    /// Serves canned feed bodies per city; unknown cities fail like a dead host.
    #[derive(Debug, Default)]
    pub(crate) struct StubSource {
        bodies: HashMap<String, String>,
    }

    impl StubSource {
        pub(crate) fn with(mut self, city: &str, body: Value) -> Self {
            self.bodies.insert(city.to_string(), body.to_string());
            self
        }
    }

    #[async_trait]
    impl FeedSource for StubSource {
        async fn feed(&self, location_id: &str) -> Result<RawResponse, FetchError> {
            let body = self
                .bodies
                .get(location_id)
                .ok_or_else(|| FetchError::Network("connection refused".to_string()))?;
            RawResponse::from_body(body)
        }
    }

    #[test]
    fn decodes_ok_envelope() {
        let raw = RawResponse::from_body(r#"{"status":"ok","data":{"aqi":42}}"#).unwrap();
        assert_eq!(raw.into_data().unwrap(), json!({"aqi": 42}));
    }

    #[test]
    fn error_status_becomes_api_error() {
        let raw = RawResponse::from_body(r#"{"status":"error","data":"Unknown station"}"#).unwrap();

        assert_eq!(
            raw.clone(),
            RawResponse::Failure {
                status: "error".into(),
                message: "Unknown station".into()
            }
        );
        assert_eq!(
            raw.into_data().unwrap_err(),
            FetchError::Api("error: Unknown station".into())
        );
    }

    #[test]
    fn message_field_is_preferred() {
        let raw =
            RawResponse::from_body(r#"{"status":"error","message":"Invalid key"}"#).unwrap();
        assert!(
            matches!(raw, RawResponse::Failure { ref message, .. } if message == "Invalid key")
        );
    }

    #[test]
    fn garbage_body_is_unexpected_shape() {
        assert!(matches!(
            RawResponse::from_body("<html>502</html>"),
            Err(FetchError::UnexpectedShape(_))
        ));
    }

    #[test]
    fn non_object_data_is_unexpected_shape() {
        let raw = RawResponse::from_body(r#"{"status":"ok","data":[1,2]}"#).unwrap();
        assert!(matches!(raw.into_data(), Err(FetchError::UnexpectedShape(_))));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let long = "µ".repeat(300);
        let cut = truncate(&long);

        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
        assert_eq!(truncate("short"), "short");
    }

    #[tokio::test]
    async fn fetch_current_returns_data() {
        let source =
            StubSource::default().with("Lublin", json!({"status": "ok", "data": {"aqi": 7}}));

        let data = source.fetch_current("Lublin").await.unwrap();
        assert_eq!(data["aqi"], json!(7));
    }

    #[tokio::test]
    async fn fetch_current_surfaces_network_error() {
        let err = StubSource::default().fetch_current("Nowhere").await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }

    #[tokio::test]
    async fn fetch_forecast_rejects_list_daily() {
        let source = StubSource::default().with(
            "Kielce",
            json!({"status": "ok", "data": {"aqi": 7, "forecast": {"daily": []}}}),
        );

        let err = source.fetch_forecast("Kielce").await.unwrap_err();
        assert!(matches!(err, FetchError::UnexpectedShape(_)));
    }

    #[tokio::test]
    async fn fetch_forecast_extracts_series() {
        let source = StubSource::default().with(
            "Kielce",
            json!({"status": "ok", "data": {"forecast": {"daily": {
                "pm10": [{"avg": 20, "day": "2024-03-01", "max": 30, "min": 11}]
            }}}}),
        );

        let triple = source.fetch_forecast("Kielce").await.unwrap();
        assert_eq!(triple.pm10.len(), 1);
        assert!(triple.ozone.is_empty());
    }
}
