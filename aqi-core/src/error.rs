use thiserror::Error;

/// Everything that can go wrong between asking the feed for a city and
/// holding a table ready for display.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Transport-level failure: DNS, connection refused, timeout, unreadable body.
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status.
    #[error("API error: {0}")]
    Api(String),

    /// The payload is missing a substructure we need, or has the wrong type.
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),

    /// A table was produced but lacks a column we need (e.g. no AQI reading).
    #[error("no data: {0}")]
    NoData(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest includes the request URL in its message; the query carries the token.
        FetchError::Network(e.without_url().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_labels_each_kind() {
        assert_eq!(
            FetchError::Api("Unknown station".into()).to_string(),
            "API error: Unknown station"
        );
        assert!(FetchError::NoData("x".into()).to_string().starts_with("no data"));
    }
}
