use anyhow::{Context, ensure};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use std::{fmt, time::Duration};

use crate::error::FetchError;

use super::{FeedSource, RawResponse, truncate};

pub const DEFAULT_BASE_URL: &str = "https://api.waqi.info/";

/// HTTP client for the World Air Quality Index feed API.
#[derive(Clone)]
pub struct WaqiClient {
    base_url: Url,
    token: String,
    http: Client,
}

impl fmt::Debug for WaqiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaqiClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"<redacted>")
            .finish()
    }
}

impl WaqiClient {
    pub fn new(base_url: Url, token: String) -> anyhow::Result<Self> {
        Self::with_timeout(base_url, token, None)
    }

    /// Like [`new`](Self::new) but with a request timeout; `None` keeps the
    /// transport default.
    ///
    /// `base_url` must be able to carry path segments (`https://...`, not
    /// `mailto:...`).
    pub fn with_timeout(
        base_url: Url,
        token: String,
        timeout: Option<Duration>,
    ) -> anyhow::Result<Self> {
        ensure!(!base_url.cannot_be_a_base(), "Base URL '{base_url}' cannot hold a path");

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            base_url,
            token,
            http,
        })
    }

    /// `{base}/feed/{location_id}/?token={token}`, the location percent-encoded
    /// as a single path segment.
    ///
    /// Blank ids and the dot-segments `.`/`..` would vanish from the path, so
    /// they are rejected before any request is made.
    pub fn feed_url(&self, location_id: &str) -> Result<Url, FetchError> {
        let trimmed = location_id.trim();
        if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
            return Err(FetchError::NoData(format!("'{location_id}' is not a city name")));
        }

        let mut url = self.base_url.clone();
        // Checked in the constructor: the base URL can hold path segments.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("feed")
                .push(location_id)
                .push("");
        }
        url.query_pairs_mut()
            .clear()
            .append_pair("token", &self.token);

        Ok(url)
    }
}

/// The URL with its query removed, safe to log.
fn redacted(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

/// Map an HTTP reply onto a feed response.
///
/// A non-2xx reply still yields the provider's own error envelope when the
/// body holds one; otherwise the status and body become an `Api` error.
fn response_to_raw(status: StatusCode, body: &str) -> Result<RawResponse, FetchError> {
    if status.is_success() {
        return RawResponse::from_body(body);
    }

    match RawResponse::from_body(body) {
        Ok(raw @ RawResponse::Failure { .. }) => Ok(raw),
        _ => Err(FetchError::Api(format!("HTTP {status}: {}", truncate(body)))),
    }
}

#[async_trait]
impl FeedSource for WaqiClient {
    async fn feed(&self, location_id: &str) -> Result<RawResponse, FetchError> {
        let url = self.feed_url(location_id)?;
        log::debug!("GET {}", redacted(&url));

        let res = self.http.get(url).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            log::warn!("WAQI feed for {location_id} answered {status}");
        }

        response_to_raw(status, &body)
    }
}
