use anyhow::{Context, Result, anyhow, ensure};
use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::PathBuf, time::Duration};

use crate::provider::{WaqiClient, waqi::DEFAULT_BASE_URL};

/// Environment variable that overrides the configured API token.
pub const TOKEN_ENV: &str = "AQI_API_TOKEN";
/// Environment variable that overrides the configured feed base URL.
pub const BASE_URL_ENV: &str = "AQI_BASE_URL";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_token = "..."
/// default_city = "Poznan"
/// request_timeout_secs = 20
/// ```
#[derive(Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// WAQI API token. Prefer the `AQI_API_TOKEN` environment variable.
    pub api_token: Option<String>,

    /// Feed API base URL; defaults to the public WAQI endpoint.
    pub base_url: Option<String>,

    /// City shown by `aqi show` when none is given.
    pub default_city: Option<String>,

    /// Request timeout; the HTTP client's default when unset.
    pub request_timeout_secs: Option<u64>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("default_city", &self.default_city)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "aqi-world", "aqi-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply `AQI_API_TOKEN` / `AQI_BASE_URL` from the process environment.
    pub fn with_env(self) -> Self {
        self.with_overrides(
            std::env::var(TOKEN_ENV).ok(),
            std::env::var(BASE_URL_ENV).ok(),
        )
    }

    /// Non-empty overrides win over values from the file.
    pub fn with_overrides(mut self, token: Option<String>, base_url: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.api_token = Some(token);
        }
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = Some(url);
        }
        self
    }

    pub fn set_api_token(&mut self, token: String) {
        self.api_token = Some(token);
    }

    pub fn api_token(&self) -> Result<&str> {
        self.api_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No API token configured.\n\
                     Hint: set {TOKEN_ENV} or run `aqi configure` and enter your WAQI token."
                )
            })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// The base URL, parsed and checked before any client is built.
    pub fn feed_base_url(&self) -> Result<Url> {
        let raw = self.base_url();
        let hint = format!("Hint: fix `base_url` in the config file or unset {BASE_URL_ENV}.");

        let url =
            Url::parse(raw).with_context(|| format!("Invalid base URL '{raw}'.\n{hint}"))?;
        ensure!(!url.cannot_be_a_base(), "Base URL '{raw}' cannot hold a path.\n{hint}");

        Ok(url)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn is_configured(&self) -> bool {
        self.api_token().is_ok()
    }

    /// Build the feed client described by this config.
    pub fn client(&self) -> Result<WaqiClient> {
        let token = self.api_token()?;
        let base_url = self.feed_base_url()?;

        WaqiClient::with_timeout(base_url, token.to_owned(), self.request_timeout())
            .with_context(|| format!("Failed to create WAQI client for {}", self.base_url()))
    }
}
