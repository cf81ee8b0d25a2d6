use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// Public v3 endpoint of the Quandl / Nasdaq Data Link time-series API.
pub const DEFAULT_BASE_URL: &str = "https://data.nasdaq.com/api/v3/";

/// Environment variable read by [`QuandlConfig::from_env`].
pub const API_KEY_ENV: &str = "QUANDL_API_KEY";

/// Explicit provider configuration, passed to the connector at construction.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuandlConfig {
    /// API key sent as `api_key`. Anonymous access is rate limited upstream.
    pub api_key: Option<String>,
    /// Root of the v3 API; dataset paths are joined onto it.
    pub base_url: Url,
    /// Ask the API for `collapse=daily` so the series is at most daily.
    pub collapse_daily: bool,
}

impl Default for QuandlConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is an absolute URL"),
            collapse_daily: true,
        }
    }
}

impl QuandlConfig {
    /// Default configuration with the API key taken from `QUANDL_API_KEY`, if set.
    ///
    /// Intended for binaries; the connector itself never reads the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()),
            ..Self::default()
        }
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Point at a different API root (e.g. a local mock server).
    ///
    /// A trailing slash is added when missing so dataset paths join below it.
    #[must_use]
    pub fn with_base_url(mut self, url: Url) -> Self {
        self.base_url = with_trailing_slash(url);
        self
    }
}

/// Append `/` to the path of `url` unless it already ends with one.
pub(crate) fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

impl fmt::Debug for QuandlConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuandlConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url.as_str())
            .field("collapse_daily", &self.collapse_daily)
            .finish()
    }
}
