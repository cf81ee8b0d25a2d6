#[cfg(feature = "test-adapters")]
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;

use calmap_core::CalmapError;

use crate::config::{QuandlConfig, with_trailing_slash};
use crate::wire::{DatasetData, DatasetEnvelope, ErrorEnvelope};

const CONNECTOR: &str = "calmap-quandl";

/// Parameters of one `data.json` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetQuery {
    /// First date to return (`start_date`).
    pub start: NaiveDate,
    /// Last date to return (`end_date`).
    pub end: NaiveDate,
    /// Provider-side frequency reduction (`collapse`), e.g. `daily`.
    pub collapse: Option<&'static str>,
    /// Row order (`order`); always `asc` from the connector.
    pub order: &'static str,
}

impl DatasetQuery {
    /// Query-string pairs, without the API key.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut out = vec![
            ("start_date", self.start.format("%Y-%m-%d").to_string()),
            ("end_date", self.end.format("%Y-%m-%d").to_string()),
            ("order", self.order.to_string()),
        ];
        if let Some(c) = self.collapse {
            out.push(("collapse", c.to_string()));
        }
        out
    }
}

/// Dataset abstraction (so we can inject mocks in tests).
#[async_trait]
pub trait QuandlDatasets: Send + Sync {
    /// Fetch the raw table for dataset `code` (e.g. `LBMA/GOLD`).
    async fn fetch(&self, code: &str, query: &DatasetQuery) -> Result<DatasetData, CalmapError>;
}

/// Real adapter backed by a shared `reqwest::Client`.
#[derive(Clone)]
pub struct RealAdapter {
    http: reqwest::Client,
    cfg: QuandlConfig,
}

impl RealAdapter {
    /// Build an HTTP client for the given configuration.
    ///
    /// # Errors
    /// Returns a connector error if the TLS backend cannot be initialised.
    pub fn new(cfg: QuandlConfig) -> Result<Self, CalmapError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("calmap-quandl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CalmapError::connector(CONNECTOR, e.to_string()))?;
        Ok(Self::with_client(http, cfg))
    }

    /// Wrap an existing `reqwest::Client`.
    ///
    /// The base URL gains a trailing slash when missing, however `cfg` was built.
    #[must_use]
    pub fn with_client(http: reqwest::Client, mut cfg: QuandlConfig) -> Self {
        cfg.base_url = with_trailing_slash(cfg.base_url);
        Self { http, cfg }
    }

    fn dataset_url(&self, code: &str) -> Result<url::Url, CalmapError> {
        let valid = !code.is_empty()
            && code.split('/').all(|part| {
                !part.is_empty()
                    && part
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
                    && part != "."
                    && part != ".."
            });
        if !valid {
            return Err(CalmapError::connector(
                CONNECTOR,
                format!("invalid dataset code '{code}'"),
            ));
        }
        self.cfg
            .base_url
            .join(&format!("datasets/{code}/data.json"))
            .map_err(|e| CalmapError::connector(CONNECTOR, e.to_string()))
    }
}

fn map_status(status: StatusCode, body: &str, code: &str) -> CalmapError {
    let detail = serde_json::from_str::<ErrorEnvelope>(body).map_or_else(
        |_| status.to_string(),
        |e| format!("{} {}", e.quandl_error.code, e.quandl_error.message),
    );
    match status {
        StatusCode::NOT_FOUND => CalmapError::not_found(format!("dataset {code}")),
        StatusCode::TOO_MANY_REQUESTS => {
            CalmapError::connector(CONNECTOR, format!("rate limit: {detail}"))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            CalmapError::connector(CONNECTOR, format!("unauthorized: {detail}"))
        }
        s if s.is_server_error() => {
            CalmapError::connector(CONNECTOR, format!("server error {}: {detail}", s.as_u16()))
        }
        s => CalmapError::connector(CONNECTOR, format!("status {}: {detail}", s.as_u16())),
    }
}

#[async_trait]
impl QuandlDatasets for RealAdapter {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "calmap_quandl::fetch", skip(self, query), fields(start = %query.start, end = %query.end))
    )]
    async fn fetch(&self, code: &str, query: &DatasetQuery) -> Result<DatasetData, CalmapError> {
        let url = self.dataset_url(code)?;
        let mut params = query.params();
        if let Some(key) = &self.cfg.api_key {
            params.push(("api_key", key.clone()));
        }

        let resp = self
            .http
            .get(url)
            .query(&params)
            .send()
            .await
            .map_err(|e| CalmapError::connector(CONNECTOR, e.without_url().to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| CalmapError::connector(CONNECTOR, e.without_url().to_string()))?;

        if !status.is_success() {
            #[cfg(feature = "tracing")]
            tracing::warn!(status = status.as_u16(), "dataset request rejected");
            return Err(map_status(status, &body, code));
        }
        let env: DatasetEnvelope = serde_json::from_str(&body)
            .map_err(|e| CalmapError::connector(CONNECTOR, format!("malformed body: {e}")))?;
        Ok(env.dataset_data)
    }
}

/* -------- Test-only lightweight adapter constructors ------- */

#[cfg(feature = "test-adapters")]
impl dyn QuandlDatasets {
    /// Build a `QuandlDatasets` from a closure (tests only).
    pub fn from_fn<F>(f: F) -> Arc<dyn QuandlDatasets>
    where
        F: Send + Sync + 'static + Fn(String, DatasetQuery) -> Result<DatasetData, CalmapError>,
    {
        struct FnDatasets<F>(F);
        #[async_trait]
        impl<F> QuandlDatasets for FnDatasets<F>
        where
            F: Send
                + Sync
                + 'static
                + Fn(String, DatasetQuery) -> Result<DatasetData, CalmapError>,
        {
            async fn fetch(
                &self,
                code: &str,
                query: &DatasetQuery,
            ) -> Result<DatasetData, CalmapError> {
                (self.0)(code.to_string(), query.clone())
            }
        }
        Arc::new(FnDatasets(f))
    }
}
