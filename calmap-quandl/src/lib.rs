//! calmap-quandl
//!
//! Public connector that implements `CalmapConnector` on top of the Quandl /
//! Nasdaq Data Link v3 time-series API (`datasets/{code}/data.json`).
//!
//! The connector asks the API for ascending, daily-collapsed rows over the
//! requested range, drops the date column into the observation date, selects
//! the requested field(s), and discards rows with missing values.
#![warn(missing_docs)]

/// Adapter definitions and the production adapter backed by `reqwest`.
pub mod adapter;
/// Explicit provider configuration.
pub mod config;
/// Response body shapes.
pub mod wire;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use adapter::{DatasetQuery, QuandlDatasets, RealAdapter};
use calmap_core::connector::{CalmapConnector, PriceSeriesProvider};
use calmap_core::{CalmapError, SeriesRequest, TimeSeries};
pub use config::QuandlConfig;
use wire::DatasetData;

#[cfg(feature = "test-adapters")]
type DatasetsAdapter = Arc<dyn QuandlDatasets>;
#[cfg(not(feature = "test-adapters"))]
type DatasetsAdapter = Arc<RealAdapter>;

/// Public connector type. Production users construct it with [`QuandlConnector::new`].
pub struct QuandlConnector {
    datasets: DatasetsAdapter,
    collapse_daily: bool,
}

impl QuandlConnector {
    /// Connector name, also used to tag its errors.
    pub const NAME: &'static str = "calmap-quandl";

    /// Build with a fresh HTTP client for `cfg`.
    ///
    /// # Errors
    /// Returns a connector error if the HTTP client cannot be built.
    pub fn new(cfg: QuandlConfig) -> Result<Self, CalmapError> {
        let collapse_daily = cfg.collapse_daily;
        let a = RealAdapter::new(cfg)?;
        Ok(Self::from_real(a, collapse_daily))
    }

    /// Build from a provided `reqwest::Client`.
    #[must_use]
    pub fn with_client(http: reqwest::Client, cfg: QuandlConfig) -> Self {
        let collapse_daily = cfg.collapse_daily;
        Self::from_real(RealAdapter::with_client(http, cfg), collapse_daily)
    }

    fn from_real(adapter: RealAdapter, collapse_daily: bool) -> Self {
        Self {
            datasets: Arc::new(adapter),
            collapse_daily,
        }
    }

    /// For tests/injection (requires the `test-adapters` feature).
    #[cfg(feature = "test-adapters")]
    pub fn from_adapter(datasets: Arc<dyn QuandlDatasets>, collapse_daily: bool) -> Self {
        Self {
            datasets,
            collapse_daily,
        }
    }

    fn normalize_error(e: CalmapError) -> CalmapError {
        match e {
            CalmapError::Connector { msg, .. } => CalmapError::connector(Self::NAME, msg),
            other => other,
        }
    }
}

/// Turn a raw table into rows keyed by date.
///
/// The date column is the one named `Date` (any case) or, failing that, the
/// first column. Cells that are null or not numeric become gaps.
fn split_table(
    data: DatasetData,
) -> Result<(Vec<String>, Vec<(NaiveDate, Vec<Option<f64>>)>), CalmapError> {
    let DatasetData { column_names, data } = data;
    if column_names.len() < 2 {
        return Err(CalmapError::connector(
            QuandlConnector::NAME,
            format!("dataset has {} columns, need a date and a value", column_names.len()),
        ));
    }
    let date_idx = column_names
        .iter()
        .position(|c| c.eq_ignore_ascii_case("date"))
        .unwrap_or(0);
    let fields: Vec<String> = column_names
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != date_idx)
        .map(|(_, c)| c.clone())
        .collect();

    let mut rows = Vec::with_capacity(data.len());
    for row in data {
        if row.len() != column_names.len() {
            return Err(CalmapError::Data(format!(
                "row has {} cells, expected {}",
                row.len(),
                column_names.len()
            )));
        }
        let date = row[date_idx]
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            .ok_or_else(|| CalmapError::Data(format!("bad date cell {}", row[date_idx])))?;
        let values = row
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date_idx)
            .map(|(_, v)| cell_value(v))
            .collect();
        rows.push((date, values));
    }
    Ok((fields, rows))
}

fn cell_value(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl CalmapConnector for QuandlConnector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn vendor(&self) -> &'static str {
        "Nasdaq Data Link (Quandl)"
    }

    fn as_series_provider(&self) -> Option<&dyn PriceSeriesProvider> {
        Some(self as &dyn PriceSeriesProvider)
    }
}

#[async_trait]
impl PriceSeriesProvider for QuandlConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "calmap_quandl::series",
            skip(self, req),
            fields(symbol = %req.symbol, column = %req.column),
        )
    )]
    async fn series(&self, req: &SeriesRequest) -> Result<TimeSeries, CalmapError> {
        let query = DatasetQuery {
            start: req.range.start(),
            end: req.range.end(),
            collapse: self.collapse_daily.then_some("daily"),
            order: "asc",
        };
        let table = self
            .datasets
            .fetch(&req.symbol, &query)
            .await
            .map_err(Self::normalize_error)?;
        let (fields, rows) = split_table(table)?;
        let series = TimeSeries::from_rows(fields, rows, &req.column)?.restrict(req.range);
        #[cfg(feature = "tracing")]
        tracing::debug!(points = series.len(), "dataset converted");
        Ok(series)
    }
}
