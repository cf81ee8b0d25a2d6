//! Deterministic connectors for tests and demos.
//!
//! [`MockConnector`] serves fixed fixture tables by symbol and honors the
//! requested range and column like a real provider. [`DynamicMockConnector`]
//! defers every answer to a controller so tests can script failures and hangs.
use std::time::Duration;

use async_trait::async_trait;
use calmap_core::connector::{CalmapConnector, PriceSeriesProvider};
use calmap_core::{CalmapError, SeriesRequest, TimeSeries};

mod dynamic;
mod fixtures;

pub use dynamic::{DynamicMockConnector, DynamicMockController, MockBehavior};

/// Symbols with a fixture table in [`MockConnector`].
pub const FIXTURE_SYMBOLS: &[&str] = &[
    "SCENARIO/BASIC",
    "SCENARIO/MONTHLY",
    "SCENARIO/DAILY",
    "LBMA/GOLD",
    "EMPTY",
];

/// Mock connector for CI-safe examples. Provides deterministic data from static fixtures.
///
/// Besides [`FIXTURE_SYMBOLS`], two symbols are special:
/// - `FAIL` returns a connector error;
/// - `TIMEOUT` sleeps before answering so an orchestrator timeout can fire.
pub struct MockConnector {
    name: &'static str,
    latency: Duration,
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    /// Connector named `calmap-mock`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            name: "calmap-mock",
            latency: Duration::from_millis(200),
        }
    }

    /// Same fixtures under a different connector name.
    #[must_use]
    pub const fn named(name: &'static str) -> Self {
        Self {
            name,
            latency: Duration::from_millis(200),
        }
    }

    /// Override how long `TIMEOUT` sleeps.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn maybe_fail_or_timeout(&self, symbol: &str) -> Result<(), CalmapError> {
        match symbol {
            "FAIL" => Err(CalmapError::connector(self.name, "forced failure: series")),
            "TIMEOUT" => {
                tokio::time::sleep(self.latency).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl CalmapConnector for MockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn as_series_provider(&self) -> Option<&dyn PriceSeriesProvider> {
        Some(self as &dyn PriceSeriesProvider)
    }
}

#[async_trait]
impl PriceSeriesProvider for MockConnector {
    async fn series(&self, req: &SeriesRequest) -> Result<TimeSeries, CalmapError> {
        let s = req.symbol.as_str();
        self.maybe_fail_or_timeout(s).await?;
        let raw = fixtures::series::by_symbol(s)
            .ok_or_else(|| CalmapError::not_found(format!("series for {s}")))?;
        let fields = raw.fields.iter().map(|f| (*f).to_string()).collect();
        let rows = raw
            .rows
            .into_iter()
            .filter(|(d, _)| req.range.contains(*d))
            .collect();
        TimeSeries::from_rows(fields, rows, &req.column)
    }
}
