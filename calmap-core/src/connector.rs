use async_trait::async_trait;

use crate::CalmapError;
use crate::types::{SeriesRequest, TimeSeries};

/// Focused role trait for connectors that provide daily price series.
#[async_trait]
pub trait PriceSeriesProvider: Send + Sync {
    /// Fetch the raw series for `req.symbol` over `req.range`.
    ///
    /// Implementations must return:
    /// - observations sorted by date without duplicates;
    /// - only the fields selected by `req.column`;
    /// - no rows with a missing value in any selected field.
    ///
    /// An empty series is allowed; the orchestrator treats it as a failure of
    /// this provider.
    async fn series(&self, req: &SeriesRequest) -> Result<TimeSeries, CalmapError>;
}

/// Main connector trait implemented by provider crates. Exposes capability discovery.
#[async_trait]
pub trait CalmapConnector: Send + Sync {
    /// A stable identifier used in logs and error tags (e.g., "calmap-quandl").
    fn name(&self) -> &'static str;

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Advertise series capability by returning a usable trait object reference when supported.
    fn as_series_provider(&self) -> Option<&dyn PriceSeriesProvider> {
        None
    }
}
