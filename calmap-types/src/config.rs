//! Configuration types shared across the orchestrator and connectors.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Strategy for selecting among registered price-series providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum FetchStrategy {
    /// Use registration order and fall back to the next provider on failure.
    #[default]
    PriorityWithFallback,
    /// Race all registered providers concurrently and return the first success.
    Latency,
}

/// When requested dates are moved to the last calendar day of their month.
///
/// The distinctness rule is shared by every resolving variant: month-end
/// resolution only happens when more than one date was requested and the
/// resolved dates are pairwise distinct; otherwise the dates stay as parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MonthEndPolicy {
    /// Resolve only dates given as `YYYY-MM` or `YYYY-Mon`.
    MonthInputsWhenDistinct,
    /// Resolve every date, whatever its layout, so `2020-01-15` becomes `2020-01-31`.
    #[default]
    AnyInputWhenDistinct,
    /// Always keep dates exactly as parsed.
    Never,
}

/// What happens to requested dates that precede the first available observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BeforeStartPolicy {
    /// Fail the whole request with a computation error.
    #[default]
    Reject,
    /// Drop those dates from the response.
    Omit,
}

/// Global configuration for the `Calmap` orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalmapConfig {
    /// Strategy for fetching from multiple providers.
    pub fetch_strategy: FetchStrategy,
    /// Timeout for individual provider requests.
    pub provider_timeout: Duration,
    /// Optional overall bound on the provider phase of a request.
    pub request_timeout: Option<Duration>,
    /// Days of history fetched before the earliest requested date.
    ///
    /// Gives a monthly collapse or rolling average enough trailing data for
    /// the first requested date.
    pub lookback_days: u32,
    /// Month-end resolution rule for requested dates.
    pub month_end: MonthEndPolicy,
    /// Handling of requested dates earlier than the series start.
    pub before_start: BeforeStartPolicy,
}

impl CalmapConfig {
    /// Default pad, in days, between the earliest requested date and the query start.
    pub const DEFAULT_LOOKBACK_DAYS: u32 = 31;
}

impl Default for CalmapConfig {
    fn default() -> Self {
        Self {
            fetch_strategy: FetchStrategy::default(),
            provider_timeout: Duration::from_secs(10),
            request_timeout: None,
            lookback_days: Self::DEFAULT_LOOKBACK_DAYS,
            month_end: MonthEndPolicy::default(),
            before_start: BeforeStartPolicy::default(),
        }
    }
}
