use std::sync::Arc;

use calmap_core::types::{BeforeStartPolicy, CalmapConfig, FetchStrategy, MonthEndPolicy};
use calmap_core::{CalmapConnector, CalmapError};

/// Orchestrator that routes series requests across registered providers and
/// runs the remapping pipeline on the result.
pub struct Calmap {
    pub(crate) connectors: Vec<Arc<dyn CalmapConnector>>,
    pub(crate) cfg: CalmapConfig,
}

/// Builder for constructing a `Calmap` orchestrator with custom configuration.
pub struct CalmapBuilder {
    connectors: Vec<Arc<dyn CalmapConnector>>,
    cfg: CalmapConfig,
}

impl Default for CalmapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CalmapBuilder {
    /// Create a new builder with default configuration.
    ///
    /// - Starts with no connectors; register at least one via [`with_connector`](Self::with_connector).
    /// - Defaults: priority-with-fallback fetches, 10s provider timeout, no
    ///   request deadline, 31-day lookback, month-end resolution for any
    ///   input layout when the resolved dates are distinct, rejection of
    ///   dates before the series.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connectors: vec![],
            cfg: CalmapConfig::default(),
        }
    }

    /// Register a provider connector.
    ///
    /// Registration order is the priority order for `PriorityWithFallback`.
    /// Duplicates are not deduplicated.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn CalmapConnector>) -> Self {
        self.connectors.push(c);
        self
    }

    /// Replace the whole configuration, e.g. one loaded from a file.
    #[must_use]
    pub fn config(mut self, cfg: CalmapConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Select the fetch strategy for multi-provider requests.
    ///
    /// - `PriorityWithFallback`: deterministic order, aggregates errors.
    /// - `Latency`: race all providers and return the first success.
    #[must_use]
    pub const fn fetch_strategy(mut self, strategy: FetchStrategy) -> Self {
        self.cfg.fetch_strategy = strategy;
        self
    }

    /// Set the per-provider request timeout.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// Set an overall deadline for the provider phase of a request.
    ///
    /// When exceeded, returns a `RequestTimeout` error.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.cfg.request_timeout = Some(timeout);
        self
    }

    /// Days fetched before the earliest requested date.
    #[must_use]
    pub const fn lookback_days(mut self, days: u32) -> Self {
        self.cfg.lookback_days = days;
        self
    }

    /// Choose when partial dates resolve to the end of their month.
    #[must_use]
    pub const fn month_end_policy(mut self, policy: MonthEndPolicy) -> Self {
        self.cfg.month_end = policy;
        self
    }

    /// Choose what happens to requested dates earlier than the series.
    #[must_use]
    pub const fn before_start_policy(mut self, policy: BeforeStartPolicy) -> Self {
        self.cfg.before_start = policy;
        self
    }

    /// Build the `Calmap` orchestrator.
    ///
    /// # Errors
    /// Returns `Validation` if no connectors have been registered.
    pub fn build(self) -> Result<Calmap, CalmapError> {
        if self.connectors.is_empty() {
            return Err(CalmapError::validation(
                "no connectors registered; add at least one via with_connector(...)",
            ));
        }
        Ok(Calmap {
            connectors: self.connectors,
            cfg: self.cfg,
        })
    }
}

/// Attribute an untagged provider error to `connector`.
pub fn tag_err(connector: &str, e: CalmapError) -> CalmapError {
    match e {
        e @ (CalmapError::NotFound { .. }
        | CalmapError::EmptySeries { .. }
        | CalmapError::ProviderTimeout { .. }
        | CalmapError::Connector { .. }
        | CalmapError::RequestTimeout { .. }
        | CalmapError::AllProvidersTimedOut { .. }
        | CalmapError::AllProvidersFailed(_)) => e,
        other => CalmapError::Connector {
            connector: connector.to_string(),
            msg: other.to_string(),
        },
    }
}

/// Collapse a set of provider errors into a uniform outcome.
///
/// - Nothing attempted: `Unsupported(capability)`.
/// - Every error a `ProviderTimeout`: `AllProvidersTimedOut(capability)`.
/// - Every error a `NotFound`: `NotFound(what)`.
/// - Every error an `EmptySeries`: `EmptySeries(what)`.
/// - A single other error: that error, unchanged.
/// - Otherwise `AllProvidersFailed(errors)`.
pub fn collapse_errors(
    capability: &str,
    attempted_any: bool,
    errors: Vec<CalmapError>,
    what: &str,
) -> CalmapError {
    if !attempted_any {
        return CalmapError::unsupported(capability);
    }
    let all = |pred: fn(&CalmapError) -> bool| !errors.is_empty() && errors.iter().all(pred);
    if all(|e| matches!(e, CalmapError::ProviderTimeout { .. })) {
        return CalmapError::AllProvidersTimedOut {
            capability: capability.to_string(),
        };
    }
    if all(|e| matches!(e, CalmapError::NotFound { .. })) {
        return CalmapError::not_found(what);
    }
    if all(|e| matches!(e, CalmapError::EmptySeries { .. })) {
        return CalmapError::empty_series(what);
    }
    match <[CalmapError; 1]>::try_from(errors) {
        Ok([only]) => only,
        Err(errors) => CalmapError::AllProvidersFailed(errors),
    }
}

/// Await `fut`, bounded by `deadline` when one is set.
pub(crate) async fn with_request_deadline<F, T>(
    deadline: Option<std::time::Duration>,
    capability: &'static str,
    fut: F,
) -> Result<T, CalmapError>
where
    F: core::future::Future<Output = T>,
{
    match deadline {
        Some(d) => tokio::time::timeout(d, fut)
            .await
            .map_err(|_| CalmapError::request_timeout(capability)),
        None => Ok(fut.await),
    }
}

impl Calmap {
    /// Wrap a provider future with a timeout and standardized timeout error mapping.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "calmap::core::provider_call_with_timeout",
            skip(fut),
            fields(
                connector = connector_name,
                capability = capability,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn provider_call_with_timeout<T, Fut>(
        connector_name: &'static str,
        capability: &'static str,
        timeout: std::time::Duration,
        fut: Fut,
    ) -> Result<T, CalmapError>
    where
        Fut: core::future::Future<Output = Result<T, CalmapError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(CalmapError::provider_timeout(connector_name, capability)))
    }

    /// Start building a new `Calmap` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use calmap_quandl::{QuandlConfig, QuandlConnector};
    ///
    /// let quandl = Arc::new(QuandlConnector::new(QuandlConfig::from_env())?);
    /// let calmap = calmap::Calmap::builder()
    ///     .with_connector(quandl)
    ///     .provider_timeout(std::time::Duration::from_secs(5))
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> CalmapBuilder {
        CalmapBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &CalmapConfig {
        &self.cfg
    }

    /// Registered connectors in priority order.
    pub(crate) fn ordered(&self) -> Vec<Arc<dyn CalmapConnector>> {
        self.connectors.clone()
    }
}
