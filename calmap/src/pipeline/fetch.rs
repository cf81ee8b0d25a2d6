use std::sync::Arc;

use calmap_core::types::{FetchStrategy, SeriesRequest, TimeSeries};
use calmap_core::{CalmapConnector, CalmapError};

use crate::Calmap;
use crate::core::{collapse_errors, tag_err, with_request_deadline};

const CAPABILITY: &str = "series";

fn describe(req: &SeriesRequest) -> String {
    format!("{} {}..{}", req.symbol, req.range.start(), req.range.end())
}

impl Calmap {
    /// Fetch the raw series for `req` from the registered providers.
    ///
    /// Routing follows [`FetchStrategy`]. A provider returning an empty series
    /// counts as a failure of that provider. The whole provider phase is
    /// bounded by the configured request timeout, if any.
    ///
    /// # Errors
    /// - `NotFound` / `EmptySeries` when every provider reported that outcome.
    /// - `AllProvidersTimedOut` when every provider timed out.
    /// - The provider's own error when only one provider failed.
    /// - `AllProvidersFailed` for any other mix of failures.
    /// - `RequestTimeout` when the overall deadline elapsed.
    /// - `Unsupported` when no connector serves price series.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "calmap::pipeline::fetch_series",
            skip(self, req),
            fields(symbol = %req.symbol, start = %req.range.start(), end = %req.range.end()),
        )
    )]
    pub async fn fetch_series(&self, req: &SeriesRequest) -> Result<TimeSeries, CalmapError> {
        let fut = async {
            match self.cfg.fetch_strategy {
                FetchStrategy::Latency => self.fetch_latency(req).await,
                _ => self.fetch_priority_with_fallback(req).await,
            }
        };
        with_request_deadline(self.cfg.request_timeout, CAPABILITY, fut).await?
    }

    async fn fetch_one(
        connector: Arc<dyn CalmapConnector>,
        req: &SeriesRequest,
        timeout: std::time::Duration,
    ) -> Result<TimeSeries, CalmapError> {
        let name = connector.name();
        let Some(provider) = connector.as_series_provider() else {
            return Err(CalmapError::unsupported(CAPABILITY));
        };
        let series =
            Self::provider_call_with_timeout(name, CAPABILITY, timeout, provider.series(req))
                .await
                .map_err(|e| tag_err(name, e))?;
        if series.is_empty() {
            return Err(CalmapError::empty_series(format!(
                "{} via {name}",
                describe(req)
            )));
        }
        Ok(series)
    }

    async fn fetch_priority_with_fallback(
        &self,
        req: &SeriesRequest,
    ) -> Result<TimeSeries, CalmapError> {
        let mut attempted_any = false;
        let mut errors: Vec<CalmapError> = Vec::new();

        for c in self.ordered() {
            if c.as_series_provider().is_none() {
                continue;
            }
            attempted_any = true;
            match Self::fetch_one(Arc::clone(&c), req, self.cfg.provider_timeout).await {
                Ok(series) => return Ok(series),
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(connector = c.name(), error = %e, "provider failed, falling back");
                    errors.push(e);
                }
            }
        }

        Err(collapse_errors(
            CAPABILITY,
            attempted_any,
            errors,
            &describe(req),
        ))
    }

    async fn fetch_latency(&self, req: &SeriesRequest) -> Result<TimeSeries, CalmapError> {
        use futures::stream::{FuturesUnordered, StreamExt};

        let timeout = self.cfg.provider_timeout;
        let mut futs = FuturesUnordered::new();
        for c in self.ordered() {
            if c.as_series_provider().is_some() {
                futs.push(Self::fetch_one(c, req, timeout));
            }
        }
        let attempted_any = !futs.is_empty();

        let mut errors: Vec<CalmapError> = Vec::new();
        while let Some(res) = futs.next().await {
            match res {
                Ok(series) => return Ok(series),
                Err(e) => errors.push(e),
            }
        }

        Err(collapse_errors(
            CAPABILITY,
            attempted_any,
            errors,
            &describe(req),
        ))
    }
}
