use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use calmap::{CalmapConnector, CalmapError, PriceSeriesProvider, SeriesRequest, TimeSeries};

type SeriesFn = Arc<dyn Fn(&SeriesRequest) -> Result<TimeSeries, CalmapError> + Send + Sync>;

/// Connector with a fixed delay and a scripted answer, counting its calls.
pub struct ScriptedConnector {
    name: &'static str,
    delay: Duration,
    series_fn: Option<SeriesFn>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedConnector {
    pub fn builder() -> ScriptedBuilder {
        ScriptedBuilder {
            name: "scripted",
            delay: Duration::ZERO,
            series_fn: None,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub struct ScriptedBuilder {
    name: &'static str,
    delay: Duration,
    series_fn: Option<SeriesFn>,
}

#[allow(dead_code)]
impl ScriptedBuilder {
    pub const fn name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub const fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn returns(mut self, series: TimeSeries) -> Self {
        let f: SeriesFn = Arc::new(move |_: &SeriesRequest| Ok(series.clone()));
        self.series_fn = Some(f);
        self
    }

    pub fn fails(mut self, err: CalmapError) -> Self {
        let f: SeriesFn = Arc::new(move |_: &SeriesRequest| Err(err.clone()));
        self.series_fn = Some(f);
        self
    }

    /// Leave the series capability unadvertised.
    pub fn without_series(mut self) -> Self {
        self.series_fn = None;
        self
    }

    pub fn build(self) -> Arc<ScriptedConnector> {
        Arc::new(ScriptedConnector {
            name: self.name,
            delay: self.delay,
            series_fn: self.series_fn,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl CalmapConnector for ScriptedConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn as_series_provider(&self) -> Option<&dyn PriceSeriesProvider> {
        self.series_fn
            .as_ref()
            .map(|_| self as &dyn PriceSeriesProvider)
    }
}

#[async_trait]
impl PriceSeriesProvider for ScriptedConnector {
    async fn series(&self, req: &SeriesRequest) -> Result<TimeSeries, CalmapError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.series_fn {
            Some(f) => f(req),
            None => Err(CalmapError::unsupported("series")),
        }
    }
}
