use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use calmap_core::connector::{CalmapConnector, PriceSeriesProvider};
use calmap_core::{CalmapError, SeriesRequest, TimeSeries};

/// Instruction for how a method should behave for a given input.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(CalmapError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

#[derive(Default)]
struct InternalState {
    series_rules: HashMap<String, MockBehavior<TimeSeries>>,
    requests: Vec<SeriesRequest>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior for `series` calls for a specific symbol.
    pub async fn set_series_behavior(
        &self,
        symbol: impl Into<String>,
        behavior: MockBehavior<TimeSeries>,
    ) {
        let mut guard = self.state.lock().await;
        guard.series_rules.insert(symbol.into(), behavior);
    }

    /// Return a copy of every request received so far, in arrival order.
    pub async fn requests(&self) -> Vec<SeriesRequest> {
        let guard = self.state.lock().await;
        guard.requests.clone()
    }

    /// Clear all configured behaviors and request logs.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.series_rules.clear();
        guard.requests.clear();
    }
}

/// A connector that defers all behavior to an external controller.
///
/// Unscripted symbols answer `NotFound`.
pub struct DynamicMockConnector {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockConnector {
    /// Create a new dynamic mock connector and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn CalmapConnector>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn CalmapConnector>, controller)
    }
}

#[async_trait]
impl CalmapConnector for DynamicMockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "DynamicMock"
    }

    fn as_series_provider(&self) -> Option<&dyn PriceSeriesProvider> {
        Some(self as &dyn PriceSeriesProvider)
    }
}

#[async_trait]
impl PriceSeriesProvider for DynamicMockConnector {
    async fn series(&self, req: &SeriesRequest) -> Result<TimeSeries, CalmapError> {
        // Snapshot the behavior without holding the lock across await points
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.requests.push(req.clone());
            guard.series_rules.get(&req.symbol).cloned()
        };

        match behavior {
            Some(MockBehavior::Return(series)) => Ok(series),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => std::future::pending().await,
            None => Err(CalmapError::not_found(format!("series for {}", req.symbol))),
        }
    }
}
