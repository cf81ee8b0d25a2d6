//! Request handling: validation, provider fetch, and the collapse → rolling →
//! remap pipeline.

pub mod fetch;
pub mod request;
pub mod response;

use calmap_core::types::{ColumnSelector, SeriesRequest};
use calmap_core::{CalmapError, collapse, normalize, rolling_mean};

use crate::Calmap;
use request::RemapRequest;
use response::{RemapResponse, ValueShape};

impl Calmap {
    /// Run the full pipeline for one request.
    ///
    /// 1. Normalize the requested dates and derive the provider query range.
    /// 2. Fetch the raw series from the providers.
    /// 3. Collapse into periods, when requested.
    /// 4. Apply the trailing moving average, when the window exceeds one.
    /// 5. Forward-fill onto the requested dates, ascending.
    ///
    /// Each stage only looks at observations dated on or before the value it
    /// produces, so no returned value depends on later data.
    ///
    /// # Errors
    /// - `Validation` / `Parse` for a malformed request or unparseable dates.
    /// - Upstream errors from the provider phase.
    /// - `Computation` when requested dates precede the series under
    ///   `BeforeStartPolicy::Reject`, or nothing is left to return.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "calmap::remap",
            skip(self, req),
            fields(symbol = %req.symbol, column = %req.column, dates = req.dates.len()),
        )
    )]
    pub async fn remap(&self, req: &RemapRequest) -> Result<RemapResponse, CalmapError> {
        req.validate()?;
        let calendar = normalize(&req.dates, self.cfg.month_end, self.cfg.lookback_days)?;
        let series_req = SeriesRequest::new(req.symbol.clone(), req.column.clone(), calendar.query);

        let mut series = self.fetch_series(&series_req).await?;
        if let Some(period) = req.collapse {
            series = collapse(series, period, req.collapse_func)?;
        }
        if let Some(window) = req.rolling {
            series = rolling_mean(series, window.get());
        }

        let mapped = calmap_core::remap(&series, &calendar.dates);
        let fields = mapped.fields.clone();
        let entries = mapped.resolve(self.cfg.before_start)?;
        let shape = match req.column {
            ColumnSelector::All => ValueShape::Object,
            ColumnSelector::Named(_) => ValueShape::Scalar,
        };
        Ok(RemapResponse::new(fields, shape, entries))
    }

    /// Embedder entry point: JSON request body in, JSON response body out.
    ///
    /// Any failure yields the plain body `invalid request`; the internal error
    /// kind is only logged.
    pub async fn handle_json(&self, body: &str) -> String {
        let outcome = async {
            let req = RemapRequest::from_json(body)?;
            self.remap(&req).await?.to_json()
        }
        .await;
        match outcome {
            Ok(json) => json,
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(kind = ?e.kind(), error = %e, "request rejected");
                e.external_message().to_string()
            }
        }
    }
}
