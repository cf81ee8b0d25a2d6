//! Calmap remaps financial time series onto caller-specified calendars.
//!
//! Overview
//! - Normalizes requested dates (`YYYY-MM-DD`, `YYYY-MM`, `YYYY-Mon`) into a
//!   target calendar and a provider query range.
//! - Routes the series request to connectors that implement the
//!   `calmap_core` contracts, with per-provider timeouts.
//! - Optionally collapses the series into monthly, quarterly or annual
//!   buckets, then applies a trailing moving average.
//! - Forward-fills the result onto the requested dates.
//!
//! Causality
//! - A value returned for date `T` is computed only from observations dated
//!   on or before `T`: collapse labels a bucket by its last day, the moving
//!   average looks backwards only, and the remap takes the latest observation
//!   not after `T`.
//!
//! Key behaviors and trade-offs
//! - Fetch strategy:
//!   - `PriorityWithFallback`: registration order, next provider on failure,
//!     errors aggregated.
//!   - `Latency`: races every provider and returns the first success.
//! - Dates before the series either fail the request (`BeforeStartPolicy::Reject`)
//!   or are dropped (`BeforeStartPolicy::Omit`).
//! - Embedders that need the legacy wire contract call
//!   [`Calmap::handle_json`], which answers every failure with
//!   `invalid request`.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use calmap::{Calmap, RemapRequest};
//! use calmap_quandl::{QuandlConfig, QuandlConnector};
//!
//! let quandl = Arc::new(QuandlConnector::new(QuandlConfig::from_env())?);
//! let calmap = Calmap::builder().with_connector(quandl).build()?;
//!
//! let req = RemapRequest::new("LBMA/GOLD", "USD (AM)", ["2020-01", "2020-02"]);
//! let resp = calmap.remap(&req).await?;
//! println!("{}", resp.to_json()?);
//! ```
//!
//! See `calmap/examples/` for a runnable demonstration.
#![warn(missing_docs)]

pub(crate) mod core;
mod pipeline;

pub use core::{Calmap, CalmapBuilder, collapse_errors, tag_err};
pub use pipeline::request::{RemapRequest, RollingWindow};
pub use pipeline::response::{RemapResponse, ValueShape, timestamp_key};

// Re-export core types for convenience
pub use calmap_core::{
    BeforeStartPolicy, CalmapConfig, CalmapConnector, CalmapError, CollapseFunc, CollapsePeriod,
    ColumnSelector, DateRange, ErrorKind, FetchStrategy, Mapped, MonthEndPolicy,
    Observation, PriceSeriesProvider, SeriesRequest, TimeSeries,
};
