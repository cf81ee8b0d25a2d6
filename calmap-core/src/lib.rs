//! calmap-core
//!
//! Core types, traits, and the pure remapping pipeline shared across the calmap
//! ecosystem.
//!
//! - `types`: the series model (`TimeSeries`, `Observation`) and provider requests.
//! - `connector`: the `CalmapConnector` trait and the `PriceSeriesProvider` role.
//! - `timeseries`: the pipeline stages, each a pure function from one series to a new one.
//!
//! Pipeline order
//! --------------
//! `normalize` turns raw request dates into a target calendar and the range to
//! fetch. After the provider returns a series, `collapse` (optional) buckets it by
//! period end, `rolling_mean` (optional) smooths it with a trailing window, and
//! `remap` forward-fills it onto the target calendar.
//!
//! Every stage is causal: a value attributed to date `T` depends only on
//! observations dated on or before `T`.
#![warn(missing_docs)]

/// Connector capability traits and the primary `CalmapConnector` interface.
pub mod connector;
/// Pipeline stages over daily series.
pub mod timeseries;
pub mod types;

pub use calmap_types::CalmapError;
pub use connector::{CalmapConnector, PriceSeriesProvider};
pub use timeseries::collapse::{collapse, period_end};
pub use timeseries::dates::{TargetCalendar, month_end, normalize, parse_dates};
pub use timeseries::remap::{Mapped, Remapped, floor_index, remap};
pub use timeseries::rolling::rolling_mean;
pub use types::*;
