//! Pure pipeline stages applied to a provider series.
//!
//! Modules, in pipeline order:
//! - `dates`: parse requested dates and derive the provider query range
//! - `collapse`: aggregate a series into month/quarter/year buckets
//! - `rolling`: trailing moving average
//! - `remap`: forward-fill lookup onto the requested calendar
/// Period aggregation labelled by period end.
pub mod collapse;
/// Requested-date parsing and month-end resolution.
pub mod dates;
/// Causal remapping of a series onto requested dates.
pub mod remap;
/// Trailing moving averages.
pub mod rolling;
/// Series invariant checks.
pub mod util;
