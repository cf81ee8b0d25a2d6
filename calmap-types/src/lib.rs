//! Calmap-specific data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod config;
mod error;
mod request;

pub use config::{BeforeStartPolicy, CalmapConfig, FetchStrategy, MonthEndPolicy};
pub use error::{CalmapError, ErrorKind};
pub use request::{CollapseFunc, CollapsePeriod, ColumnSelector};
