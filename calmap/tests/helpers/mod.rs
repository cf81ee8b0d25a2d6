// Re-export helpers so tests can `use helpers::*;`
pub mod scripted;

pub use scripted::ScriptedConnector;

use std::sync::Arc;

use calmap::{Calmap, CalmapConnector, TimeSeries};
use chrono::NaiveDate;

/// Fixture symbols served by `calmap_mock::MockConnector`.
pub const BASIC: &str = "SCENARIO/BASIC";
pub const MONTHLY: &str = "SCENARIO/MONTHLY";
pub const DAILY: &str = "SCENARIO/DAILY";
pub const GOLD: &str = "LBMA/GOLD";
#[allow(dead_code)]
pub const EMPTY: &str = "EMPTY";

/// Construct a calendar date for readability in tests.
pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("invalid date")
}

/// Single-field `Value` series from `(YYYY-MM-DD, value)` pairs.
pub fn series(rows: &[(&str, f64)]) -> TimeSeries {
    TimeSeries::single(
        "Value",
        rows.iter().map(|&(s, v)| {
            (
                NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("invalid date"),
                v,
            )
        }),
    )
    .unwrap()
}

/// Orchestrator over the deterministic fixture connector.
pub fn fixture_calmap() -> Calmap {
    Calmap::builder()
        .with_connector(Arc::new(calmap_mock::MockConnector::new()))
        .build()
        .unwrap()
}

/// Orchestrator over the given connectors, in priority order.
#[allow(dead_code)]
pub fn calmap_with(connectors: Vec<Arc<dyn CalmapConnector>>) -> Calmap {
    connectors
        .into_iter()
        .fold(Calmap::builder(), calmap::CalmapBuilder::with_connector)
        .build()
        .unwrap()
}
