use std::collections::BTreeMap;

use calmap::{Calmap, MonthEndPolicy, RemapRequest, RollingWindow, TimeSeries};
use chrono::{Days, NaiveDate};
use proptest::prelude::*;

use crate::helpers::{ScriptedConnector, d};

fn day(offset: u32) -> NaiveDate {
    d(2018, 1, 1)
        .checked_add_days(Days::new(u64::from(offset)))
        .unwrap()
}

fn to_series(src: &BTreeMap<u32, i32>) -> TimeSeries {
    TimeSeries::single(
        "Value",
        src.iter().map(|(&o, &c)| (day(o), f64::from(c) / 100.0)),
    )
    .unwrap()
}

/// Orchestrator over one connector serving `series`, with dates taken literally.
fn literal_calmap(series: TimeSeries) -> Calmap {
    Calmap::builder()
        .with_connector(ScriptedConnector::builder().returns(series).build())
        .month_end_policy(MonthEndPolicy::Never)
        .build()
        .unwrap()
}

fn request(targets: &[u32]) -> RemapRequest {
    RemapRequest::new("X", "Value", targets.iter().map(|&o| day(o).to_string()))
}

proptest! {
    #[test]
    fn every_target_gets_the_latest_value_on_or_before_it(
        src in prop::collection::btree_map(0u32..600, -50_000i32..50_000, 1..40),
        spread in prop::collection::vec(0u32..700, 1..20),
    ) {
        let first = *src.keys().next().unwrap();
        let targets: Vec<u32> = spread.iter().map(|s| first + s).collect();
        let calmap = literal_calmap(to_series(&src));

        let resp = tokio_test::block_on(calmap.remap(&request(&targets))).unwrap();

        prop_assert_eq!(resp.len(), targets.len());
        prop_assert!(resp.entries().windows(2).all(|w| w[0].date <= w[1].date));
        for m in resp.entries() {
            prop_assert!(m.as_of <= m.date);
            let offset = u32::try_from((m.date - day(0)).num_days()).unwrap();
            let (&k, &c) = src.range(..=offset).next_back().unwrap();
            prop_assert_eq!(m.as_of, day(k));
            prop_assert_eq!(m.values.clone(), vec![f64::from(c) / 100.0]);
        }
    }

    #[test]
    fn later_observations_never_change_earlier_answers(
        src in prop::collection::btree_map(0u32..600, -50_000i32..50_000, 2..40),
        spread in prop::collection::vec(0u32..300, 1..10),
        window in 1usize..6,
    ) {
        let first = *src.keys().next().unwrap();
        let targets: Vec<u32> = spread.iter().map(|s| first + s).collect();
        let last_target = targets.iter().copied().max().unwrap();
        let cut: BTreeMap<u32, i32> = src.range(..=last_target).map(|(&k, &v)| (k, v)).collect();
        let req = request(&targets).with_rolling(RollingWindow::new(window));

        let full = tokio_test::block_on(literal_calmap(to_series(&src)).remap(&req)).unwrap();
        let trimmed = tokio_test::block_on(literal_calmap(to_series(&cut)).remap(&req)).unwrap();

        prop_assert_eq!(full.scalars(), trimmed.scalars());
    }
}
