use calmap::{Calmap, ColumnSelector, DateRange, MonthEndPolicy, RemapRequest};
use calmap_mock::{DynamicMockConnector, MockBehavior};

use crate::helpers::{d, series};

fn source() -> calmap::TimeSeries {
    series(&[("2019-06-01", 1.0), ("2020-01-05", 2.0)])
}

#[tokio::test]
async fn query_range_pads_the_earliest_date_by_31_days() {
    let (conn, ctrl) = DynamicMockConnector::new_with_controller("dyn");
    ctrl.set_series_behavior("X", MockBehavior::Return(source()))
        .await;
    let calmap = Calmap::builder()
        .with_connector(conn)
        .month_end_policy(MonthEndPolicy::Never)
        .build()
        .unwrap();

    calmap
        .remap(&RemapRequest::new("X", "Value", ["2020-03-15", "2020-01-10"]))
        .await
        .unwrap();

    let reqs = ctrl.requests().await;
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].symbol, "X");
    assert_eq!(reqs[0].column, ColumnSelector::Named("Value".into()));
    assert_eq!(
        reqs[0].range,
        DateRange::new(d(2019, 12, 10), d(2020, 3, 15)).unwrap()
    );
}

#[tokio::test]
async fn query_range_uses_resolved_month_ends() {
    let (conn, ctrl) = DynamicMockConnector::new_with_controller("dyn");
    ctrl.set_series_behavior("X", MockBehavior::Return(source()))
        .await;
    let calmap = Calmap::builder().with_connector(conn).build().unwrap();

    calmap
        .remap(&RemapRequest::new("X", "ALL", ["2020-01", "2020-02"]))
        .await
        .unwrap();

    let reqs = ctrl.requests().await;
    assert_eq!(reqs[0].column, ColumnSelector::All);
    assert_eq!(
        reqs[0].range,
        DateRange::new(d(2019, 12, 31), d(2020, 2, 29)).unwrap()
    );
}

#[tokio::test]
async fn lookback_is_configurable() {
    let (conn, ctrl) = DynamicMockConnector::new_with_controller("dyn");
    ctrl.set_series_behavior("X", MockBehavior::Return(source()))
        .await;
    let calmap = Calmap::builder()
        .with_connector(conn)
        .lookback_days(0)
        .build()
        .unwrap();

    calmap
        .remap(&RemapRequest::new("X", "Value", ["2020-01-10"]))
        .await
        .unwrap();

    let reqs = ctrl.requests().await;
    assert_eq!(
        reqs[0].range,
        DateRange::new(d(2020, 1, 10), d(2020, 1, 10)).unwrap()
    );
}
