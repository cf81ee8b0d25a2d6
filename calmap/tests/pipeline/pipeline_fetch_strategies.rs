use std::sync::Arc;
use std::time::Duration;

use calmap::{Calmap, CalmapError, FetchStrategy, RemapRequest, TimeSeries};
use calmap_mock::MockConnector;

use crate::helpers::{BASIC, EMPTY, ScriptedConnector, d, series};

fn req() -> RemapRequest {
    RemapRequest::new("X", "Value", ["2020-01-10"])
}

#[tokio::test]
async fn priority_uses_registration_order() {
    let first = ScriptedConnector::builder()
        .name("first")
        .delay(Duration::from_millis(20))
        .returns(series(&[("2020-01-01", 1.0)]))
        .build();
    let second = ScriptedConnector::builder()
        .name("second")
        .returns(series(&[("2020-01-01", 2.0)]))
        .build();
    let calmap = Calmap::builder()
        .with_connector(first.clone())
        .with_connector(second.clone())
        .build()
        .unwrap();

    let resp = calmap.remap(&req()).await.unwrap();
    assert_eq!(resp.scalars(), vec![(d(2020, 1, 10), 1.0)]);
    assert_eq!(second.calls(), 0);
}

#[tokio::test]
async fn priority_falls_back_on_failure() {
    let broken = ScriptedConnector::builder()
        .name("broken")
        .fails(CalmapError::connector("broken", "boom"))
        .build();
    let backup = ScriptedConnector::builder()
        .name("backup")
        .returns(series(&[("2020-01-01", 7.0)]))
        .build();
    let calmap = Calmap::builder()
        .with_connector(broken.clone())
        .with_connector(backup.clone())
        .build()
        .unwrap();

    let resp = calmap.remap(&req()).await.unwrap();
    assert_eq!(resp.scalars(), vec![(d(2020, 1, 10), 7.0)]);
    assert_eq!((broken.calls(), backup.calls()), (1, 1));
}

#[tokio::test]
async fn empty_series_falls_through_to_the_next_provider() {
    let empty = ScriptedConnector::builder()
        .name("empty")
        .returns(TimeSeries::empty(vec!["Value".into()]))
        .build();
    let backup = ScriptedConnector::builder()
        .name("backup")
        .returns(series(&[("2020-01-01", 3.0)]))
        .build();
    let calmap = Calmap::builder()
        .with_connector(empty)
        .with_connector(backup)
        .build()
        .unwrap();

    let resp = calmap.remap(&req()).await.unwrap();
    assert_eq!(resp.scalars(), vec![(d(2020, 1, 10), 3.0)]);
}

#[tokio::test]
async fn every_provider_empty_is_empty_series() {
    let calmap = Calmap::builder()
        .with_connector(Arc::new(MockConnector::named("a")))
        .with_connector(Arc::new(MockConnector::named("b")))
        .build()
        .unwrap();
    let err = calmap
        .remap(&RemapRequest::new(EMPTY, "Value", ["2020-01-10"]))
        .await
        .unwrap_err();
    assert!(matches!(err, CalmapError::EmptySeries { .. }), "{err:?}");

    // A range with no fixture rows is empty too.
    let err = calmap
        .remap(&RemapRequest::new(BASIC, "Value", ["2010-01-10"]))
        .await
        .unwrap_err();
    assert!(matches!(err, CalmapError::EmptySeries { .. }), "{err:?}");
}

#[tokio::test]
async fn every_provider_not_found_is_not_found() {
    let calmap = Calmap::builder()
        .with_connector(Arc::new(MockConnector::named("a")))
        .with_connector(Arc::new(MockConnector::named("b")))
        .build()
        .unwrap();
    let err = calmap
        .remap(&RemapRequest::new("NOPE", "Value", ["2020-01-10"]))
        .await
        .unwrap_err();
    assert!(matches!(err, CalmapError::NotFound { .. }), "{err:?}");
}

#[tokio::test]
async fn mixed_failures_are_aggregated_and_tagged() {
    let bad_data = ScriptedConnector::builder()
        .name("bad_data")
        .fails(CalmapError::Data("unsorted rows".into()))
        .build();
    let missing = ScriptedConnector::builder()
        .name("missing")
        .fails(CalmapError::not_found("X"))
        .build();
    let calmap = Calmap::builder()
        .with_connector(bad_data)
        .with_connector(missing)
        .build()
        .unwrap();

    let err = calmap.remap(&req()).await.unwrap_err();
    let flat = err.flatten();
    assert_eq!(flat.len(), 2);
    assert!(
        matches!(&flat[0], CalmapError::Connector { connector, .. } if connector == "bad_data"),
        "{flat:?}"
    );
    assert!(matches!(flat[1], CalmapError::NotFound { .. }));
}

#[tokio::test]
async fn connectors_without_series_are_skipped() {
    let none = ScriptedConnector::builder().name("none").without_series().build();
    let calmap = Calmap::builder().with_connector(none.clone()).build().unwrap();
    let err = calmap.remap(&req()).await.unwrap_err();
    assert!(matches!(err, CalmapError::Unsupported { .. }), "{err:?}");
    assert_eq!(none.calls(), 0);

    let backup = ScriptedConnector::builder()
        .name("backup")
        .returns(series(&[("2020-01-01", 4.0)]))
        .build();
    let calmap = Calmap::builder()
        .with_connector(none)
        .with_connector(backup)
        .build()
        .unwrap();
    assert_eq!(
        calmap.remap(&req()).await.unwrap().scalars(),
        vec![(d(2020, 1, 10), 4.0)]
    );
}

#[tokio::test(start_paused = true)]
async fn latency_returns_fastest_success() {
    let slow = ScriptedConnector::builder()
        .name("slow")
        .delay(Duration::from_millis(100))
        .returns(series(&[("2020-01-01", 99.0)]))
        .build();
    let fast = ScriptedConnector::builder()
        .name("fast")
        .delay(Duration::from_millis(10))
        .returns(series(&[("2020-01-01", 11.0)]))
        .build();
    let calmap = Calmap::builder()
        .with_connector(slow)
        .with_connector(fast)
        .fetch_strategy(FetchStrategy::Latency)
        .build()
        .unwrap();

    let resp = calmap.remap(&req()).await.unwrap();
    assert_eq!(resp.scalars(), vec![(d(2020, 1, 10), 11.0)]);
}

#[tokio::test(start_paused = true)]
async fn latency_ignores_faster_failure() {
    let fast_fail = ScriptedConnector::builder()
        .name("fast_fail")
        .delay(Duration::from_millis(5))
        .fails(CalmapError::connector("fast_fail", "boom"))
        .build();
    let slow_ok = ScriptedConnector::builder()
        .name("slow_ok")
        .delay(Duration::from_millis(20))
        .returns(series(&[("2020-01-01", 77.0)]))
        .build();
    let calmap = Calmap::builder()
        .with_connector(fast_fail)
        .with_connector(slow_ok)
        .fetch_strategy(FetchStrategy::Latency)
        .build()
        .unwrap();

    let resp = calmap.remap(&req()).await.unwrap();
    assert_eq!(resp.scalars(), vec![(d(2020, 1, 10), 77.0)]);
}

#[tokio::test]
async fn latency_aggregates_when_everything_fails() {
    let a = ScriptedConnector::builder()
        .name("a")
        .fails(CalmapError::connector("a", "down"))
        .build();
    let b = ScriptedConnector::builder()
        .name("b")
        .fails(CalmapError::connector("b", "down"))
        .build();
    let calmap = Calmap::builder()
        .with_connector(a)
        .with_connector(b)
        .fetch_strategy(FetchStrategy::Latency)
        .build()
        .unwrap();

    let err = calmap.remap(&req()).await.unwrap_err();
    assert!(
        matches!(err, CalmapError::AllProvidersFailed(ref v) if v.len() == 2),
        "{err:?}"
    );
}

#[tokio::test]
async fn a_single_failing_provider_reports_its_own_error() {
    let only = ScriptedConnector::builder()
        .name("only")
        .fails(CalmapError::connector("only", "HTTP 503"))
        .build();
    let calmap = Calmap::builder().with_connector(only).build().unwrap();

    let err = calmap.remap(&req()).await.unwrap_err();
    assert_eq!(err, CalmapError::connector("only", "HTTP 503"));
}
