use std::sync::Arc;
use std::time::Duration;

use calmap::{Calmap, CalmapError, ErrorKind, FetchStrategy, RemapRequest};
use calmap_mock::{DynamicMockConnector, MockBehavior, MockConnector};

use crate::helpers::{d, series};

fn req() -> RemapRequest {
    RemapRequest::new("X", "Value", ["2020-01-10"])
}

#[tokio::test(start_paused = true)]
async fn hanging_provider_times_out() {
    let (conn, ctrl) = DynamicMockConnector::new_with_controller("hang");
    ctrl.set_series_behavior("X", MockBehavior::Hang).await;
    let calmap = Calmap::builder()
        .with_connector(conn)
        .provider_timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let err = calmap.remap(&req()).await.unwrap_err();
    assert!(
        matches!(err, CalmapError::AllProvidersTimedOut { ref capability } if capability == "series"),
        "{err:?}"
    );
    assert_eq!(err.kind(), ErrorKind::Upstream);
}

#[tokio::test(start_paused = true)]
async fn timeout_falls_back_to_the_next_provider() {
    let (hang, hang_ctrl) = DynamicMockConnector::new_with_controller("hang");
    hang_ctrl.set_series_behavior("X", MockBehavior::Hang).await;
    let (ok, ok_ctrl) = DynamicMockConnector::new_with_controller("ok");
    ok_ctrl
        .set_series_behavior("X", MockBehavior::Return(series(&[("2020-01-02", 5.0)])))
        .await;
    let calmap = Calmap::builder()
        .with_connector(hang)
        .with_connector(ok)
        .provider_timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let resp = calmap.remap(&req()).await.unwrap();
    assert_eq!(resp.scalars(), vec![(d(2020, 1, 10), 5.0)]);
    assert_eq!(hang_ctrl.requests().await.len(), 1);
    assert_eq!(ok_ctrl.requests().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn slow_fixture_connector_times_out() {
    let calmap = Calmap::builder()
        .with_connector(Arc::new(
            MockConnector::new().with_latency(Duration::from_millis(200)),
        ))
        .provider_timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    let err = calmap
        .remap(&RemapRequest::new("TIMEOUT", "Value", ["2020-01-10"]))
        .await
        .unwrap_err();
    assert!(matches!(err, CalmapError::AllProvidersTimedOut { .. }), "{err:?}");
}

#[tokio::test(start_paused = true)]
async fn request_deadline_bounds_the_provider_phase() {
    for strategy in [FetchStrategy::PriorityWithFallback, FetchStrategy::Latency] {
        let (a, a_ctrl) = DynamicMockConnector::new_with_controller("a");
        a_ctrl.set_series_behavior("X", MockBehavior::Hang).await;
        let (b, b_ctrl) = DynamicMockConnector::new_with_controller("b");
        b_ctrl.set_series_behavior("X", MockBehavior::Hang).await;
        let calmap = Calmap::builder()
            .with_connector(a)
            .with_connector(b)
            .fetch_strategy(strategy)
            .provider_timeout(Duration::from_secs(10))
            .request_timeout(Duration::from_millis(100))
            .build()
            .unwrap();

        let err = calmap.remap(&req()).await.unwrap_err();
        assert!(
            matches!(err, CalmapError::RequestTimeout { .. }),
            "{strategy:?}: {err:?}"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn timeouts_are_rejected_on_the_json_surface() {
    let (conn, ctrl) = DynamicMockConnector::new_with_controller("hang");
    ctrl.set_series_behavior("X", MockBehavior::Hang).await;
    let calmap = Calmap::builder()
        .with_connector(conn)
        .provider_timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    let body = r#"{"symbol":"X","column":"Value","dates":["2020-01-10"]}"#;
    assert_eq!(calmap.handle_json(body).await, "invalid request");
}
