mod common;

use axum::http::{Method, StatusCode};

#[tokio::test]
async fn health_reports_ok_with_live_store() {
    let harness = common::test_app().await;

    let (status, body) = common::send(&harness.app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store_healthy"], true);
    assert!(body["version"].is_string());
}
