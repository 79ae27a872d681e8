//! Health Check API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{body_json, TestApp};

#[tokio::test]
async fn test_health_check_returns_ok() {
    let app = TestApp::new();

    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_liveness_probe() {
    let app = TestApp::new();

    let response = app.get("/health/live").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "alive");
}

#[tokio::test]
async fn test_readiness_degrades_without_storage_root() {
    let app = TestApp::new();

    // Nothing has been uploaded, so the local root does not exist yet.
    let response = app.get("/health/ready").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["records"]["status"], "healthy");
    assert_eq!(body["checks"]["storage"]["status"], "degraded");
}

#[tokio::test]
async fn test_readiness_healthy_with_storage_root() {
    let app = TestApp::new();
    std::fs::create_dir_all(&app.state.settings.storage.local_root).unwrap();

    let response = app.get("/health/ready").await;

    assert_eq!(body_json(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_metrics_endpoint_reports_requests() {
    let app = TestApp::new();
    app.get("/health").await;

    let response = app.get("/metrics").await;

    assert_eq!(response.status(), StatusCode::OK);
    let text = String::from_utf8(crate::common::body_bytes(response).await).unwrap();
    assert!(text.contains("visa_intake_http_requests_total"));
}
