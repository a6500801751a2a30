//! Health and metrics endpoints

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{json_body, TestApp};

#[tokio::test]
async fn test_health_check_returns_ok() {
    let app = TestApp::new().await;
    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_liveness_reports_alive() {
    let app = TestApp::new().await;
    let response = app.get("/health/live").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "alive");
}

#[tokio::test]
async fn test_readiness_fails_without_database() {
    let app = TestApp::new().await;
    let response = app.get("/health/ready").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["checks"]["database"]["status"], "unhealthy");
    assert_eq!(body["checks"]["redis"]["status"], "degraded");
    assert_eq!(body["delivery"]["events"], "dropped");
    assert_eq!(body["delivery"]["presence"], "offline");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = TestApp::new().await;
    app.get("/health/live").await;

    let response = app.get("/metrics").await;
    assert_eq!(response.status(), StatusCode::OK);
}
