//! Integration tests for the health endpoints.

use http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert!(response.body["version"].is_string());
}

#[tokio::test]
async fn test_detailed_health_reports_no_connections() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health/detailed", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["ws_connections"], 0);
    assert_eq!(response.body["online_users"], 0);
}

#[tokio::test]
async fn test_unknown_route_returns_not_found() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/rooms", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
