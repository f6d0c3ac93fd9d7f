//! Integration tests for WebSocket connection and messaging.

use http::StatusCode;
use serde_json::json;

use crate::helpers::{
    self, TestApp, recv_event, send_event, spawn_server, wait_for_event, ws_connect,
};

#[tokio::test]
async fn test_plain_http_request_to_ws_is_rejected() {
    let app = TestApp::new();

    // No upgrade headers: the handshake itself must fail.
    let response = app.request("GET", "/ws", None, None).await;

    assert!(
        response.status == StatusCode::BAD_REQUEST
            || response.status == StatusCode::UPGRADE_REQUIRED,
        "Expected 400 or 426, got {}",
        response.status
    );
}

#[tokio::test]
async fn test_missing_token_gets_auth_error_then_close() {
    let app = TestApp::new();
    let url = spawn_server(&app).await;

    let mut ws = ws_connect(&url).await;
    let event = recv_event(&mut ws).await;

    assert_eq!(event["type"], "auth_error");
    assert_eq!(event["reason"], "missing token");
}

#[tokio::test]
async fn test_expired_token_gets_identifiable_reason() {
    let app = TestApp::new();
    let user = app.seed_user("alice");
    let url = spawn_server(&app).await;

    let now = chrono::Utc::now().timestamp();
    let expired = helpers::encode_claims(&chatrelay_auth::Claims {
        sub: user.id,
        iat: now - 7200,
        exp: now - 3600,
    });

    let mut ws = ws_connect(&format!("{url}?token={expired}")).await;
    let event = recv_event(&mut ws).await;

    assert_eq!(event["type"], "auth_error");
    assert_eq!(event["reason"], "jwt expired");
}

#[tokio::test]
async fn test_connect_with_query_token_receives_history_and_presence() {
    let app = TestApp::new();
    let user = app.seed_user("alice");
    let token = app.mint_token(&user);
    let url = spawn_server(&app).await;

    let mut ws = ws_connect(&format!("{url}?token={token}")).await;

    let history = recv_event(&mut ws).await;
    assert_eq!(history["type"], "message_history");
    assert_eq!(history["messages"].as_array().unwrap().len(), 0);

    let user_list = recv_event(&mut ws).await;
    assert_eq!(user_list["type"], "user_list");
    assert_eq!(user_list["users"][0]["username"], "alice");
}

#[tokio::test]
async fn test_connect_with_authorization_header() {
    use tokio_tungstenite::tungstenite::client::IntoClientRequest;

    let app = TestApp::new();
    let user = app.seed_user("alice");
    let token = app.mint_token(&user);
    let url = spawn_server(&app).await;

    let mut request = url.into_client_request().expect("Failed to build request");
    request.headers_mut().insert(
        "Authorization",
        format!("Bearer {token}").parse().expect("Header value"),
    );
    let (mut ws, _) = tokio_tungstenite::connect_async(request)
        .await
        .expect("Failed to connect");

    let history = recv_event(&mut ws).await;
    assert_eq!(history["type"], "message_history");
}

#[tokio::test]
async fn test_room_message_round_trip() {
    let app = TestApp::new();
    let alice = app.seed_user("alice");
    let bob = app.seed_user("bob");
    let url = spawn_server(&app).await;

    let mut alice_ws = ws_connect(&format!("{url}?token={}", app.mint_token(&alice))).await;
    let mut bob_ws = ws_connect(&format!("{url}?token={}", app.mint_token(&bob))).await;

    // Wait until bob is fully joined before sending.
    wait_for_event(&mut bob_ws, "user_list").await;

    send_event(
        &mut alice_ws,
        json!({"type": "message", "text": "  hello everyone  "}),
    )
    .await;

    let received = wait_for_event(&mut bob_ws, "room_message").await;
    assert_eq!(received["message"]["text"], "hello everyone");
    assert_eq!(received["message"]["from_username"], "alice");
    assert_eq!(received["message"]["room"], "general");

    let echoed = wait_for_event(&mut alice_ws, "room_message").await;
    assert_eq!(echoed["message"]["text"], "hello everyone");
}

#[tokio::test]
async fn test_direct_message_round_trip() {
    let app = TestApp::new();
    let alice = app.seed_user("alice");
    let bob = app.seed_user("bob");
    let url = spawn_server(&app).await;

    let mut alice_ws = ws_connect(&format!("{url}?token={}", app.mint_token(&alice))).await;
    let mut bob_ws = ws_connect(&format!("{url}?token={}", app.mint_token(&bob))).await;
    wait_for_event(&mut bob_ws, "user_list").await;

    send_event(
        &mut alice_ws,
        json!({"type": "message", "text": "psst", "to": bob.id}),
    )
    .await;

    let received = wait_for_event(&mut bob_ws, "private_message").await;
    assert_eq!(received["message"]["text"], "psst");
    assert_eq!(received["message"]["delivered"], true);
}
