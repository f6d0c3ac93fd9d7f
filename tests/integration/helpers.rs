//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use chrono::Utc;
use http::{Request, StatusCode};
use jsonwebtoken::{EncodingKey, Header};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use chatrelay_auth::{Claims, InMemoryUserDirectory};
use chatrelay_core::config::AppConfig;
use chatrelay_core::traits::Directory;
use chatrelay_entity::User;

/// HS256 secret shared between the test app and minted tokens.
pub const TEST_SECRET: &str = "integration-test-secret";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: AppConfig,
    /// Seeded users lookup
    pub directory: Arc<InMemoryUserDirectory>,
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = TEST_SECRET.to_string();

        let directory = Arc::new(InMemoryUserDirectory::new());
        let router = chatrelay_api::build_app(
            config.clone(),
            Arc::clone(&directory) as Arc<dyn Directory<User>>,
        );

        Self {
            router,
            config,
            directory,
        }
    }

    /// Seed a user into the directory
    pub fn seed_user(&self, username: &str) -> User {
        let user = User::new(Uuid::new_v4(), username);
        self.directory.insert(user.clone());
        user
    }

    /// Mint a valid token for a user
    pub fn mint_token(&self, user: &User) -> String {
        let now = Utc::now().timestamp();
        encode_claims(&Claims {
            sub: user.id,
            iat: now,
            exp: now + 3600,
        })
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Serve the app on an ephemeral port, returning its WebSocket URL
pub async fn spawn_server(app: &TestApp) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read local addr");
    let router = app.router.clone();
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server error");
    });
    format!("ws://{addr}/ws")
}

/// Connected WebSocket client stream
pub type WsClient = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Open a WebSocket connection to the given URL
pub async fn ws_connect(url: &str) -> WsClient {
    let (ws, _) = tokio_tungstenite::connect_async(url)
        .await
        .expect("Failed to connect");
    ws
}

/// Receive the next JSON event from a WebSocket, skipping non-text frames
pub async fn recv_event(ws: &mut WsClient) -> Value {
    use futures::StreamExt;
    loop {
        let msg = tokio::time::timeout(std::time::Duration::from_secs(5), ws.next())
            .await
            .expect("Timed out waiting for event")
            .expect("Socket closed")
            .expect("Socket error");
        if msg.is_text() {
            let text = msg.to_text().expect("Text frame");
            return serde_json::from_str(text).expect("Valid JSON event");
        }
    }
}

/// Receive events until one with the given `type` tag arrives
pub async fn wait_for_event(ws: &mut WsClient, event_type: &str) -> Value {
    loop {
        let event = recv_event(ws).await;
        if event["type"] == event_type {
            return event;
        }
    }
}

/// Send a JSON event over a WebSocket
pub async fn send_event(ws: &mut WsClient, event: Value) {
    use futures::SinkExt;
    ws.send(tokio_tungstenite::tungstenite::Message::text(
        event.to_string(),
    ))
    .await
    .expect("Failed to send event");
}

/// Encode claims with the shared test secret
pub fn encode_claims(claims: &Claims) -> String {
    jsonwebtoken::encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("Failed to encode token")
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
