//! WebSocket upgrade handler.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::http::{HeaderMap, header};
use axum::response::Response;
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use tracing::{debug, error, warn};

use chatrelay_realtime::{ClientEvent, ServerEvent};

use crate::state::AppState;

/// Query parameters for the WebSocket handshake.
#[derive(Debug, serde::Deserialize)]
pub struct WsParams {
    /// JWT access token, used when no `Authorization` header is present.
    #[serde(default)]
    pub token: Option<String>,
    /// Initial room to join.
    #[serde(default)]
    pub room: Option<String>,
}

/// GET /ws — WebSocket upgrade.
///
/// The token comes from the `Authorization: Bearer` header, falling back
/// to the `token` query parameter. Authentication happens after the
/// upgrade so failures can be reported as an `auth_error` event before
/// the socket closes.
pub async fn ws_handler(
    State(state): State<AppState>,
    Query(params): Query<WsParams>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Response {
    let token = bearer_token(&headers).map(str::to_string).or(params.token);
    ws.on_upgrade(move |socket| handle_ws_connection(state, socket, token, params.room))
}

/// Extracts a bearer token from the `Authorization` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Drives an established WebSocket connection.
async fn handle_ws_connection(
    state: AppState,
    socket: WebSocket,
    token: Option<String>,
    room: Option<String>,
) {
    let user = match state.gateway.authenticate(token.as_deref()).await {
        Ok(user) => user,
        Err(failure) => {
            warn!(reason = %failure, "WebSocket authentication failed");
            reject(socket, &failure.reason()).await;
            return;
        }
    };

    let (session, mut outbound_rx) = state.gateway.connect(&user, room).await;
    let conn_id = session.id;
    let (mut ws_tx, mut ws_rx) = socket.split();

    // Forward gateway events to the socket.
    let outbound_task = tokio::spawn(async move {
        while let Some(event) = outbound_rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    error!(error = %e, "Failed to encode outbound event");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(event) => state.gateway.handle_event(&conn_id, event).await,
                Err(e) => {
                    debug!(conn_id = %conn_id, error = %e, "Rejected malformed event");
                    session.send(ServerEvent::Error {
                        message: "Unsupported event payload".to_string(),
                        timestamp: Utc::now().timestamp_millis(),
                    });
                }
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    outbound_task.abort();
    state.gateway.disconnect(&conn_id).await;
}

/// Sends a final `auth_error` event and closes the socket.
async fn reject(mut socket: WebSocket, reason: &str) {
    let event = ServerEvent::AuthError {
        reason: reason.to_string(),
    };
    if let Ok(text) = serde_json::to_string(&event) {
        let _ = socket.send(Message::Text(text.into())).await;
    }
    let _ = socket.send(Message::Close(None)).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_non_bearer_authorization_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert_eq!(bearer_token(&headers), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
