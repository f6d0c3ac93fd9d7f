//! Connection gateway: authentication, session lifecycle, and routing.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use chatrelay_auth::jwt::TokenValidator;
use chatrelay_core::config::RelayConfig;
use chatrelay_core::traits::Directory;
use chatrelay_entity::message::ChatMessage;
use chatrelay_entity::user::User;

use crate::connection::authenticator::{AuthFailure, ConnectionAuthenticator};
use crate::history::direct::DirectMessageStore;
use crate::history::room::RoomHistoryStore;
use crate::limiter::RateLimiter;
use crate::message::types::{ClientEvent, ServerEvent};
use crate::message::validator::validate_text;
use crate::presence::broadcaster::PresenceBroadcaster;
use crate::session::handle::{ConnectionId, SessionHandle};
use crate::session::registry::SessionRegistry;

/// Central orchestrator for the relay.
///
/// Owns the session registry, history stores, rate limiter, and presence
/// broadcaster, and drives the session lifecycle from authentication
/// through disconnect. Transport handlers hold this behind an `Arc` and
/// feed it decoded [`ClientEvent`]s.
pub struct ChatGateway {
    /// Relay tunables (room defaults, capacities, limits).
    config: RelayConfig,
    /// Token-to-user authentication.
    authenticator: ConnectionAuthenticator,
    /// Live session registry.
    sessions: Arc<SessionRegistry>,
    /// Bounded per-room message logs.
    rooms: RoomHistoryStore,
    /// Per-pair direct conversation logs.
    directs: DirectMessageStore,
    /// Per-session message rate gate.
    limiter: RateLimiter,
    /// Presence and typing fan-out.
    presence: PresenceBroadcaster,
}

impl ChatGateway {
    /// Creates a gateway from relay configuration and auth components.
    pub fn new(
        config: RelayConfig,
        validator: Arc<TokenValidator>,
        directory: Arc<dyn Directory<User>>,
    ) -> Self {
        let sessions = Arc::new(SessionRegistry::new());
        let limiter = RateLimiter::new(config.rate_limit_window_ms, config.rate_limit_max_messages);
        let presence = PresenceBroadcaster::new(Arc::clone(&sessions), config.typing_clear_ms);
        Self {
            authenticator: ConnectionAuthenticator::new(validator, directory),
            rooms: RoomHistoryStore::new(config.history_capacity),
            directs: DirectMessageStore::new(),
            sessions,
            limiter,
            presence,
            config,
        }
    }

    /// Session registry accessor, for health reporting.
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Resolves a bearer token to a known user.
    pub async fn authenticate(&self, token: Option<&str>) -> Result<User, AuthFailure> {
        self.authenticator.authenticate(token).await
    }

    /// Registers a session for an authenticated user and performs the
    /// connect sequence: room backlog, undelivered direct replay, and a
    /// presence update for the room.
    ///
    /// Returns the session handle and the receiver the transport drains
    /// into the socket.
    pub async fn connect(
        &self,
        user: &User,
        room: Option<String>,
    ) -> (Arc<SessionHandle>, mpsc::Receiver<ServerEvent>) {
        let room = room.unwrap_or_else(|| self.config.default_room.clone());
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);
        let session = Arc::new(SessionHandle::new(
            user.id,
            user.username.clone(),
            room.clone(),
            tx,
        ));
        self.sessions.register(session.clone());
        info!(conn_id = %session.id, user = %user.username, room = %room, "Session connected");

        session.send(ServerEvent::MessageHistory {
            messages: self.rooms.recent(&room, self.config.history_page_size),
        });

        let backlog = self.directs.take_undelivered(user.id);
        if !backlog.is_empty() {
            debug!(user = %user.username, count = backlog.len(), "Replaying undelivered messages");
        }
        for message in backlog {
            session.send(ServerEvent::PrivateMessage { message });
        }

        self.presence.broadcast_user_list(&room).await;
        (session, rx)
    }

    /// Handles one decoded client event for a connection.
    ///
    /// Events for unknown connections indicate an internal race with
    /// disconnect; they are logged and dropped.
    pub async fn handle_event(&self, conn_id: &ConnectionId, event: ClientEvent) {
        let Some(session) = self.sessions.get(conn_id) else {
            warn!(conn_id = %conn_id, "Event for unknown connection dropped");
            return;
        };

        match event {
            ClientEvent::JoinRoom { room } => self.join_room(&session, room).await,
            ClientEvent::Message { text, to, room } => {
                self.handle_message(&session, text, to, room).await;
            }
            ClientEvent::Typing { is_typing } => {
                self.presence.set_typing(&session, is_typing).await;
            }
        }
    }

    /// Moves a session to another room, updating presence on both sides
    /// and sending the new room's backlog.
    async fn join_room(&self, session: &Arc<SessionHandle>, room: String) {
        let previous = session.set_room(room.clone()).await;
        info!(conn_id = %session.id, from = %previous, to = %room, "Room changed");

        if previous != room {
            self.presence.broadcast_user_list(&previous).await;
        }
        session.send(ServerEvent::MessageHistory {
            messages: self.rooms.recent(&room, self.config.history_page_size),
        });
        self.presence.broadcast_user_list(&room).await;
    }

    /// Applies the rate limit and text validation, then routes.
    async fn handle_message(
        &self,
        session: &Arc<SessionHandle>,
        text: String,
        to: Option<Uuid>,
        room: Option<String>,
    ) {
        let now = Utc::now().timestamp_millis();

        if !self.limiter.check(session, now) {
            debug!(conn_id = %session.id, "Message rejected by rate limit");
            session.send(ServerEvent::Error {
                message: "Rate limit exceeded".to_string(),
                timestamp: now,
            });
            return;
        }

        let trimmed = match validate_text(&text) {
            Ok(trimmed) => trimmed.to_string(),
            Err(err) => {
                session.send(ServerEvent::Error {
                    message: err.message,
                    timestamp: now,
                });
                return;
            }
        };

        match to {
            Some(recipient) => self.route_direct(session, recipient, trimmed, now).await,
            None => self.route_room(session, room, trimmed, now).await,
        }
    }

    /// Stores a direct message, pushes it to a live recipient session if
    /// one exists, and echoes it back to the sender.
    async fn route_direct(&self, session: &Arc<SessionHandle>, to: Uuid, text: String, now: i64) {
        let mut message = ChatMessage::direct(session.user_id, &session.username, to, text, now);

        let recipient = self.sessions.any_session_of(&to);
        if recipient.is_some() {
            message.delivered = true;
        }
        self.directs.append(message.clone());

        if let Some(recipient) = recipient {
            recipient.send(ServerEvent::PrivateMessage {
                message: message.clone(),
            });
        } else {
            debug!(to = %to, "Recipient offline, message held for replay");
        }
        session.send(ServerEvent::PrivateMessage { message });
    }

    /// Appends a room message to its log and broadcasts it to the room.
    async fn route_room(
        &self,
        session: &Arc<SessionHandle>,
        room: Option<String>,
        text: String,
        now: i64,
    ) {
        let room = match room {
            Some(room) => room,
            None => session.current_room().await,
        };
        let message = ChatMessage::room_message(
            session.user_id,
            &session.username,
            room.clone(),
            text,
            now,
        );
        self.rooms.append(&room, message.clone());

        for member in self.sessions.in_room(&room).await {
            member.send(ServerEvent::RoomMessage {
                message: message.clone(),
            });
        }
    }

    /// Tears a session down: unregisters it, clears any typing state,
    /// and updates presence for the room it left.
    pub async fn disconnect(&self, conn_id: &ConnectionId) {
        let Some(session) = self.sessions.unregister(conn_id) else {
            return;
        };
        session.mark_dead();
        let room = session.current_room().await;
        info!(conn_id = %conn_id, user = %session.username, room = %room, "Session disconnected");

        self.presence.clear_typing_on_disconnect(&session).await;
        self.presence.broadcast_user_list(&room).await;
    }
}
