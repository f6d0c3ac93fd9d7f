//! Inbound and outbound WebSocket event type definitions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chatrelay_entity::message::ChatMessage;
use chatrelay_entity::presence::PresenceEntry;

/// Events sent by the client to the server.
///
/// Inbound payloads are converted into these strict shapes at the
/// boundary; anything that does not conform is rejected with an
/// [`ServerEvent::Error`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Switch the session's active room.
    JoinRoom {
        /// Target room name.
        room: String,
    },
    /// Send a room or direct message.
    Message {
        /// Message body.
        text: String,
        /// Recipient user ID; presence makes this a direct message.
        #[serde(default)]
        to: Option<Uuid>,
        /// Explicit room override; defaults to the session's current room.
        #[serde(default)]
        room: Option<String>,
    },
    /// Update the session's typing state.
    Typing {
        /// Whether the user is typing.
        is_typing: bool,
    },
}

/// Events sent by the server to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Room backlog delivered on connect and on room join (≤ page size).
    MessageHistory {
        /// Messages in arrival order.
        messages: Vec<ChatMessage>,
    },
    /// Live presence list for a room, after join/leave/disconnect.
    UserList {
        /// One entry per session in the room.
        users: Vec<PresenceEntry>,
    },
    /// A message broadcast to the session's room.
    RoomMessage {
        /// The message.
        message: ChatMessage,
    },
    /// A direct message, delivered immediately or replayed on reconnect.
    PrivateMessage {
        /// The message.
        message: ChatMessage,
    },
    /// Typing state change for a room member.
    Typing {
        /// User whose state changed.
        user_id: Uuid,
        /// Username.
        username: String,
        /// New typing state.
        is_typing: bool,
    },
    /// Non-fatal rejection of a client action.
    Error {
        /// Human-readable reason.
        message: String,
        /// Server time in milliseconds.
        timestamp: i64,
    },
    /// Fatal authentication failure; the connection closes after this.
    AuthError {
        /// Failure reason (e.g. `"jwt expired"`).
        reason: String,
    },
}
