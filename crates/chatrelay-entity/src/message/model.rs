//! Chat message entity model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single chat message, room-addressed or direct.
///
/// Exactly one of `room` / `to` is meaningful per message. The struct is
/// immutable after construction except for the `delivered` flag, which
/// the direct message store flips once on first delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Sender user ID.
    pub from: Uuid,
    /// Sender display name, cached at send time.
    pub from_username: String,
    /// Recipient user ID; present on direct messages only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Uuid>,
    /// Room name; present on room messages only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    /// Message body, trimmed, 1 to 2000 characters.
    pub text: String,
    /// Wall-clock send time in milliseconds since the epoch. Doubles as
    /// a dedup hint on the sending client.
    pub timestamp: i64,
    /// Whether a direct message has reached a live recipient session.
    #[serde(default)]
    pub delivered: bool,
}

impl ChatMessage {
    /// Build a room-addressed message.
    pub fn room_message(
        from: Uuid,
        from_username: impl Into<String>,
        room: impl Into<String>,
        text: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            from,
            from_username: from_username.into(),
            to: None,
            room: Some(room.into()),
            text: text.into(),
            timestamp,
            delivered: false,
        }
    }

    /// Build a direct message addressed to a single user.
    pub fn direct(
        from: Uuid,
        from_username: impl Into<String>,
        to: Uuid,
        text: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            from,
            from_username: from_username.into(),
            to: Some(to),
            room: None,
            text: text.into(),
            timestamp,
            delivered: false,
        }
    }

    /// Whether this message is addressed to a specific user.
    pub fn is_direct(&self) -> bool {
        self.to.is_some()
    }
}
