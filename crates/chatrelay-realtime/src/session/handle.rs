//! Individual connected-session handle.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use chatrelay_entity::presence::PresenceEntry;

use crate::message::types::ServerEvent;

/// Unique connection identifier.
pub type ConnectionId = Uuid;

/// One live connection's session state.
///
/// Holds the sender channel for pushing events to the client plus the
/// per-session mutable state: current room, last accepted message time,
/// and the typing flag with its generation counter. A user may own
/// several handles at once (multiple devices); each is independent.
#[derive(Debug)]
pub struct SessionHandle {
    /// Unique connection ID.
    pub id: ConnectionId,
    /// User who owns this connection.
    pub user_id: Uuid,
    /// Username, cached at authentication time.
    pub username: String,
    /// Sender for outbound events.
    sender: mpsc::Sender<ServerEvent>,
    /// Current room name.
    room: RwLock<String>,
    /// Timestamp (ms) of the last rate-limit-accepted message.
    last_accepted_ms: AtomicI64,
    /// Whether the user is currently typing.
    typing: AtomicBool,
    /// Bumped on every typing change; a deferred auto-clear only fires
    /// if the generation it captured is still current.
    typing_generation: AtomicU64,
    /// Whether the connection is still alive.
    alive: AtomicBool,
    /// When the connection was established.
    pub connected_at: DateTime<Utc>,
}

impl SessionHandle {
    /// Creates a new session handle in the given room.
    pub fn new(
        user_id: Uuid,
        username: String,
        room: String,
        sender: mpsc::Sender<ServerEvent>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            username,
            sender,
            room: RwLock::new(room),
            last_accepted_ms: AtomicI64::new(0),
            typing: AtomicBool::new(false),
            typing_generation: AtomicU64::new(0),
            alive: AtomicBool::new(true),
            connected_at: Utc::now(),
        }
    }

    /// Sends an event to this connection, dropping it if the buffer is
    /// full and marking the handle dead if the receiver is gone.
    pub fn send(&self, event: ServerEvent) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "Send buffer full, dropping event");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                false
            }
        }
    }

    /// Whether the connection is still alive.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Marks the connection as dead.
    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Returns the session's current room.
    pub async fn current_room(&self) -> String {
        self.room.read().await.clone()
    }

    /// Moves the session to a new room, returning the room it left.
    pub async fn set_room(&self, room: String) -> String {
        let mut current = self.room.write().await;
        std::mem::replace(&mut *current, room)
    }

    /// Timestamp (ms) of the last accepted message.
    pub fn last_accepted_ms(&self) -> i64 {
        self.last_accepted_ms.load(Ordering::SeqCst)
    }

    /// Records acceptance of a message at the given time, failing if
    /// another acceptance raced in between.
    pub fn try_record_accepted(&self, previous_ms: i64, now_ms: i64) -> bool {
        self.last_accepted_ms
            .compare_exchange(previous_ms, now_ms, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Whether the user is currently typing.
    pub fn is_typing(&self) -> bool {
        self.typing.load(Ordering::SeqCst)
    }

    /// Sets the typing flag and bumps the generation counter, returning
    /// the new generation.
    pub fn set_typing(&self, is_typing: bool) -> u64 {
        self.typing.store(is_typing, Ordering::SeqCst);
        self.typing_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Current typing generation.
    pub fn typing_generation(&self) -> u64 {
        self.typing_generation.load(Ordering::SeqCst)
    }

    /// Derives this session's presence entry.
    pub fn presence_entry(&self) -> PresenceEntry {
        PresenceEntry {
            user_id: self.user_id,
            username: self.username.clone(),
            typing: self.is_typing(),
        }
    }
}
