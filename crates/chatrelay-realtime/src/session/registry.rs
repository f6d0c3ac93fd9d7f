//! Session registry: the single source of truth for who is online.

use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use chatrelay_entity::presence::PresenceEntry;

use super::handle::{ConnectionId, SessionHandle};

/// Thread-safe registry of all live sessions, indexed by connection ID
/// and by user ID.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    /// Connection ID → session handle.
    by_id: DashMap<ConnectionId, Arc<SessionHandle>>,
    /// User ID → that user's session handles (one per device).
    by_user: DashMap<Uuid, Vec<Arc<SessionHandle>>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session. At most one entry per connection ID.
    pub fn register(&self, handle: Arc<SessionHandle>) {
        self.by_id.insert(handle.id, handle.clone());
        self.by_user.entry(handle.user_id).or_default().push(handle);
    }

    /// Removes a session, returning its handle if it was registered.
    pub fn unregister(&self, conn_id: &ConnectionId) -> Option<Arc<SessionHandle>> {
        let (_, handle) = self.by_id.remove(conn_id)?;
        if let Some(mut sessions) = self.by_user.get_mut(&handle.user_id) {
            sessions.retain(|s| s.id != *conn_id);
            if sessions.is_empty() {
                drop(sessions);
                self.by_user.remove(&handle.user_id);
            }
        }
        Some(handle)
    }

    /// Looks up a session by connection ID.
    pub fn get(&self, conn_id: &ConnectionId) -> Option<Arc<SessionHandle>> {
        self.by_id.get(conn_id).map(|entry| entry.value().clone())
    }

    /// All sessions belonging to a user, across all rooms.
    pub fn sessions_of(&self, user_id: &Uuid) -> Vec<Arc<SessionHandle>> {
        self.by_user
            .get(user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Any live session of a user, if one exists.
    pub fn any_session_of(&self, user_id: &Uuid) -> Option<Arc<SessionHandle>> {
        self.sessions_of(user_id).into_iter().find(|s| s.is_alive())
    }

    /// Whether a user currently has at least one session.
    pub fn is_user_connected(&self, user_id: &Uuid) -> bool {
        self.by_user.contains_key(user_id)
    }

    /// All sessions whose current room equals `room`.
    pub async fn in_room(&self, room: &str) -> Vec<Arc<SessionHandle>> {
        let all: Vec<Arc<SessionHandle>> = self
            .by_id
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        let mut members = Vec::new();
        for session in all {
            if session.current_room().await == room {
                members.push(session);
            }
        }
        members
    }

    /// Derived presence list for a room.
    pub async fn presence_of(&self, room: &str) -> Vec<PresenceEntry> {
        self.in_room(room)
            .await
            .iter()
            .map(|s| s.presence_entry())
            .collect()
    }

    /// Total number of live sessions.
    pub fn session_count(&self) -> usize {
        self.by_id.len()
    }

    /// Number of unique connected users.
    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }
}
