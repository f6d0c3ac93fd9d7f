//! Presence and typing broadcaster.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::message::types::ServerEvent;
use crate::session::handle::SessionHandle;
use crate::session::registry::SessionRegistry;

/// Derives and emits room presence and typing-state events.
#[derive(Debug)]
pub struct PresenceBroadcaster {
    /// Session registry to derive membership from.
    registry: Arc<SessionRegistry>,
    /// Delay before a typing indicator auto-clears.
    typing_clear: Duration,
}

impl PresenceBroadcaster {
    /// Creates a broadcaster over the given registry.
    pub fn new(registry: Arc<SessionRegistry>, typing_clear_ms: u64) -> Self {
        Self {
            registry,
            typing_clear: Duration::from_millis(typing_clear_ms),
        }
    }

    /// Sends the derived presence list to every member of a room.
    ///
    /// Invoked after join, leave, and disconnect.
    pub async fn broadcast_user_list(&self, room: &str) {
        let users = self.registry.presence_of(room).await;
        let members = self.registry.in_room(room).await;
        debug!(room = %room, members = members.len(), "Broadcasting user list");
        for member in members {
            member.send(ServerEvent::UserList {
                users: users.clone(),
            });
        }
    }

    /// Updates a session's typing flag and broadcasts the change to its
    /// room. This never touches the room log.
    ///
    /// A `true` toggle schedules a deferred auto-clear. The clear
    /// captures the toggle's generation and fires only if no newer
    /// toggle has happened since, so a stale timer never wipes out a
    /// fresher typing state.
    pub async fn set_typing(&self, session: &Arc<SessionHandle>, is_typing: bool) {
        let generation = session.set_typing(is_typing);
        self.broadcast_typing(session, is_typing).await;

        if is_typing {
            let registry = Arc::clone(&self.registry);
            let session = Arc::clone(session);
            let delay = self.typing_clear;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                if session.typing_generation() != generation {
                    return;
                }
                if registry.get(&session.id).is_none() {
                    // Disconnected while the timer was pending.
                    return;
                }
                session.set_typing(false);
                let room = session.current_room().await;
                debug!(conn_id = %session.id, room = %room, "Typing auto-cleared");
                let event = ServerEvent::Typing {
                    user_id: session.user_id,
                    username: session.username.clone(),
                    is_typing: false,
                };
                for member in registry.in_room(&room).await {
                    member.send(event.clone());
                }
            });
        }
    }

    /// Emits the session's typing state to everyone in its room.
    pub async fn broadcast_typing(&self, session: &SessionHandle, is_typing: bool) {
        let room = session.current_room().await;
        let event = ServerEvent::Typing {
            user_id: session.user_id,
            username: session.username.clone(),
            is_typing,
        };
        for member in self.registry.in_room(&room).await {
            member.send(event.clone());
        }
    }

    /// Final typing=false broadcast for a session that disconnected
    /// while marked typing. Bumping the generation here also invalidates
    /// any pending auto-clear.
    pub async fn clear_typing_on_disconnect(&self, session: &SessionHandle) {
        if session.is_typing() {
            session.set_typing(false);
            self.broadcast_typing(session, false).await;
        }
    }
}
