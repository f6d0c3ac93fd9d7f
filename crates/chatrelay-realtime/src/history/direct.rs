//! Per-pair direct message log with delivery tracking.

use dashmap::DashMap;
use uuid::Uuid;

use chatrelay_entity::message::{ChatMessage, PairKey};

/// Process-wide store of direct conversations, keyed by the canonical
/// unordered pair of participant user IDs.
///
/// The delivered flag on a stored message starts false and is set true
/// exactly once: either at append time (recipient online) or when the
/// recipient's backlog is drained on reconnect. A delivered message is
/// never replayed.
#[derive(Debug, Default)]
pub struct DirectMessageStore {
    /// Canonical pair key → ordered conversation log.
    conversations: DashMap<PairKey, Vec<ChatMessage>>,
}

impl DirectMessageStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a direct message to its pair's conversation.
    ///
    /// The caller sets `delivered` before appending when the recipient
    /// is online; offline messages are appended with `delivered = false`
    /// and picked up later by [`Self::take_undelivered`].
    pub fn append(&self, message: ChatMessage) -> Option<PairKey> {
        let to = message.to?;
        let key = PairKey::new(message.from, to);
        self.conversations.entry(key).or_default().push(message);
        Some(key)
    }

    /// Drains the undelivered backlog for a user.
    ///
    /// Scans every conversation the user participates in, marks each
    /// message addressed to them with `delivered = false` as delivered,
    /// and returns those messages in arrival order. The flag flip and
    /// the snapshot happen under the conversation's entry guard, so a
    /// message is handed out at most once even across concurrent
    /// reconnects.
    pub fn take_undelivered(&self, user_id: Uuid) -> Vec<ChatMessage> {
        let mut backlog = Vec::new();
        for mut entry in self.conversations.iter_mut() {
            if !entry.key().contains(user_id) {
                continue;
            }
            for message in entry.value_mut().iter_mut() {
                if message.to == Some(user_id) && !message.delivered {
                    message.delivered = true;
                    backlog.push(message.clone());
                }
            }
        }
        backlog.sort_by_key(|m| m.timestamp);
        backlog
    }

    /// Returns a snapshot of the conversation between two users.
    pub fn conversation(&self, a: Uuid, b: Uuid) -> Vec<ChatMessage> {
        self.conversations
            .get(&PairKey::new(a, b))
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Number of tracked conversations.
    pub fn conversation_count(&self) -> usize {
        self.conversations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_uses_canonical_key() {
        let store = DirectMessageStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        store.append(ChatMessage::direct(a, "alice", b, "hi", 1));
        store.append(ChatMessage::direct(b, "bob", a, "hello", 2));

        assert_eq!(store.conversation_count(), 1);
        let log = store.conversation(a, b);
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].text, "hi");
        assert_eq!(log[1].text, "hello");
    }

    #[test]
    fn test_room_message_is_not_stored() {
        let store = DirectMessageStore::new();
        let msg = ChatMessage::room_message(Uuid::new_v4(), "alice", "general", "hi", 1);
        assert!(store.append(msg).is_none());
        assert_eq!(store.conversation_count(), 0);
    }

    #[test]
    fn test_take_undelivered_marks_and_returns_once() {
        let store = DirectMessageStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        store.append(ChatMessage::direct(a, "alice", b, "first", 1));
        store.append(ChatMessage::direct(a, "alice", b, "second", 2));

        let backlog = store.take_undelivered(b);
        assert_eq!(backlog.len(), 2);
        assert_eq!(backlog[0].text, "first");
        assert!(backlog.iter().all(|m| m.delivered));

        // Second reconnect: nothing left to replay.
        assert!(store.take_undelivered(b).is_empty());
    }

    #[test]
    fn test_take_undelivered_skips_other_recipients() {
        let store = DirectMessageStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        store.append(ChatMessage::direct(a, "alice", b, "for bob", 1));

        // The sender reconnecting drains nothing.
        assert!(store.take_undelivered(a).is_empty());
        // Bob's backlog is intact.
        assert_eq!(store.take_undelivered(b).len(), 1);
    }

    #[test]
    fn test_delivered_at_append_is_not_replayed() {
        let store = DirectMessageStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let mut msg = ChatMessage::direct(a, "alice", b, "live", 1);
        msg.delivered = true;
        store.append(msg);

        assert!(store.take_undelivered(b).is_empty());
    }
}
