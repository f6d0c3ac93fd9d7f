//! Bounded per-room message log.

use std::collections::VecDeque;

use dashmap::DashMap;

use chatrelay_entity::message::ChatMessage;

/// Process-wide store of per-room message logs.
///
/// Logs are created lazily on first append and live for the process
/// lifetime. Each log is capped; appending past the cap evicts the
/// oldest entry. Append and eviction happen under the same map-entry
/// guard, so the cap holds under concurrent senders.
#[derive(Debug)]
pub struct RoomHistoryStore {
    /// Room name → ordered message log.
    rooms: DashMap<String, VecDeque<ChatMessage>>,
    /// Maximum retained messages per room.
    capacity: usize,
}

impl RoomHistoryStore {
    /// Creates a store with the given per-room capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            rooms: DashMap::new(),
            capacity,
        }
    }

    /// Appends a message to a room's log, evicting the oldest entry if
    /// the log is at capacity.
    pub fn append(&self, room: &str, message: ChatMessage) {
        let mut log = self.rooms.entry(room.to_string()).or_default();
        log.push_back(message);
        while log.len() > self.capacity {
            log.pop_front();
        }
    }

    /// Returns the last `limit` messages of a room in arrival order.
    pub fn recent(&self, room: &str, limit: usize) -> Vec<ChatMessage> {
        self.rooms
            .get(room)
            .map(|log| {
                let skip = log.len().saturating_sub(limit);
                log.iter().skip(skip).cloned().collect()
            })
            .unwrap_or_default()
    }

    /// Number of retained messages for a room.
    pub fn len(&self, room: &str) -> usize {
        self.rooms.get(room).map(|log| log.len()).unwrap_or(0)
    }

    /// Whether a room has no retained messages.
    pub fn is_empty(&self, room: &str) -> bool {
        self.len(room) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn msg(room: &str, text: &str, ts: i64) -> ChatMessage {
        ChatMessage::room_message(Uuid::new_v4(), "alice", room, text, ts)
    }

    #[test]
    fn test_append_and_recent_order() {
        let store = RoomHistoryStore::new(1000);
        for i in 0..5 {
            store.append("general", msg("general", &format!("m{i}"), i));
        }

        let recent = store.recent("general", 3);
        let texts: Vec<&str> = recent.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["m2", "m3", "m4"]);
    }

    #[test]
    fn test_cap_evicts_oldest_first() {
        let store = RoomHistoryStore::new(1000);
        for i in 0..1100 {
            store.append("general", msg("general", &format!("m{i}"), i));
        }

        assert_eq!(store.len("general"), 1000);
        let recent = store.recent("general", 1000);
        assert_eq!(recent.first().unwrap().text, "m100");
        assert_eq!(recent.last().unwrap().text, "m1099");
    }

    #[test]
    fn test_unknown_room_is_empty() {
        let store = RoomHistoryStore::new(1000);
        assert!(store.recent("nowhere", 50).is_empty());
        assert!(store.is_empty("nowhere"));
    }

    #[test]
    fn test_rooms_are_independent() {
        let store = RoomHistoryStore::new(1000);
        store.append("general", msg("general", "hello", 1));
        store.append("random", msg("random", "hi", 2));

        assert_eq!(store.len("general"), 1);
        assert_eq!(store.len("random"), 1);
        assert_eq!(store.recent("general", 50)[0].text, "hello");
    }
}
