//! Canonical unordered pair key for direct conversations.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order-independent identifier for a two-user conversation.
///
/// The two participant IDs are stored sorted, so the key built from
/// (A, B) equals the key built from (B, A) and both sides share one
/// conversation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairKey(Uuid, Uuid);

impl PairKey {
    /// Canonicalize a pair of user IDs into a key.
    pub fn new(a: Uuid, b: Uuid) -> Self {
        if a <= b { Self(a, b) } else { Self(b, a) }
    }

    /// Whether the given user is one of the two participants.
    pub fn contains(&self, user_id: Uuid) -> bool {
        self.0 == user_id || self.1 == user_id
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.0, self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_is_order_independent() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(PairKey::new(a, b), PairKey::new(b, a));
    }

    #[test]
    fn test_pair_key_contains_both_participants() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let key = PairKey::new(a, b);
        assert!(key.contains(a));
        assert!(key.contains(b));
        assert!(!key.contains(Uuid::new_v4()));
    }

    #[test]
    fn test_pair_key_self_conversation() {
        let a = Uuid::new_v4();
        let key = PairKey::new(a, a);
        assert!(key.contains(a));
    }
}
