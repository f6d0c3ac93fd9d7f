//! Presence entry model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One member of a room's live presence list.
///
/// Derived on demand from the session registry; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceEntry {
    /// User ID.
    pub user_id: Uuid,
    /// Username.
    pub username: String,
    /// Whether the user is currently typing.
    pub typing: bool,
}
