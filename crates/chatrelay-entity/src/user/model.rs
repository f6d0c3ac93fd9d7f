//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user as seen through the external identity directory.
///
/// The relay reads users; it never stores credentials or verifies
/// passwords. Those concerns live in the external users service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique login name, also used as the display name in chat.
    pub username: String,
    /// When the user was created in the directory.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build a user record from directory data.
    pub fn new(id: Uuid, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            created_at: Utc::now(),
        }
    }
}
