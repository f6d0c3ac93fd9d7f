//! In-memory user directory.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use chatrelay_core::result::AppResult;
use chatrelay_core::traits::Directory;
use chatrelay_entity::user::User;

/// In-process stand-in for the external users service.
///
/// Holds a read-mostly snapshot of known users. Production deployments
/// would back the [`Directory`] trait with the real identity service;
/// the relay only ever reads through the trait.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    /// User ID → user record.
    by_id: DashMap<Uuid, User>,
    /// Username → user ID (reverse index).
    by_name: DashMap<String, Uuid>,
}

impl InMemoryUserDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a user record.
    pub fn insert(&self, user: User) {
        self.by_name.insert(user.username.clone(), user.id);
        self.by_id.insert(user.id, user);
    }

    /// Returns the number of known users.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the directory holds no users.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[async_trait]
impl Directory<User> for InMemoryUserDirectory {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.by_id.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let Some(id) = self.by_name.get(username).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        Ok(self.by_id.get(&id).map(|entry| entry.value().clone()))
    }
}
