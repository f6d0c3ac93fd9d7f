//! Generic directory trait for external identity lookup.

use async_trait::async_trait;
use uuid::Uuid;

use crate::result::AppResult;

/// Read-only lookup into an external identity store.
///
/// The relay never creates or mutates users; credential storage and
/// password verification live in a separate service. This trait is
/// defined generically so the entity crate can supply the concrete
/// user type without a dependency cycle.
#[async_trait]
pub trait Directory<Entity>: Send + Sync + 'static
where
    Entity: Send + Sync + 'static,
{
    /// Find an entity by its primary identifier.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Entity>>;

    /// Find an entity by its unique name.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Entity>>;
}
