use async_trait::async_trait;

use super::{UserChanges, UserRecord};
use crate::shared::DomainResult;

/// Persistence gateway for the `users` collection.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All accounts ordered by id ascending.
    async fn list_users(&self) -> DomainResult<Vec<UserRecord>>;
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<UserRecord>>;
    /// Exact match on the stored (already normalized) email.
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<UserRecord>>;

    /// Insert a new record. Fails with `DomainError::Conflict` when the id or
    /// the email is already taken at write time.
    async fn insert_user(&self, user: UserRecord) -> DomainResult<()>;
    /// Returns `None` when no record has the given id.
    async fn update_user(&self, id: i64, changes: UserChanges) -> DomainResult<Option<UserRecord>>;
    /// Returns `false` when nothing was deleted.
    async fn delete_user(&self, id: i64) -> DomainResult<bool>;

    async fn count_users(&self) -> DomainResult<u64>;
    /// Highest id ever assigned, deleted accounts included.
    async fn highest_user_id(&self) -> DomainResult<Option<i64>>;
}
