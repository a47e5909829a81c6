//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider` — unified access to all per-collection repositories
//! - `DomainResult` — standard result type for domain operations

use async_trait::async_trait;

use super::reading::ReadingRepository;
use super::user::UserRepository;
pub use crate::shared::errors::DomainResult;

/// Provides access to all domain repositories.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let user = repos.users().find_by_id(1).await?;
///     let total = repos.readings().count_readings().await?;
/// }
/// ```
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn readings(&self) -> &dyn ReadingRepository;

    /// Round-trip to the backing store.
    async fn ping(&self) -> DomainResult<()>;
}
