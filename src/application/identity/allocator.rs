//! Numeric account identity allocation

use std::sync::Arc;

use crate::domain::{DomainResult, RepositoryProvider};

/// Derives the next account id from the highest id the store has seen.
///
/// The value is provisional: two concurrent callers can receive the same id.
/// The store's primary-key constraint rejects the second insert, which then
/// surfaces as `DomainError::Conflict` instead of a duplicate account.
#[derive(Clone)]
pub struct IdentityAllocator {
    repos: Arc<dyn RepositoryProvider>,
}

impl IdentityAllocator {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// `highest + 1`, or `1` for a store that never held an account.
    pub async fn next_id(&self) -> DomainResult<i64> {
        let highest = self.repos.users().highest_user_id().await?;
        Ok(highest.map_or(1, |max| max + 1))
    }
}
