use async_trait::async_trait;

use super::{Reading, ReadingFilter};
use crate::shared::DomainResult;

/// Read-only gateway for the sensor readings collection.
#[async_trait]
pub trait ReadingRepository: Send + Sync {
    /// Up to `limit` readings matching `filter`, newest first.
    async fn find_latest(&self, filter: &ReadingFilter, limit: u64) -> DomainResult<Vec<Reading>>;
    async fn count_readings(&self) -> DomainResult<u64>;
}
