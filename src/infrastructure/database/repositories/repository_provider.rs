//! SeaORM implementation of RepositoryProvider

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::domain::{DomainResult, ReadingRepository, RepositoryProvider, UserRepository};

use super::reading_repository::SeaOrmReadingRepository;
use super::user_repository::{db_err, SeaOrmUserRepository};

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-collection repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone(), "sensor_readings");
/// let user = repos.users().find_by_email("ana@farm.io").await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    db: DatabaseConnection,
    users: SeaOrmUserRepository,
    readings: SeaOrmReadingRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection, readings_table: &str) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            readings: SeaOrmReadingRepository::new(db.clone(), readings_table),
            db,
        }
    }

    /// Concrete readings gateway, for table setup and seeding.
    pub fn reading_store(&self) -> &SeaOrmReadingRepository {
        &self.readings
    }
}

#[async_trait]
impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn readings(&self) -> &dyn ReadingRepository {
        &self.readings
    }

    async fn ping(&self) -> DomainResult<()> {
        self.db.ping().await.map_err(db_err)
    }
}
