//! In-memory storage implementation
//!
//! Mirrors the SeaORM gateway's constraints (unique id, unique email,
//! id high-water mark) under a single write lock. Used by `--memory` mode and
//! by tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    DomainError, DomainResult, Reading, ReadingFilter, ReadingRepository, RepositoryProvider,
    UserChanges, UserRecord, UserRepository,
};

#[derive(Default)]
struct UserTable {
    rows: BTreeMap<i64, UserRecord>,
    high_water: Option<i64>,
}

/// Shared switch that makes every operation fail as if the store went away.
#[derive(Clone, Default)]
struct OfflineSwitch(Arc<AtomicBool>);

impl OfflineSwitch {
    fn check(&self) -> DomainResult<()> {
        if self.0.load(Ordering::SeqCst) {
            Err(DomainError::StoreUnavailable("in-memory store marked offline".into()))
        } else {
            Ok(())
        }
    }
}

pub struct InMemoryUserRepository {
    table: RwLock<UserTable>,
    offline: OfflineSwitch,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list_users(&self) -> DomainResult<Vec<UserRecord>> {
        self.offline.check()?;
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<UserRecord>> {
        self.offline.check()?;
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<UserRecord>> {
        self.offline.check()?;
        Ok(self
            .table
            .read()
            .await
            .rows
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert_user(&self, user: UserRecord) -> DomainResult<()> {
        self.offline.check()?;
        let mut table = self.table.write().await;
        if table.rows.contains_key(&user.id) {
            return Err(DomainError::Conflict(format!("Account id {} already taken", user.id)));
        }
        if table.rows.values().any(|u| u.email == user.email) {
            return Err(DomainError::Conflict("Email already registered".into()));
        }
        table.high_water = table.high_water.max(Some(user.id));
        table.rows.insert(user.id, user);
        Ok(())
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> DomainResult<Option<UserRecord>> {
        self.offline.check()?;
        let mut table = self.table.write().await;
        if table
            .rows
            .values()
            .any(|u| u.id != id && u.email == changes.email)
        {
            return Err(DomainError::Conflict("Email already registered".into()));
        }
        let Some(record) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply_to(record);
        Ok(Some(record.clone()))
    }

    async fn delete_user(&self, id: i64) -> DomainResult<bool> {
        self.offline.check()?;
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }

    async fn count_users(&self) -> DomainResult<u64> {
        self.offline.check()?;
        Ok(self.table.read().await.rows.len() as u64)
    }

    async fn highest_user_id(&self) -> DomainResult<Option<i64>> {
        self.offline.check()?;
        let table = self.table.read().await;
        Ok(table.rows.keys().next_back().copied().max(table.high_water))
    }
}

pub struct InMemoryReadingRepository {
    rows: RwLock<Vec<Reading>>,
    offline: OfflineSwitch,
}

#[async_trait]
impl ReadingRepository for InMemoryReadingRepository {
    async fn find_latest(&self, filter: &ReadingFilter, limit: u64) -> DomainResult<Vec<Reading>> {
        self.offline.check()?;
        let mut matching: Vec<Reading> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|r| filter.matches(&r.created_at))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(matching)
    }

    async fn count_readings(&self) -> DomainResult<u64> {
        self.offline.check()?;
        Ok(self.rows.read().await.len() as u64)
    }
}

/// In-memory repository provider for development and testing
pub struct InMemoryRepositoryProvider {
    users: InMemoryUserRepository,
    readings: InMemoryReadingRepository,
    offline: OfflineSwitch,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        let offline = OfflineSwitch::default();
        Self {
            users: InMemoryUserRepository {
                table: RwLock::new(UserTable::default()),
                offline: offline.clone(),
            },
            readings: InMemoryReadingRepository {
                rows: RwLock::new(Vec::new()),
                offline: offline.clone(),
            },
            offline,
        }
    }

    /// Append readings as the ingestion process would.
    pub async fn seed_readings(&self, readings: impl IntoIterator<Item = Reading>) {
        self.readings.rows.write().await.extend(readings);
    }

    /// Simulate losing (or regaining) the backing store.
    pub fn set_offline(&self, offline: bool) {
        self.offline.0.store(offline, Ordering::SeqCst);
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RepositoryProvider for InMemoryRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn readings(&self) -> &dyn ReadingRepository {
        &self.readings
    }

    async fn ping(&self) -> DomainResult<()> {
        self.offline.check()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PasswordHash;

    fn record(id: i64, email: &str) -> UserRecord {
        UserRecord {
            id,
            name: "n".into(),
            email: email.into(),
            role: "r".into(),
            status: "s".into(),
            password_hash: PasswordHash::new("h"),
        }
    }

    #[tokio::test]
    async fn insert_enforces_unique_id_and_email() {
        let store = InMemoryRepositoryProvider::new();
        store.users().insert_user(record(1, "a@x.com")).await.unwrap();

        assert!(matches!(
            store.users().insert_user(record(1, "b@x.com")).await,
            Err(DomainError::Conflict(_))
        ));
        assert!(matches!(
            store.users().insert_user(record(2, "a@x.com")).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn deleted_ids_stay_reserved() {
        let store = InMemoryRepositoryProvider::new();
        store.users().insert_user(record(1, "a@x.com")).await.unwrap();
        store.users().insert_user(record(2, "b@x.com")).await.unwrap();
        store.users().delete_user(2).await.unwrap();

        assert_eq!(store.users().highest_user_id().await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn offline_store_fails_every_call() {
        let store = InMemoryRepositoryProvider::new();
        store.set_offline(true);

        assert!(matches!(store.ping().await, Err(DomainError::StoreUnavailable(_))));
        assert!(store.users().list_users().await.is_err());
        assert!(store.readings().count_readings().await.is_err());

        store.set_offline(false);
        assert!(store.ping().await.is_ok());
    }
}
