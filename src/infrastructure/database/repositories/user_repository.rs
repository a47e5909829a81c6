use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};

use crate::domain::{DomainError, DomainResult, PasswordHash, UserChanges, UserRecord, UserRepository};
use crate::infrastructure::database::entities::{sequence, user};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn user_model_to_domain(model: user::Model) -> UserRecord {
    UserRecord {
        id: model.id,
        name: model.name,
        email: model.email,
        role: model.role,
        status: model.status,
        password_hash: PasswordHash::new(model.password_hash),
    }
}

pub(crate) fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::StoreUnavailable(e.to_string())
}

/// Unique-key violations become conflicts; everything else is a store failure.
fn write_err(e: sea_orm::DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            DomainError::Conflict(format!("Account id or email already taken ({})", detail))
        }
        _ => db_err(e),
    }
}

/// A row deleted between the lookup and the write is reported as missing.
fn updated_or_missing(result: Result<user::Model, sea_orm::DbErr>) -> DomainResult<Option<UserRecord>> {
    match result {
        Ok(model) => Ok(Some(user_model_to_domain(model))),
        Err(sea_orm::DbErr::RecordNotUpdated) => Ok(None),
        Err(e) => Err(write_err(e)),
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn list_users(&self) -> DomainResult<Vec<UserRecord>> {
        let models = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(user_model_to_domain).collect())
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<UserRecord>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<UserRecord>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn insert_user(&self, record: UserRecord) -> DomainResult<()> {
        let id = record.id;
        let txn = self.db.begin().await.map_err(db_err)?;

        user::ActiveModel {
            id: Set(record.id),
            name: Set(record.name),
            email: Set(record.email),
            role: Set(record.role),
            status: Set(record.status),
            password_hash: Set(record.password_hash.into_inner()),
        }
        .insert(&txn)
        .await
        .map_err(write_err)?;

        // Raise the high-water mark so ids of deleted accounts are never reissued
        let current = sequence::Entity::find_by_id(sequence::USERS_SEQUENCE.to_string())
            .one(&txn)
            .await
            .map_err(db_err)?;
        match current {
            Some(seq) if seq.value >= id => {}
            Some(seq) => {
                let mut active: sequence::ActiveModel = seq.into();
                active.value = Set(id);
                active.update(&txn).await.map_err(db_err)?;
            }
            None => {
                sequence::ActiveModel {
                    name: Set(sequence::USERS_SEQUENCE.to_string()),
                    value: Set(id),
                }
                .insert(&txn)
                .await
                .map_err(db_err)?;
            }
        }

        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> DomainResult<Option<UserRecord>> {
        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut active: user::ActiveModel = existing.into();
        active.name = Set(changes.name);
        active.email = Set(changes.email);
        active.role = Set(changes.role);
        active.status = Set(changes.status);
        if let Some(hash) = changes.password_hash {
            active.password_hash = Set(hash.into_inner());
        }

        updated_or_missing(active.update(&self.db).await)
    }

    async fn delete_user(&self, id: i64) -> DomainResult<bool> {
        let result = user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn count_users(&self) -> DomainResult<u64> {
        user::Entity::find().count(&self.db).await.map_err(db_err)
    }

    async fn highest_user_id(&self) -> DomainResult<Option<i64>> {
        let max_existing: Option<i64> = user::Entity::find()
            .select_only()
            .column_as(user::Column::Id.max(), "max_id")
            .into_tuple::<Option<i64>>()
            .one(&self.db)
            .await
            .map_err(db_err)?
            .flatten();

        let high_water = sequence::Entity::find_by_id(sequence::USERS_SEQUENCE.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(|s| s.value);

        Ok(max_existing.max(high_water))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::migrator::Migrator;
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    async fn repo() -> SeaOrmUserRepository {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        SeaOrmUserRepository::new(db)
    }

    fn record(id: i64, email: &str) -> UserRecord {
        UserRecord {
            id,
            name: format!("user{}", id),
            email: email.to_string(),
            role: "Operador".into(),
            status: "Ativo".into(),
            password_hash: PasswordHash::new("$2b$04$hash"),
        }
    }

    #[test]
    fn row_vanishing_before_update_reads_as_missing() {
        let outcome = updated_or_missing(Err(sea_orm::DbErr::RecordNotUpdated)).unwrap();
        assert!(outcome.is_none());

        let err = updated_or_missing(Err(sea_orm::DbErr::Custom("disk".into()))).unwrap_err();
        assert!(matches!(err, DomainError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn insert_then_list_is_ordered_by_id() {
        let repo = repo().await;
        repo.insert_user(record(2, "b@x.com")).await.unwrap();
        repo.insert_user(record(1, "a@x.com")).await.unwrap();

        let ids: Vec<i64> = repo.list_users().await.unwrap().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(repo.count_users().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn duplicate_id_or_email_is_a_conflict() {
        let repo = repo().await;
        repo.insert_user(record(1, "a@x.com")).await.unwrap();

        let same_id = repo.insert_user(record(1, "other@x.com")).await;
        assert!(matches!(same_id, Err(DomainError::Conflict(_))));

        let same_email = repo.insert_user(record(2, "a@x.com")).await;
        assert!(matches!(same_email, Err(DomainError::Conflict(_))));
        assert_eq!(repo.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn highest_id_survives_deletion() {
        let repo = repo().await;
        assert_eq!(repo.highest_user_id().await.unwrap(), None);

        repo.insert_user(record(1, "a@x.com")).await.unwrap();
        repo.insert_user(record(2, "b@x.com")).await.unwrap();
        assert!(repo.delete_user(2).await.unwrap());
        assert!(!repo.delete_user(2).await.unwrap());

        assert_eq!(repo.highest_user_id().await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn update_keeps_hash_when_not_supplied() {
        let repo = repo().await;
        repo.insert_user(record(1, "a@x.com")).await.unwrap();

        let updated = repo
            .update_user(
                1,
                UserChanges {
                    name: "Renamed".into(),
                    email: "a@x.com".into(),
                    role: "Admin".into(),
                    status: "Ativo".into(),
                    password_hash: None,
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.password_hash.as_str(), "$2b$04$hash");

        let missing = repo
            .update_user(
                42,
                UserChanges {
                    name: "x".into(),
                    email: "x@x.com".into(),
                    role: "r".into(),
                    status: "s".into(),
                    password_hash: None,
                },
            )
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
