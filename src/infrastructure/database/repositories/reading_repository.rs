//! SeaORM gateway for the sensor readings table
//!
//! The table name comes from configuration, so queries are built with
//! `sea_query` against an `Alias` instead of a static entity.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Alias, ColumnDef, Expr, Func, Index, Order, Query, Table};
use sea_orm::{ConnectionTrait, DatabaseConnection, FromQueryResult};
use tracing::debug;

use super::user_repository::db_err;
use crate::domain::{DomainResult, Reading, ReadingFilter, ReadingRepository};

const FIELD1: &str = "field1";
const FIELD2: &str = "field2";
const CREATED_AT: &str = "created_at";

#[derive(Debug, FromQueryResult)]
struct ReadingRow {
    field1: Option<f64>,
    field2: Option<f64>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromQueryResult)]
struct CountRow {
    total: i64,
}

pub struct SeaOrmReadingRepository {
    db: DatabaseConnection,
    table: String,
}

impl SeaOrmReadingRepository {
    pub fn new(db: DatabaseConnection, table: impl Into<String>) -> Self {
        Self {
            db,
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create the readings table and its `created_at` index when missing.
    ///
    /// Readings are written by an external ingestion process; this only makes
    /// a fresh database queryable.
    pub async fn ensure_table(&self) -> Result<(), sea_orm::DbErr> {
        let backend = self.db.get_database_backend();
        let table = Alias::new(&self.table);

        let create = Table::create()
            .table(table.clone())
            .if_not_exists()
            .col(
                ColumnDef::new(Alias::new("id"))
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Alias::new(FIELD1)).double().null())
            .col(ColumnDef::new(Alias::new(FIELD2)).double().null())
            .col(
                ColumnDef::new(Alias::new(CREATED_AT))
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .to_owned();
        self.db.execute(backend.build(&create)).await?;

        let index = Index::create()
            .if_not_exists()
            .name(format!("idx_{}_created_at", self.table))
            .table(table)
            .col(Alias::new(CREATED_AT))
            .to_owned();
        self.db.execute(backend.build(&index)).await?;

        debug!(table = %self.table, "Readings table ready");
        Ok(())
    }

    /// Append a reading. Used to seed development databases and tests.
    pub async fn insert(&self, reading: &Reading) -> Result<(), sea_orm::DbErr> {
        let mut stmt = Query::insert();
        stmt.into_table(Alias::new(&self.table))
            .columns([Alias::new(FIELD1), Alias::new(FIELD2), Alias::new(CREATED_AT)])
            .values([
                Expr::value(reading.field1),
                Expr::value(reading.field2),
                Expr::value(reading.created_at),
            ])
            .map_err(|e| sea_orm::DbErr::Custom(e.to_string()))?;
        let backend = self.db.get_database_backend();
        self.db.execute(backend.build(&stmt)).await?;
        Ok(())
    }
}

#[async_trait]
impl ReadingRepository for SeaOrmReadingRepository {
    async fn find_latest(&self, filter: &ReadingFilter, limit: u64) -> DomainResult<Vec<Reading>> {
        let mut query = Query::select();
        query
            .columns([Alias::new(FIELD1), Alias::new(FIELD2), Alias::new(CREATED_AT)])
            .from(Alias::new(&self.table));

        if let Some(start) = filter.start {
            query.and_where(Expr::col(Alias::new(CREATED_AT)).gte(start));
        }
        if let Some(end) = filter.end {
            query.and_where(Expr::col(Alias::new(CREATED_AT)).lte(end));
        }

        query
            .order_by(Alias::new(CREATED_AT), Order::Desc)
            .limit(limit);

        let backend = self.db.get_database_backend();
        let rows = ReadingRow::find_by_statement(backend.build(&query))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|r| Reading {
                field1: r.field1,
                field2: r.field2,
                created_at: r.created_at,
            })
            .collect())
    }

    async fn count_readings(&self) -> DomainResult<u64> {
        let query = Query::select()
            .expr_as(Func::count(Expr::col(Alias::new(CREATED_AT))), Alias::new("total"))
            .from(Alias::new(&self.table))
            .to_owned();

        let backend = self.db.get_database_backend();
        let row = CountRow::find_by_statement(backend.build(&query))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(row.map_or(0, |r| r.total.max(0) as u64))
    }
}
