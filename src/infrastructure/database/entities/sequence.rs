//! Named high-water marks for allocated identifiers

use sea_orm::entity::prelude::*;

/// Sequence key tracking account ids.
pub const USERS_SEQUENCE: &str = "users";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sequences")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    /// Highest value handed out so far.
    pub value: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
