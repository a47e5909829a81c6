//! Database entities module
//!
//! Sensor readings have no entity: their table name is configurable and
//! they are queried through `sea_query` directly.

pub mod sequence;
pub mod user;
