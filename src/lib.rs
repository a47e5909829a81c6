//! # AgroWatch backend
//!
//! HTTP backend for sensor telemetry and account management.
//!
//! ## Architecture
//!
//! - **domain**: records, projections and repository traits
//! - **application**: account, authentication and telemetry services
//! - **infrastructure**: credential codec, SeaORM and in-memory stores
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: error types and graceful shutdown
//! - **server**: runtime bootstrap used by the CLI

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{
    init_database, DatabaseConfig, InMemoryRepositoryProvider, SeaOrmRepositoryProvider,
};

pub use interfaces::http::{create_api_router, AppState};
