//! Database repository implementations
//!
//! Per-collection SeaORM repositories + unified RepositoryProvider.

pub mod reading_repository;
pub mod repository_provider;
pub mod user_repository;

pub use reading_repository::SeaOrmReadingRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use user_repository::SeaOrmUserRepository;
