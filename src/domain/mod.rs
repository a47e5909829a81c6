//! Core records, projections and repository interfaces.

pub mod reading;
pub mod repositories;
pub mod user;

pub use reading::{Reading, ReadingFilter, ReadingRepository};
pub use repositories::{DomainResult, RepositoryProvider};
pub use user::{
    normalize_email, Account, CreateAccountDto, PasswordHash, UpdateAccountDto, UserChanges,
    UserRecord, UserRepository, DEFAULT_ROLE, DEFAULT_STATUS,
};

pub use crate::shared::errors::DomainError;
