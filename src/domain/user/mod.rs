//! User aggregate
//!
//! Contains the stored record, the public projection, DTOs, and the
//! repository interface.

pub mod model;
pub mod repository;

mod dto_create;
mod dto_update;

pub use model::{
    normalize_email, Account, PasswordHash, UserChanges, UserRecord, DEFAULT_ROLE, DEFAULT_STATUS,
};

pub use dto_create::CreateAccountDto;
pub use dto_update::UpdateAccountDto;

pub use repository::UserRepository;
