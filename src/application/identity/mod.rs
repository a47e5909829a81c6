//! Identity module — account management & authentication
//!
//! - `AccountService`: create / list / update / delete accounts
//! - `AuthService`: email + password verification
//! - `IdentityAllocator`: next numeric account id

pub mod allocator;
pub mod auth;
pub mod service;

pub use allocator::IdentityAllocator;
pub use auth::AuthService;
pub use service::AccountService;
