//! HTTP REST API interfaces
//!
//! - `router`: route table, shared state, CORS and OpenAPI document
//! - `modules`: handlers and DTOs per resource, plus middleware
//! - `error`: domain error to HTTP response mapping

pub mod common;
pub mod error;
pub mod modules;
pub mod router;

pub use error::{ApiError, ApiResult, ErrorBody};
pub use router::{create_api_router, AppState, ApiDoc, ROUTES};
