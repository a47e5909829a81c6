//! Data module — read-only sensor telemetry

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
