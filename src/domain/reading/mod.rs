//! Sensor reading aggregate (read-only)

pub mod model;
pub mod repository;

pub use model::{Reading, ReadingFilter};
pub use repository::ReadingRepository;
