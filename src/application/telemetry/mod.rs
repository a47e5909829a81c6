//! Telemetry module — read path for sensor readings

pub mod params;
pub mod service;

pub use params::{parse_timestamp, TelemetryParams};
pub use service::{AppliedFilters, TelemetryPage, TelemetryService, TelemetryStats};
