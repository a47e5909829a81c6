//! Application layer: use-case orchestration over the domain repositories.

pub mod identity;
pub mod telemetry;

pub use identity::{AccountService, AuthService, IdentityAllocator};
pub use telemetry::{AppliedFilters, TelemetryPage, TelemetryParams, TelemetryService, TelemetryStats};
