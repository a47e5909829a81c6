//! Health check handler

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::application::TelemetryService;
use crate::domain::RepositoryProvider;

#[derive(Clone)]
pub struct HealthState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub telemetry: Arc<TelemetryService>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    /// Number of stored sensor readings
    pub records: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthFailure {
    pub status: String,
    pub database: String,
    pub error: String,
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Store reachable", body = HealthResponse),
        (status = 500, description = "Store unreachable", body = HealthFailure)
    )
)]
pub async fn health_check(State(state): State<HealthState>) -> impl IntoResponse {
    let probe = async {
        state.repos.ping().await?;
        state.telemetry.count().await
    };

    match probe.await {
        Ok(records) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".into(),
                database: "connected".into(),
                records,
            }),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthFailure {
                    status: "error".into(),
                    database: "disconnected".into(),
                    error: "Database unavailable".into(),
                }),
            )
                .into_response()
        }
    }
}
