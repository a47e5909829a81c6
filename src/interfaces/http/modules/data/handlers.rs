//! Sensor data handler

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;

use super::dto::{ChannelDto, DataQuery, DataResponse};
use crate::application::TelemetryService;
use crate::interfaces::http::error::{ApiError, ApiResult};

#[derive(Clone)]
pub struct DataState {
    pub telemetry: Arc<TelemetryService>,
    pub channel: ChannelDto,
}

#[utoipa::path(
    get,
    path = "/api/data",
    tag = "Telemetry",
    params(DataQuery),
    responses(
        (status = 200, description = "Latest readings, oldest first", body = DataResponse),
        (status = 400, description = "Invalid limit or date", body = crate::interfaces::http::error::ErrorBody),
        (status = 500, description = "Store unavailable", body = crate::interfaces::http::error::ErrorBody)
    )
)]
pub async fn get_sensor_data(
    State(state): State<DataState>,
    query: Result<Query<DataQuery>, QueryRejection>,
) -> ApiResult<Json<DataResponse>> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let page = state.telemetry.query(query.into()).await?;
    Ok(Json(DataResponse::new(page, state.channel.clone())))
}
