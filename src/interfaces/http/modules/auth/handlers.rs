//! Login handler
//!
//! Authentication is a single stateless check; no session or token is
//! issued. Unknown email and wrong password get the same 401 answer.

use std::sync::Arc;

use axum::{extract::State, Json};

use super::dto::{LoginRequest, LoginResponse};
use crate::application::AuthService;
use crate::domain::DomainError;
use crate::interfaces::http::common::ValidatedJson;
use crate::interfaces::http::error::{ApiError, ApiResult, ErrorBody};

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct AuthState {
    pub auth: Arc<AuthService>,
}

#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = LoginResponse),
        (status = 400, description = "Missing email or password", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AuthState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let email = request.email.unwrap_or_default();
    let password = request.password.unwrap_or_default();

    match state.auth.authenticate(&email, &password).await {
        Ok(account) => Ok(Json(LoginResponse {
            message: "Login successful".into(),
            user: account.into(),
        })),
        Err(DomainError::NotFound { .. }) | Err(DomainError::Unauthorized(_)) => {
            Err(ApiError::unauthorized(INVALID_CREDENTIALS))
        }
        Err(e) => Err(e.into()),
    }
}
