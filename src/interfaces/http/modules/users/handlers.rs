//! Account management handlers
//!
//! Thin mapping onto `AccountService`; all rules live in the service.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{AccountDto, CreateAccountRequest, UpdateAccountRequest};
use crate::application::AccountService;
use crate::interfaces::http::common::{MessageResponse, ValidatedJson};
use crate::interfaces::http::error::{ApiError, ApiResult, ErrorBody};

#[derive(Clone)]
pub struct UsersState {
    pub accounts: Arc<AccountService>,
}

fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::bad_request(format!("Invalid user id '{}'", raw)))
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "All accounts, ordered by id", body = Vec<AccountDto>),
        (status = 500, description = "Store unavailable", body = ErrorBody)
    )
)]
pub async fn list_users(State(state): State<UsersState>) -> ApiResult<Json<Vec<AccountDto>>> {
    let accounts = state.accounts.list_accounts().await?;
    Ok(Json(accounts.into_iter().map(AccountDto::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = AccountDto),
        (status = 400, description = "Missing fields or email already registered", body = ErrorBody),
        (status = 500, description = "Store unavailable", body = ErrorBody)
    )
)]
pub async fn create_user(
    State(state): State<UsersState>,
    ValidatedJson(request): ValidatedJson<CreateAccountRequest>,
) -> ApiResult<(StatusCode, Json<AccountDto>)> {
    let account = state.accounts.create_account(request.into()).await?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "Account id")),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated", body = AccountDto),
        (status = 400, description = "Missing fields, email in use or password mismatch", body = ErrorBody),
        (status = 404, description = "No such account", body = ErrorBody)
    )
)]
pub async fn update_user(
    State(state): State<UsersState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateAccountRequest>,
) -> ApiResult<Json<AccountDto>> {
    let id = parse_id(&id)?;
    let account = state.accounts.update_account(id, request.into()).await?;
    Ok(Json(account.into()))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 404, description = "No such account", body = ErrorBody)
    )
)]
pub async fn delete_user(
    State(state): State<UsersState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    state.accounts.delete_account(id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
