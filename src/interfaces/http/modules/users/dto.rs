//! Account DTOs
//!
//! Wire names follow the frontend contract: `nome`, `funcao`, `senha`,
//! `confirmarSenha`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Account, CreateAccountDto, UpdateAccountDto};

/// Account as returned by the API. Never carries a password.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountDto {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "funcao")]
    pub role: String,
    pub status: String,
}

impl From<Account> for AccountDto {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            name: a.name,
            email: a.email,
            role: a.role,
            status: a.status,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAccountRequest {
    #[serde(rename = "nome")]
    #[validate(required(message = "is required"))]
    pub name: Option<String>,
    #[validate(required(message = "is required"))]
    pub email: Option<String>,
    #[serde(rename = "senha")]
    #[validate(required(message = "is required"))]
    pub password: Option<String>,
    /// Defaults to "Operador"
    #[serde(rename = "funcao")]
    pub role: Option<String>,
    /// Defaults to "Ativo"
    pub status: Option<String>,
}

impl From<CreateAccountRequest> for CreateAccountDto {
    fn from(r: CreateAccountRequest) -> Self {
        Self {
            name: r.name.unwrap_or_default(),
            email: r.email.unwrap_or_default(),
            password: r.password.unwrap_or_default(),
            role: r.role,
            status: r.status,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAccountRequest {
    #[serde(rename = "nome")]
    #[validate(required(message = "is required"))]
    pub name: Option<String>,
    #[validate(required(message = "is required"))]
    pub email: Option<String>,
    /// New password; left unchanged when absent or empty
    #[serde(rename = "senha")]
    pub password: Option<String>,
    #[serde(rename = "confirmarSenha")]
    pub confirm_password: Option<String>,
    #[serde(rename = "funcao")]
    pub role: Option<String>,
    pub status: Option<String>,
}

impl From<UpdateAccountRequest> for UpdateAccountDto {
    fn from(r: UpdateAccountRequest) -> Self {
        Self {
            name: r.name.unwrap_or_default(),
            email: r.email.unwrap_or_default(),
            password: r.password,
            confirm_password: r.confirm_password,
            role: r.role,
            status: r.status,
        }
    }
}
