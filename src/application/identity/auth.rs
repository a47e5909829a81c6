//! Credential check for email + password logins
//!
//! Stateless: a successful check returns the account projection and nothing
//! else. Session handling belongs to the caller.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{normalize_email, Account, DomainError, DomainResult, RepositoryProvider};
use crate::infrastructure::crypto::CredentialCodec;

pub struct AuthService {
    repos: Arc<dyn RepositoryProvider>,
    codec: CredentialCodec,
}

impl AuthService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, codec: CredentialCodec) -> Self {
        Self { repos, codec }
    }

    /// Unknown email yields `NotFound`, a wrong password `Unauthorized`.
    pub async fn authenticate(&self, email: &str, password: &str) -> DomainResult<Account> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(DomainError::validation("Email and password are required"));
        }

        let Some(user) = self.repos.users().find_by_email(&email).await? else {
            let codec = self.codec;
            let password = password.to_owned();
            tokio::task::spawn_blocking(move || codec.verify_dummy(&password))
                .await
                .map_err(|e| DomainError::Internal(e.to_string()))?;
            warn!(email = %email, "Login attempt for unknown account");
            return Err(DomainError::NotFound {
                entity: "User",
                field: "email",
                value: email,
            });
        };

        if !self.codec.verify_blocking(password, &user.password_hash).await? {
            warn!(user_id = user.id, "Login rejected: wrong password");
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        info!(user_id = user.id, "Login succeeded");
        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::identity::AccountService;
    use crate::domain::CreateAccountDto;
    use crate::infrastructure::InMemoryRepositoryProvider;

    async fn seeded() -> AuthService {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let codec = CredentialCodec::new(4);
        AccountService::new(repos.clone(), codec)
            .create_account(CreateAccountDto {
                name: "Alice".into(),
                email: "a@x.com".into(),
                password: "secret1".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        AuthService::new(repos, codec)
    }

    #[tokio::test]
    async fn correct_password_returns_account() {
        let auth = seeded().await;
        let acc = auth.authenticate(" A@X.COM", "secret1").await.unwrap();
        assert_eq!(acc.name, "Alice");
        assert_eq!(acc.id, 1);
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let auth = seeded().await;
        let err = auth.authenticate("a@x.com", "wrong").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn unknown_email_is_not_found() {
        let auth = seeded().await;
        let err = auth.authenticate("nobody@x.com", "secret1").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn missing_credentials_are_a_validation_error() {
        let auth = seeded().await;
        assert!(matches!(
            auth.authenticate("", "secret1").await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            auth.authenticate("a@x.com", "").await,
            Err(DomainError::Validation(_))
        ));
    }
}
