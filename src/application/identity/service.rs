//! Account management service — application-layer orchestration
//!
//! All account-related business logic lives here.
//! HTTP handlers should be thin wrappers that delegate to this service.
//!
//! Uniqueness is checked with a read before the write. The store's own
//! unique constraints close the window between the two: a racing writer gets
//! `DomainError::Conflict` from the insert or update itself.

use std::sync::Arc;

use tracing::info;

use super::allocator::IdentityAllocator;
use crate::domain::{
    normalize_email, Account, CreateAccountDto, DomainError, DomainResult, RepositoryProvider,
    UpdateAccountDto, UserChanges, UserRecord, DEFAULT_ROLE, DEFAULT_STATUS,
};
use crate::infrastructure::crypto::CredentialCodec;

/// Account service — create, list, update and delete accounts.
pub struct AccountService {
    repos: Arc<dyn RepositoryProvider>,
    allocator: IdentityAllocator,
    codec: CredentialCodec,
}

impl AccountService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, codec: CredentialCodec) -> Self {
        Self {
            allocator: IdentityAllocator::new(repos.clone()),
            repos,
            codec,
        }
    }

    // ── Queries ─────────────────────────────────────────────────

    /// All accounts, id ascending.
    pub async fn list_accounts(&self) -> DomainResult<Vec<Account>> {
        let users = self.repos.users().list_users().await?;
        Ok(users.into_iter().map(Account::from).collect())
    }

    // ── Commands (mutations) ────────────────────────────────────

    pub async fn create_account(&self, dto: CreateAccountDto) -> DomainResult<Account> {
        let name = dto.name.trim();
        let email = normalize_email(&dto.email);
        if name.is_empty() || email.is_empty() || dto.password.is_empty() {
            return Err(DomainError::validation(
                "Name, email and password are required",
            ));
        }

        if self.repos.users().find_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("This email is already registered".into()));
        }

        let id = self.allocator.next_id().await?;
        let password_hash = self.codec.hash_blocking(&dto.password).await?;

        let record = UserRecord {
            id,
            name: name.to_string(),
            email,
            role: or_default(dto.role, DEFAULT_ROLE),
            status: or_default(dto.status, DEFAULT_STATUS),
            password_hash,
        };

        self.repos.users().insert_user(record.clone()).await?;

        info!(user_id = record.id, email = %record.email, "Account created");
        Ok(record.into())
    }

    /// Replace name, email, role and status; replace the password only when
    /// a non-empty one is supplied together with a matching confirmation.
    pub async fn update_account(&self, id: i64, dto: UpdateAccountDto) -> DomainResult<Account> {
        let name = dto.name.trim();
        let email = normalize_email(&dto.email);
        if name.is_empty() || email.is_empty() {
            return Err(DomainError::validation("Name and email are required"));
        }

        let new_password = dto.password.filter(|p| !p.is_empty());
        if let Some(password) = &new_password {
            if dto.confirm_password.as_deref() != Some(password.as_str()) {
                return Err(DomainError::validation("Passwords do not match"));
            }
        }

        if let Some(other) = self.repos.users().find_by_email(&email).await? {
            if other.id != id {
                return Err(DomainError::Conflict(
                    "This email is already used by another account".into(),
                ));
            }
        }

        let password_hash = match new_password {
            Some(password) => Some(self.codec.hash_blocking(&password).await?),
            None => None,
        };
        let password_changed = password_hash.is_some();

        let changes = UserChanges {
            name: name.to_string(),
            email,
            role: or_default(dto.role, DEFAULT_ROLE),
            status: or_default(dto.status, DEFAULT_STATUS),
            password_hash,
        };

        let updated = self
            .repos
            .users()
            .update_user(id, changes)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))?;

        info!(user_id = id, password_changed, "Account updated");
        Ok(updated.into())
    }

    pub async fn delete_account(&self, id: i64) -> DomainResult<()> {
        if !self.repos.users().delete_user(id).await? {
            return Err(DomainError::user_not_found(id));
        }

        info!(user_id = id, "Account deleted");
        Ok(())
    }
}

// ── Helpers ─────────────────────────────────────────────────────

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::identity::AuthService;
    use crate::infrastructure::InMemoryRepositoryProvider;

    struct Fixture {
        repos: Arc<InMemoryRepositoryProvider>,
        accounts: AccountService,
        auth: AuthService,
    }

    fn fixture() -> Fixture {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let codec = CredentialCodec::new(4);
        Fixture {
            accounts: AccountService::new(repos.clone(), codec),
            auth: AuthService::new(repos.clone(), codec),
            repos,
        }
    }

    fn create(name: &str, email: &str, password: &str) -> CreateAccountDto {
        CreateAccountDto {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    fn update(name: &str, email: &str) -> UpdateAccountDto {
        UpdateAccountDto {
            name: name.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids_and_defaults() {
        let f = fixture();
        let mut ids = Vec::new();
        for i in 0..3 {
            let acc = f
                .accounts
                .create_account(create("User", &format!("u{}@x.com", i), "pw"))
                .await
                .unwrap();
            assert_eq!(acc.role, DEFAULT_ROLE);
            assert_eq!(acc.status, DEFAULT_STATUS);
            ids.push(acc.id);
        }
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn create_normalizes_email_and_name() {
        let f = fixture();
        let acc = f
            .accounts
            .create_account(create("  Alice ", " Alice@X.com ", "pw"))
            .await
            .unwrap();
        assert_eq!(acc.name, "Alice");
        assert_eq!(acc.email, "alice@x.com");
    }

    #[tokio::test]
    async fn create_rejects_missing_fields_before_touching_store() {
        let f = fixture();
        f.repos.set_offline(true);

        for dto in [
            create("", "a@x.com", "pw"),
            create("A", "   ", "pw"),
            create("A", "a@x.com", ""),
        ] {
            let err = f.accounts.create_account(dto).await.unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{err:?}");
        }
    }

    #[tokio::test]
    async fn create_rejects_email_differing_only_in_case_and_whitespace() {
        let f = fixture();
        f.accounts
            .create_account(create("A", "A@x.com ", "pw"))
            .await
            .unwrap();

        let err = f
            .accounts
            .create_account(create("B", "a@x.com", "pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_deleting_the_newest() {
        let f = fixture();
        f.accounts.create_account(create("A", "a@x.com", "pw")).await.unwrap();
        let b = f.accounts.create_account(create("B", "b@x.com", "pw")).await.unwrap();
        f.accounts.delete_account(b.id).await.unwrap();

        let c = f.accounts.create_account(create("C", "c@x.com", "pw")).await.unwrap();
        assert_eq!(c.id, 3);
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let f = fixture();
        for email in ["c@x.com", "a@x.com", "b@x.com"] {
            f.accounts.create_account(create("U", email, "pw")).await.unwrap();
        }
        let ids: Vec<i64> = f.accounts.list_accounts().await.unwrap().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn update_with_mismatched_confirmation_keeps_old_password() {
        let f = fixture();
        let acc = f
            .accounts
            .create_account(create("Alice", "a@x.com", "secret1"))
            .await
            .unwrap();

        let dto = UpdateAccountDto {
            password: Some("secret2".into()),
            confirm_password: Some("secret3".into()),
            ..update("Alice", "a@x.com")
        };
        let err = f.accounts.update_account(acc.id, dto).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        assert!(f.auth.authenticate("a@x.com", "secret1").await.is_ok());
    }

    #[tokio::test]
    async fn update_with_confirmed_password_replaces_hash() {
        let f = fixture();
        let acc = f
            .accounts
            .create_account(create("Alice", "a@x.com", "secret1"))
            .await
            .unwrap();

        let dto = UpdateAccountDto {
            password: Some("secret2".into()),
            confirm_password: Some("secret2".into()),
            ..update("Alice", "a@x.com")
        };
        f.accounts.update_account(acc.id, dto).await.unwrap();

        assert!(f.auth.authenticate("a@x.com", "secret2").await.is_ok());
        assert!(matches!(
            f.auth.authenticate("a@x.com", "secret1").await,
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn update_changing_only_status_leaves_other_fields() {
        let f = fixture();
        let acc = f
            .accounts
            .create_account(CreateAccountDto {
                role: Some("Admin".into()),
                ..create("Alice", "a@x.com", "pw")
            })
            .await
            .unwrap();

        let dto = UpdateAccountDto {
            role: Some("Admin".into()),
            status: Some("Inativo".into()),
            ..update("Alice", "a@x.com")
        };
        f.accounts.update_account(acc.id, dto).await.unwrap();

        let listed = f.accounts.list_accounts().await.unwrap();
        assert_eq!(
            listed,
            vec![Account {
                status: "Inativo".into(),
                ..acc
            }]
        );
    }

    #[tokio::test]
    async fn update_allows_keeping_own_email_but_not_anothers() {
        let f = fixture();
        let a = f.accounts.create_account(create("A", "a@x.com", "pw")).await.unwrap();
        f.accounts.create_account(create("B", "b@x.com", "pw")).await.unwrap();

        assert!(f.accounts.update_account(a.id, update("A2", "A@X.com")).await.is_ok());

        let err = f
            .accounts
            .update_account(a.id, update("A2", "b@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let f = fixture();
        let err = f
            .accounts
            .update_account(99, update("Ghost", "ghost@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_defaults_role_and_status_when_absent() {
        let f = fixture();
        let acc = f
            .accounts
            .create_account(CreateAccountDto {
                role: Some("Admin".into()),
                status: Some("Inativo".into()),
                ..create("A", "a@x.com", "pw")
            })
            .await
            .unwrap();

        let updated = f.accounts.update_account(acc.id, update("A", "a@x.com")).await.unwrap();
        assert_eq!(updated.role, DEFAULT_ROLE);
        assert_eq!(updated.status, DEFAULT_STATUS);
    }

    #[tokio::test]
    async fn delete_twice_fails_second_time() {
        let f = fixture();
        let acc = f.accounts.create_account(create("A", "a@x.com", "pw")).await.unwrap();

        f.accounts.delete_account(acc.id).await.unwrap();
        let err = f.accounts.delete_account(acc.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_store_unavailable() {
        let f = fixture();
        f.repos.set_offline(true);
        let err = f.accounts.list_accounts().await.unwrap_err();
        assert!(matches!(err, DomainError::StoreUnavailable(_)));
    }
}
