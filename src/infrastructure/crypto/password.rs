//! Password hashing utilities

use std::sync::OnceLock;

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::domain::PasswordHash;
use crate::shared::InfraError;

/// One-way password hashing and verification backed by bcrypt.
///
/// Every call to [`hash`](Self::hash) draws a fresh random salt, so hashing
/// the same plaintext twice yields different outputs.
#[derive(Debug, Clone, Copy)]
pub struct CredentialCodec {
    cost: u32,
}

impl CredentialCodec {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a password using bcrypt
    pub fn hash(&self, plaintext: &str) -> Result<PasswordHash, InfraError> {
        Ok(PasswordHash::new(hash(plaintext, self.cost)?))
    }

    /// Verify a password against a hash.
    ///
    /// A malformed hash counts as a mismatch.
    pub fn verify(&self, plaintext: &str, hashed: &PasswordHash) -> bool {
        verify(plaintext, hashed.as_str()).unwrap_or(false)
    }

    /// [`hash`](Self::hash) on the blocking thread pool.
    pub async fn hash_blocking(&self, plaintext: &str) -> Result<PasswordHash, InfraError> {
        let codec = *self;
        let plaintext = plaintext.to_owned();
        tokio::task::spawn_blocking(move || codec.hash(&plaintext)).await?
    }

    /// [`verify`](Self::verify) on the blocking thread pool.
    pub async fn verify_blocking(&self, plaintext: &str, hashed: &PasswordHash) -> Result<bool, InfraError> {
        let codec = *self;
        let plaintext = plaintext.to_owned();
        let hashed = hashed.clone();
        Ok(tokio::task::spawn_blocking(move || codec.verify(&plaintext, &hashed)).await?)
    }

    /// Burn one verification against a throwaway hash of the same cost.
    ///
    /// Used on lookups that found no account so both outcomes take the same
    /// time.
    pub fn verify_dummy(&self, plaintext: &str) {
        static DUMMY: OnceLock<Option<PasswordHash>> = OnceLock::new();
        let cost = self.cost;
        let dummy = DUMMY.get_or_init(|| hash("dummy-password", cost).ok().map(PasswordHash::new));
        if let Some(dummy) = dummy {
            let _ = verify(plaintext, dummy.as_str());
        }
    }
}

impl Default for CredentialCodec {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> CredentialCodec {
        CredentialCodec::new(4)
    }

    #[test]
    fn test_hash_and_verify() {
        let codec = codec();
        let password = "secure_password_123";
        let hashed = codec.hash(password).unwrap();

        assert!(codec.verify(password, &hashed));
        assert!(!codec.verify("wrong_password", &hashed));
    }

    #[test]
    fn hashing_twice_uses_distinct_salts() {
        let codec = codec();
        let a = codec.hash("same").unwrap();
        let b = codec.hash("same").unwrap();
        assert_ne!(a, b);
        assert!(codec.verify("same", &a));
        assert!(codec.verify("same", &b));
    }

    #[test]
    fn malformed_hash_is_a_mismatch() {
        let codec = codec();
        assert!(!codec.verify("anything", &PasswordHash::new("not-a-bcrypt-hash")));
        assert!(!codec.verify("anything", &PasswordHash::new("")));
    }

    #[tokio::test]
    async fn blocking_variants_agree_with_sync_ones() {
        let codec = codec();
        let hashed = codec.hash_blocking("pa55").await.unwrap();
        assert!(codec.verify_blocking("pa55", &hashed).await.unwrap());
        assert!(!codec.verify_blocking("nope", &hashed).await.unwrap());
    }

    #[test]
    fn dummy_verification_does_not_panic() {
        codec().verify_dummy("whatever");
    }
}
