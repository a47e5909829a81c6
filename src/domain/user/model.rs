use std::fmt;

/// Role assigned when a request does not name one.
pub const DEFAULT_ROLE: &str = "Operador";
/// Status assigned when a request does not name one.
pub const DEFAULT_STATUS: &str = "Ativo";

/// Opaque bcrypt output.
///
/// Deliberately implements neither `Display` nor any serde trait so it can
/// only leave the process through the persistence gateway.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Stored account, including the credential hash.
#[derive(Clone, Debug)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub password_hash: PasswordHash,
}

/// Password-free view of an account, the only shape handed to callers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: String,
}

impl From<UserRecord> for Account {
    fn from(u: UserRecord) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            status: u.status,
        }
    }
}

/// Field set written by an account update. `password_hash` is `None` when
/// the stored hash must stay as it is.
#[derive(Clone, Debug)]
pub struct UserChanges {
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub password_hash: Option<PasswordHash>,
}

impl UserChanges {
    /// Apply the changes to a stored record in place.
    pub fn apply_to(self, record: &mut UserRecord) {
        record.name = self.name;
        record.email = self.email;
        record.role = self.role;
        record.status = self.status;
        if let Some(hash) = self.password_hash {
            record.password_hash = hash;
        }
    }
}

/// Lower-case and trim an email address before any lookup or write.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> UserRecord {
        UserRecord {
            id: 7,
            name: "Ana".into(),
            email: "ana@farm.io".into(),
            role: DEFAULT_ROLE.into(),
            status: DEFAULT_STATUS.into(),
            password_hash: PasswordHash::new("$2b$04$secret"),
        }
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  Ana@Farm.IO \t"), "ana@farm.io");
    }

    #[test]
    fn debug_output_hides_the_hash() {
        let dbg = format!("{:?}", record());
        assert!(!dbg.contains("secret"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn changes_without_password_keep_existing_hash() {
        let mut rec = record();
        UserChanges {
            name: "Ana Maria".into(),
            email: "ana@farm.io".into(),
            role: "Admin".into(),
            status: "Inativo".into(),
            password_hash: None,
        }
        .apply_to(&mut rec);

        assert_eq!(rec.name, "Ana Maria");
        assert_eq!(rec.status, "Inativo");
        assert_eq!(rec.password_hash.as_str(), "$2b$04$secret");
    }
}
