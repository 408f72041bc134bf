//! Stored credential encoding

use pbkdf2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Pbkdf2,
};

use crate::utils::errors::{CampusBuddyError, Result};

const PHC_PREFIX: &str = "$pbkdf2";

/// How the password column of an account row is encoded.
///
/// Rows imported from the legacy portal hold the raw password. They verify
/// by plain comparison and are rewritten in the hashed form on their first
/// successful login; new accounts are always stored hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Hashed(String),
    Legacy(String),
}

impl Credential {
    /// Classify a stored password column value.
    pub fn parse(stored: &str) -> Self {
        if stored.starts_with(PHC_PREFIX) {
            Credential::Hashed(stored.to_string())
        } else {
            Credential::Legacy(stored.to_string())
        }
    }

    /// Hash a password into the stored PHC form (PBKDF2-SHA256).
    pub fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Pbkdf2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CampusBuddyError::PasswordHash(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Check a password attempt against this credential.
    pub fn verify(&self, password: &str) -> bool {
        match self {
            Credential::Hashed(phc) => match PasswordHash::new(phc) {
                Ok(parsed) => Pbkdf2.verify_password(password.as_bytes(), &parsed).is_ok(),
                Err(_) => false,
            },
            Credential::Legacy(stored) => password == stored,
        }
    }

    /// Whether a successful login must rewrite the stored value.
    pub fn needs_upgrade(&self) -> bool {
        matches!(self, Credential::Legacy(_))
    }
}
