//! Password hashing with Argon2

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Hash error: {0}")]
    HashError(String),
    #[error("Stored hash is malformed: {0}")]
    MalformedHash(String),
}

/// Argon2id PHC string with default parameters that matches no password.
const NO_ACCOUNT_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$c3BvcnRtZWV0LW5vLWFjY291bnQtcGxhY2Vob2xkZXI";

pub struct PasswordService;

impl PasswordService {
    pub fn hash_password(password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| PasswordError::HashError(e.to_string()))
    }

    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
    pub fn validate_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordError::MalformedHash(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Full Argon2 verification against a hash no password matches. Run on
    /// the unknown-account path so it takes as long as a wrong password.
    pub fn reject_unknown_account(password: &str) {
        let _ = Self::validate_password(password, NO_ACCOUNT_HASH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_validate() {
        let hash = PasswordService::hash_password("NA$At00r").unwrap();
        assert_ne!(hash, "NA$At00r");
        assert!(PasswordService::validate_password("NA$At00r", &hash).unwrap());
        assert!(!PasswordService::validate_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_no_account_hash_parses_and_matches_nothing() {
        assert!(!PasswordService::validate_password("NA$At00r", NO_ACCOUNT_HASH).unwrap());
        assert!(!PasswordService::validate_password("", NO_ACCOUNT_HASH).unwrap());
        PasswordService::reject_unknown_account("NA$At00r");
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(matches!(
            PasswordService::validate_password("x", "not-a-phc-string"),
            Err(PasswordError::MalformedHash(_))
        ));
    }
}
