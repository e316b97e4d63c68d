//! Password hashing for restaurant and user accounts.
//!
//! Hashes are argon2id PHC strings with a per-password random salt, so the
//! same password never produces the same stored value twice. Login therefore
//! looks the account up by identifier first and verifies afterwards.

use crate::error::{SwiggyError, SwiggyResult};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a plaintext password into a PHC string.
pub fn hash_password(password: &str) -> SwiggyResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| SwiggyError::PasswordHash(e.to_string()))
}

/// Verify a plaintext password against a stored PHC string.
///
/// A malformed stored hash never verifies.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Secret@123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Secret@123", &hash));
        assert!(!verify_password("Secret@124", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("Secret@123").unwrap();
        let second = hash_password("Secret@123").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("Secret@123", "not-a-phc-string"));
        assert!(!verify_password("", ""));
    }
}
