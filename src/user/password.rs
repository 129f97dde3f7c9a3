//! Argon2id password hashing.
//!
//! Hashes are stored as PHC strings, which carry algorithm, parameters and
//! salt alongside the digest.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};

use crate::shared::AppError;

/// Hashes a clear text password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::PasswordHash(e.to_string()))
}

/// Verifies a clear text password against a stored PHC string.
/// A malformed stored hash verifies as false.
pub fn verify_password(password: &str, phc: &str) -> bool {
    let parsed_hash = match PasswordHash::new(phc) {
        Ok(h) => h,
        Err(_) => return false,
    };

    // Argon2 compares in constant time
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash_password("pw1").unwrap();

        assert!(hashed.starts_with("$argon2id$"));
        assert!(verify_password("pw1", &hashed));
        assert!(!verify_password("pw2", &hashed));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("same-password").unwrap();
        let second = hash_password("same-password").unwrap();

        assert_ne!(first, second);
        assert!(verify_password("same-password", &first));
        assert!(verify_password("same-password", &second));
    }

    #[test]
    fn test_invalid_phc_string() {
        assert!(!verify_password("pw1", "not_a_valid_hash"));
    }
}
