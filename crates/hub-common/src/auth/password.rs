//! Argon2id password hashing

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use hub_core::DomainError;

use crate::error::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(anyhow::anyhow!("password hashing failed: {e}")))
}

/// `Ok(false)` on mismatch; `Err` only for a malformed stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(anyhow::anyhow!("invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// At least 8 characters with an upper-case letter, a lower-case letter and a digit.
pub fn validate_password_strength(password: &str) -> Result<(), AppError> {
    let weak = |msg: &str| Err(AppError::Domain(DomainError::WeakPassword(msg.to_string())));

    if password.chars().count() < 8 {
        return weak("must be at least 8 characters long");
    }
    if !password.chars().any(char::is_uppercase) {
        return weak("must contain an uppercase letter");
    }
    if !password.chars().any(char::is_lowercase) {
        return weak("must contain a lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return weak("must contain a digit");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_salted() {
        let a = hash_password("SecurePassword123").unwrap();
        let b = hash_password("SecurePassword123").unwrap();
        assert!(a.starts_with("$argon2"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify() {
        let hash = hash_password("SecurePassword123").unwrap();
        assert!(verify_password("SecurePassword123", &hash).unwrap());
        assert!(!verify_password("WrongPassword123", &hash).unwrap());
    }

    #[test]
    fn test_verify_malformed_hash() {
        assert!(verify_password("whatever", "not-a-hash").is_err());
    }

    #[test]
    fn test_strength_rules() {
        assert!(validate_password_strength("Abcdefg1").is_ok());

        for weak in ["Short1", "lowercase123", "UPPERCASE123", "NoDigitsHere"] {
            let err = validate_password_strength(weak).unwrap_err();
            assert_eq!(err.error_code(), "WEAK_PASSWORD", "{weak}");
        }
    }
}
