use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use subtle::ConstantTimeEq;

use crate::error::{Error, Result};

/// Produces the PHC string expected in `ADMIN_PASSWORD_HASH`.
pub fn hash_password(plain: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Internal(format!("Failed to hash password: {}", e)))
}

/// A malformed stored hash verifies nothing.
pub fn verify_password(plain: &str, hashed: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hashed) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::warn!("Stored admin password hash is malformed: {}", e);
            return false;
        }
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed_hash)
        .is_ok()
}

pub fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("s3cret").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("s3cret", "not-a-phc-string"));
    }

    #[test]
    fn constant_time_comparison() {
        assert!(constant_time_eq("admin@example.com", "admin@example.com"));
        assert!(!constant_time_eq("admin@example.com", "admin@example.co"));
    }
}
