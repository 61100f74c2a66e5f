//! One-way hashing for refresh-token secrets.
//!
//! Uses Argon2id with a random per-call salt, so hashing the same secret
//! twice yields different digests.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hashes a secret using Argon2id with secure defaults.
///
/// Returns the PHC string format digest, or an error if hashing fails.
pub fn hash_secret(secret: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2.hash_password(secret.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

/// Verifies a secret against a stored digest.
///
/// Returns `true` iff `secret` produced `digest`. A malformed digest is
/// treated as a failed verification, never an error.
pub fn verify_secret(secret: &str, digest: &str) -> bool {
    let parsed_hash = match PasswordHash::new(digest) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(secret.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_secret_produces_argon2id_hash() {
        let hash = hash_secret("some-secret").expect("Failed to hash secret");
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_hash_secret_produces_unique_hashes() {
        let hash1 = hash_secret("same-input").expect("Failed to hash secret");
        let hash2 = hash_secret("same-input").expect("Failed to hash secret");
        // Same secret should produce different hashes due to random salt
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_secret_correct() {
        let hash = hash_secret("correct-secret").expect("Failed to hash secret");
        assert!(verify_secret("correct-secret", &hash));
    }

    #[test]
    fn test_verify_secret_wrong() {
        let hash = hash_secret("correct-secret").expect("Failed to hash secret");
        assert!(!verify_secret("wrong-secret", &hash));
    }

    #[test]
    fn test_verify_secret_malformed_digest() {
        assert!(!verify_secret("anything", "not-a-valid-digest"));
        assert!(!verify_secret("anything", ""));
    }
}
