//! Password hashing capability
//!
//! The stores never see raw password material beyond the call boundary:
//! hashing and verification go through [`CredentialHasher`], with Argon2id
//! as the production implementation.

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use thiserror::Error;

/// Password hashing errors.
#[derive(Debug, Error)]
pub enum HasherError {
    /// Hashing failed (parameter or RNG problem).
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// The credential hashing capability: `hash(raw) -> digest`,
/// `verify(raw, digest) -> bool`.
///
/// `verify` is total: a malformed digest verifies as `false` rather than
/// erroring, so unknown-account and wrong-password paths are
/// indistinguishable to callers.
pub trait CredentialHasher: Send + Sync {
    /// Hash a raw password into a self-describing digest string.
    fn hash(&self, raw: &str) -> Result<String, HasherError>;

    /// Check a raw password against a stored digest.
    fn verify(&self, raw: &str, digest: &str) -> bool;
}

/// Argon2id implementation of [`CredentialHasher`] with library-default
/// parameters and a random per-password salt.
#[derive(Debug, Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    /// Create a hasher with default Argon2id parameters.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, raw: &str) -> Result<String, HasherError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(raw.as_bytes(), &salt)
            .map(|digest| digest.to_string())
            .map_err(|err| HasherError::Hash(err.to_string()))
    }

    fn verify(&self, raw: &str, digest: &str) -> bool {
        PasswordHash::new(digest)
            .map(|parsed| self.argon2.verify_password(raw.as_bytes(), &parsed).is_ok())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2Hasher::new();
        let digest = hasher.hash("correct horse").unwrap();

        assert!(hasher.verify("correct horse", &digest));
        assert!(!hasher.verify("wrong horse", &digest));
    }

    #[test]
    fn test_digests_are_salted() {
        let hasher = Argon2Hasher::new();
        let first = hasher.hash("pw").unwrap();
        let second = hasher.hash("pw").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_digest_verifies_false() {
        let hasher = Argon2Hasher::new();
        assert!(!hasher.verify("pw", "not-a-digest"));
        assert!(!hasher.verify("pw", ""));
    }
}
