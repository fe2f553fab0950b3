//! Credential hashing.
//!
//! Two distinct one-way functions live here:
//!
//! - Password hashing: argon2id with a random per-password salt. Slow on
//!   purpose; used only for interactive login.
//! - Keyed hashing: HMAC-SHA256 with a server-held pepper. Deterministic, so
//!   API keys and invite tokens can be looked up by hash in O(1) without ever
//!   storing the plaintext.
//!
//! # Security
//! - The pepper is injected once at startup and wrapped in `SecretString`
//! - Hash comparisons for presented secrets are constant-time (`subtle`)

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::password_hash::rand_core::OsRng;
use argon2::Argon2;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

/// Hash a password with argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored argon2 hash. An unparseable stored
/// hash verifies false rather than erroring.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Keyed one-way hash of API keys and invite tokens: HMAC-SHA256 with a
/// server-held pepper, hex-encoded for storage and indexed lookup.
#[derive(Clone)]
pub struct KeyedHasher {
    pepper: SecretString,
}

impl KeyedHasher {
    pub fn new(pepper: SecretString) -> Self {
        Self { pepper }
    }

    /// Compute the hex digest of a secret. Deterministic per pepper.
    pub fn digest(&self, secret: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.pepper.expose_secret().as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(secret.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Check a presented secret against a stored digest in constant time.
    pub fn verify(&self, secret: &str, expected_hex: &str) -> bool {
        let computed = self.digest(secret);
        computed.as_bytes().ct_eq(expected_hex.as_bytes()).into()
    }
}

impl std::fmt::Debug for KeyedHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyedHasher([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_hasher() -> KeyedHasher {
        KeyedHasher::new(SecretString::from("test-pepper"))
    }

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn test_password_hashes_are_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_stored_hash_verifies_false() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_keyed_digest_is_deterministic() {
        let hasher = test_hasher();
        let a = hasher.digest("ak_some_secret");
        let b = hasher.digest("ak_some_secret");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64); // HMAC-SHA256 produces 64 hex chars
    }

    #[test]
    fn test_keyed_digest_depends_on_pepper() {
        let a = test_hasher().digest("ak_some_secret");
        let b = KeyedHasher::new(SecretString::from("other-pepper")).digest("ak_some_secret");
        assert_ne!(a, b);
    }

    #[test]
    fn test_keyed_verify() {
        let hasher = test_hasher();
        let digest = hasher.digest("oi_invite_token");
        assert!(hasher.verify("oi_invite_token", &digest));
        assert!(!hasher.verify("oi_other_token", &digest));
    }
}
