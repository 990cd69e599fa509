//! One-way password hashing

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use thiserror::Error;

/// Hashing failure
#[derive(Debug, Error)]
#[error("Failed to hash password: {0}")]
pub struct PasswordError(String);

/// Hashes and verifies passwords
///
/// Injected as `Arc<dyn PasswordEncoder>` into every component that
/// stores or checks credentials.
pub trait PasswordEncoder: Send + Sync {
    /// Hash `raw` with a fresh random salt
    fn encode(&self, raw: &str) -> Result<String, PasswordError>;

    /// Whether `raw` hashes to `encoded`; a malformed hash never matches
    fn matches(&self, raw: &str, encoded: &str) -> bool;
}

/// Argon2id encoder producing PHC strings
#[derive(Clone, Default)]
pub struct Argon2PasswordEncoder {
    argon2: Argon2<'static>,
}

impl Argon2PasswordEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoder with explicit cost parameters
    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

impl PasswordEncoder for Argon2PasswordEncoder {
    fn encode(&self, raw: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        let hash = self
            .argon2
            .hash_password(raw.as_bytes(), &salt)
            .map_err(|e| PasswordError(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn matches(&self, raw: &str, encoded: &str) -> bool {
        match PasswordHash::new(encoded) {
            Ok(parsed) => self
                .argon2
                .verify_password(raw.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> Argon2PasswordEncoder {
        let params = Params::new(Params::MIN_M_COST, 1, 1, None).expect("argon2 params");
        Argon2PasswordEncoder::with_params(params)
    }

    #[test]
    fn test_encode_then_match() {
        let encoder = encoder();
        let hash = encoder.encode("password").expect("hash");

        assert_ne!(hash, "password");
        assert!(hash.starts_with("$argon2id$"));
        assert!(encoder.matches("password", &hash));
        assert!(!encoder.matches("Password", &hash));
    }

    #[test]
    fn test_salts_differ() {
        let encoder = encoder();
        let first = encoder.encode("password").expect("hash");
        let second = encoder.encode("password").expect("hash");
        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        assert!(!encoder().matches("password", "not-a-hash"));
    }
}
