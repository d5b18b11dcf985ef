use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier as _, SaltString,
    },
    Argon2,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::shared::AppError;

/// Turns plaintext passwords into stored digests and checks them later
pub trait PasswordVerifier: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AppError>;
    fn verify(&self, password: &str, stored_digest: &str) -> Result<bool, AppError>;
}

/// Unsalted SHA-256, base64 encoded. Same input always yields the same digest.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256PasswordVerifier;

impl Sha256PasswordVerifier {
    pub fn digest(password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        STANDARD.encode(hasher.finalize())
    }
}

impl PasswordVerifier for Sha256PasswordVerifier {
    fn hash(&self, password: &str) -> Result<String, AppError> {
        Ok(Self::digest(password))
    }

    fn verify(&self, password: &str, stored_digest: &str) -> Result<bool, AppError> {
        Ok(Self::digest(password) == stored_digest)
    }
}

/// Salted Argon2id producing PHC strings.
///
/// Digests written by [`Sha256PasswordVerifier`] never verify here, so switching
/// an existing user base over requires re-registering or a migration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordVerifier;

impl PasswordVerifier for Argon2PasswordVerifier {
    fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                warn!(error = %e, "Argon2 hashing failed");
                AppError::Internal
            })
    }

    fn verify(&self, password: &str, stored_digest: &str) -> Result<bool, AppError> {
        let parsed = match PasswordHash::new(stored_digest) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!(error = %e, "Stored digest is not a PHC string");
                return Ok(false);
            }
        };

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
