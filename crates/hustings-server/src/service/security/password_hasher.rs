//! Argon2id password hashing.

use argon2::password_hash::{Error as ArgonError, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier};
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::{Rng, thread_rng};

use crate::handler::{ErrorKind, Result};
use crate::utility::tracing_targets::TRACING_TARGET_PASSWORD_HASHER as TRACING_TARGET;

/// Hashes and verifies account passwords with Argon2id default parameters.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Creates a hasher with the default Argon2id parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hashes a password with a fresh random salt into a PHC string.
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "password hashing failed"
                );

                ErrorKind::InternalServerError
                    .with_message("Password processing failed")
                    .with_resource("authentication")
            })?;

        Ok(password_hash.to_string())
    }

    /// Verifies a password against a stored PHC string.
    ///
    /// A wrong password is `Unauthorized`; a corrupt hash is a server error.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<()> {
        let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "stored password hash is malformed"
            );

            ErrorKind::InternalServerError
                .with_message("Authentication temporarily unavailable")
                .with_resource("authentication")
        })?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(()),
            Err(ArgonError::Password) => {
                tracing::debug!(target: TRACING_TARGET, "password mismatch");
                Err(ErrorKind::Unauthorized
                    .with_message("Invalid email or password")
                    .with_resource("authentication"))
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "password verification failed"
                );
                Err(ErrorKind::InternalServerError
                    .with_message("Authentication temporarily unavailable")
                    .with_resource("authentication"))
            }
        }
    }

    /// Spends about as long as a real verification, for unknown accounts.
    ///
    /// Always returns `false`.
    pub fn verify_dummy_password(&self, password: &str) -> bool {
        let dummy_password: String = thread_rng()
            .sample_iter(&Alphanumeric)
            .take(24)
            .map(char::from)
            .collect();

        match self.hash_password(&dummy_password) {
            Ok(dummy_hash) => {
                let _ = self.verify_password(password, &dummy_hash);
            }
            Err(_) => {
                tracing::warn!(target: TRACING_TARGET, "dummy hash generation failed");
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("correct horse battery")?;

        assert!(hash.starts_with("$argon2id$"));
        hasher.verify_password("correct horse battery", &hash)?;
        Ok(())
    }

    #[test]
    fn wrong_password_is_unauthorized() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("correct horse battery")?;

        let error = hasher.verify_password("tr0ub4dor", &hash).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unauthorized);
        Ok(())
    }

    #[test]
    fn salts_differ() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        assert_ne!(hasher.hash_password("same")?, hasher.hash_password("same")?);
        Ok(())
    }

    #[test]
    fn malformed_hash_is_server_error() {
        let error = PasswordHasher::new()
            .verify_password("anything", "not-a-phc-string")
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
    }

    #[test]
    fn dummy_never_matches() {
        assert!(!PasswordHasher::new().verify_dummy_password("anything"));
    }
}
