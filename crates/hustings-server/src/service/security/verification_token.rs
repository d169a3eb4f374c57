//! One-time email verification tokens.
//!
//! The plain token goes to the account holder; only its SHA-256 digest is
//! stored, so a database leak does not reveal usable tokens.

use jiff::{SignedDuration, Timestamp};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use crate::{Error, ErrorKind, Result};

/// Number of random bytes in a token before hex encoding.
const TOKEN_BYTES: usize = 32;

/// Hex digits of the digest shown in logs.
const FINGERPRINT_LEN: usize = 12;

/// A freshly generated verification token.
#[derive(Clone, PartialEq, Eq)]
pub struct VerificationToken {
    token: String,
    token_hash: String,
    expires_at: Timestamp,
}

impl VerificationToken {
    /// How long a token stays valid.
    pub const VALIDITY: SignedDuration = SignedDuration::from_hours(48);

    /// Generates a random token valid for [`Self::VALIDITY`].
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        let token = hex::encode(bytes);

        let expires_at = Timestamp::now()
            .checked_add(Self::VALIDITY)
            .map_err(|e| {
                Error::new(ErrorKind::Internal, "verification token expiry overflow").with_source(e)
            })?;

        Ok(Self {
            token_hash: Self::hash(&token),
            token,
            expires_at,
        })
    }

    /// Returns the hex SHA-256 digest of a presented token.
    pub fn hash(token: &str) -> String {
        hex::encode(Sha256::digest(token.trim().as_bytes()))
    }

    /// Returns the plain token to hand to the account holder.
    #[inline]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the digest to store.
    #[inline]
    pub fn token_hash(&self) -> &str {
        &self.token_hash
    }

    /// Returns a short prefix of the digest, safe to log.
    #[inline]
    pub fn fingerprint(&self) -> &str {
        &self.token_hash[..FINGERPRINT_LEN]
    }

    /// Returns when the token stops being accepted.
    #[inline]
    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }
}

impl std::fmt::Debug for VerificationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationToken")
            .field("token_hash", &self.token_hash)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_token_shape() -> anyhow::Result<()> {
        let token = VerificationToken::generate()?;

        assert_eq!(token.token().len(), TOKEN_BYTES * 2);
        assert!(token.token().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(token.token_hash(), VerificationToken::hash(token.token()));
        assert_ne!(token.token(), token.token_hash());
        Ok(())
    }

    #[test]
    fn expires_in_two_days() -> anyhow::Result<()> {
        let token = VerificationToken::generate()?;
        let remaining = token.expires_at().duration_since(Timestamp::now());

        assert!(remaining <= VerificationToken::VALIDITY);
        assert!(remaining > SignedDuration::from_hours(47));
        Ok(())
    }

    #[test]
    fn hash_is_known_sha256() {
        assert_eq!(
            VerificationToken::hash("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn debug_hides_plain_token() -> anyhow::Result<()> {
        let token = VerificationToken::generate()?;
        assert!(!format!("{token:?}").contains(token.token()));
        Ok(())
    }

    #[test]
    fn fingerprint_is_a_digest_prefix() -> anyhow::Result<()> {
        let token = VerificationToken::generate()?;

        assert_eq!(token.fingerprint().len(), FINGERPRINT_LEN);
        assert!(token.token_hash().starts_with(token.fingerprint()));
        assert!(!token.token().contains(token.fingerprint()));
        Ok(())
    }
}
