//! Ed25519 key pair used to sign and verify session tokens.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[cfg(any(test, feature = "config"))]
use clap::Args;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::utility::tracing_targets::TRACING_TARGET_SESSION_KEYS as TRACING_TARGET;
use crate::{Error, ErrorKind, Result};

/// Key file locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
pub struct SessionKeysConfig {
    /// File path to the JWT decoding (public) key.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "AUTH_PUBLIC_PEM_FILEPATH", default_value = "./public.pem")
    )]
    #[serde(default = "SessionKeysConfig::default_decoding_key")]
    pub decoding_key: PathBuf,

    /// File path to the JWT encoding (private) key.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "AUTH_PRIVATE_PEM_FILEPATH", default_value = "./private.pem")
    )]
    #[serde(default = "SessionKeysConfig::default_encoding_key")]
    pub encoding_key: PathBuf,
}

impl SessionKeysConfig {
    fn default_decoding_key() -> PathBuf {
        "./public.pem".into()
    }

    fn default_encoding_key() -> PathBuf {
        "./private.pem".into()
    }
}

impl Default for SessionKeysConfig {
    fn default() -> Self {
        Self {
            decoding_key: Self::default_decoding_key(),
            encoding_key: Self::default_encoding_key(),
        }
    }
}

/// Signing and verification keys for session tokens, plus the token lifetime.
///
/// Cheap to clone.
#[derive(Clone)]
pub struct SessionKeys {
    inner: Arc<SessionKeysInner>,
}

struct SessionKeysInner {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    session_ttl: Duration,
}

impl SessionKeys {
    /// Lifetime of issued tokens unless configured otherwise.
    pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

    /// Loads both keys from the configured PEM files.
    pub async fn from_config(config: &SessionKeysConfig) -> Result<Self> {
        tracing::debug!(
            target: TRACING_TARGET,
            decoding_key_path = %config.decoding_key.display(),
            encoding_key_path = %config.encoding_key.display(),
            "loading session keys",
        );

        let decoding_pem = Self::read_pem(&config.decoding_key, "decoding").await?;
        let encoding_pem = Self::read_pem(&config.encoding_key, "encoding").await?;
        let keys = Self::from_pem(&decoding_pem, &encoding_pem)?;

        tracing::info!(target: TRACING_TARGET, "session keys loaded");
        Ok(keys)
    }

    /// Parses keys from in-memory PEM data.
    pub fn from_pem(decoding_pem: &[u8], encoding_pem: &[u8]) -> Result<Self> {
        let decoding_key = DecodingKey::from_ed_pem(decoding_pem).map_err(|e| {
            tracing::error!(target: TRACING_TARGET, error = %e, "invalid decoding key");
            Error::new(ErrorKind::KeyMaterial, "invalid decoding key PEM format").with_source(e)
        })?;

        let encoding_key = EncodingKey::from_ed_pem(encoding_pem).map_err(|e| {
            tracing::error!(target: TRACING_TARGET, error = %e, "invalid encoding key");
            Error::new(ErrorKind::KeyMaterial, "invalid encoding key PEM format").with_source(e)
        })?;

        Ok(Self {
            inner: Arc::new(SessionKeysInner {
                decoding_key,
                encoding_key,
                session_ttl: Self::DEFAULT_SESSION_TTL,
            }),
        })
    }

    /// Returns a copy with a different token lifetime.
    pub fn with_session_ttl(self, session_ttl: Duration) -> Self {
        let inner = SessionKeysInner {
            decoding_key: self.inner.decoding_key.clone(),
            encoding_key: self.inner.encoding_key.clone(),
            session_ttl,
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    /// Returns the key used to verify tokens.
    #[inline]
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.inner.decoding_key
    }

    /// Returns the key used to sign tokens.
    #[inline]
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.inner.encoding_key
    }

    /// Returns the lifetime of newly issued tokens.
    #[inline]
    pub fn session_ttl(&self) -> Duration {
        self.inner.session_ttl
    }

    /// Signs and verifies a throwaway token to prove the pair matches.
    pub fn validate_keys(&self) -> Result<()> {
        #[derive(Serialize, Deserialize)]
        struct ProbeClaims {
            sub: String,
            exp: i64,
        }

        let claims = ProbeClaims {
            sub: "probe".to_owned(),
            exp: jiff::Timestamp::now().as_second() + 300,
        };

        let token = encode(&Header::new(Algorithm::EdDSA), &claims, self.encoding_key())
            .map_err(|e| {
                Error::new(ErrorKind::KeyMaterial, "key validation encoding failed").with_source(e)
            })?;

        decode::<ProbeClaims>(&token, self.decoding_key(), &Validation::new(Algorithm::EdDSA))
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "session keys do not form a pair",
                );
                Error::new(ErrorKind::KeyMaterial, "key validation decoding failed").with_source(e)
            })?;

        Ok(())
    }

    async fn read_pem(path: &Path, which: &'static str) -> Result<Vec<u8>> {
        tokio::fs::read(path).await.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                path = %path.display(),
                error = %e,
                "failed to read {which} key file",
            );
            Error::new(ErrorKind::Io, format!("failed to read {which} key file")).with_source(e)
        })
    }
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys")
            .field("session_ttl", &self.inner.session_ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    pub(crate) const TEST_PUBLIC_KEY: &[u8] = include_bytes!("../../../testdata/public.pem");
    pub(crate) const TEST_PRIVATE_KEY: &[u8] = include_bytes!("../../../testdata/private.pem");

    /// Keys backed by the checked-in test key pair.
    pub(crate) fn test_session_keys() -> SessionKeys {
        SessionKeys::from_pem(TEST_PUBLIC_KEY, TEST_PRIVATE_KEY)
            .expect("test key pair must parse")
    }

    #[tokio::test]
    async fn load_keys_from_files() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let config = SessionKeysConfig {
            decoding_key: temp_dir.path().join("public.pem"),
            encoding_key: temp_dir.path().join("private.pem"),
        };
        fs::write(&config.decoding_key, TEST_PUBLIC_KEY)?;
        fs::write(&config.encoding_key, TEST_PRIVATE_KEY)?;

        let keys = SessionKeys::from_config(&config).await?;
        keys.validate_keys()?;
        assert_eq!(keys.session_ttl(), SessionKeys::DEFAULT_SESSION_TTL);
        Ok(())
    }

    #[tokio::test]
    async fn reject_invalid_key_format() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let config = SessionKeysConfig {
            decoding_key: temp_dir.path().join("invalid.pem"),
            encoding_key: temp_dir.path().join("private.pem"),
        };
        fs::write(&config.decoding_key, "invalid pem")?;
        fs::write(&config.encoding_key, TEST_PRIVATE_KEY)?;

        let error = SessionKeys::from_config(&config).await.unwrap_err();
        assert_eq!(error.kind(), crate::ErrorKind::KeyMaterial);
        Ok(())
    }

    #[tokio::test]
    async fn reject_missing_files() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let config = SessionKeysConfig {
            decoding_key: temp_dir.path().join("missing_public.pem"),
            encoding_key: temp_dir.path().join("missing_private.pem"),
        };

        let error = SessionKeys::from_config(&config).await.unwrap_err();
        assert_eq!(error.kind(), crate::ErrorKind::Io);
        Ok(())
    }

    #[test]
    fn ttl_can_be_overridden() {
        let keys = test_session_keys().with_session_ttl(Duration::from_secs(60));
        assert_eq!(keys.session_ttl(), Duration::from_secs(60));
        assert!(keys.validate_keys().is_ok());
    }
}
