//! Errors raised while wiring up or running services.
//!
//! These cover loading key files, preparing the database and issuing
//! verification tokens. Request-level errors live in [`crate::handler::Error`].

use std::borrow::Cow;
use std::error::Error as StdError;

use hustings_postgres::PgError;
use strum::{AsRefStr, Display};

/// Boxed error source that can cross thread boundaries.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Result type alias for service layer operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// What went wrong in a service layer [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Invalid or missing configuration.
    Config,
    /// Postgres could not be reached or migrated.
    Database,
    /// Session key material is malformed or mismatched.
    KeyMaterial,
    /// A file could not be read.
    Io,
    /// Anything else.
    Internal,
}

/// Service layer error with a kind, a message and an optional source.
#[derive(Debug, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    #[source]
    source: Option<BoxedError>,
}

impl Error {
    /// Creates an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attaches the underlying error.
    #[inline]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    #[must_use]
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns whether a retry could succeed once a dependency recovers.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self.kind, ErrorKind::Database)
    }
}

impl From<PgError> for Error {
    fn from(err: PgError) -> Self {
        let kind = match err {
            PgError::Config(_) => ErrorKind::Config,
            _ => ErrorKind::Database,
        };

        Self::new(kind, err.to_string()).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_kind_and_message() {
        let error = Error::new(ErrorKind::KeyMaterial, "invalid decoding key PEM format");
        assert_eq!(
            error.to_string(),
            "key_material: invalid decoding key PEM format"
        );
    }

    #[test]
    fn keeps_source() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::new(ErrorKind::Io, "cannot read key file").with_source(source);

        assert!(StdError::source(&error).is_some());
        assert!(!error.is_transient());
    }

    #[test]
    fn postgres_errors_keep_their_category() {
        let error = Error::from(PgError::Config("missing url".into()));
        assert_eq!(error.kind(), ErrorKind::Config);

        let error = Error::from(PgError::Pool("pool is closed".into()));
        assert_eq!(error.kind(), ErrorKind::Database);
        assert!(error.is_transient());
    }
}
