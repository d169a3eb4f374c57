//! Database error type.

use std::borrow::Cow;

pub use deadpool::managed::TimeoutType;
use diesel::result::DatabaseErrorKind;
pub use diesel::result::{ConnectionError, Error as DieselError};
use diesel_async::pooled_connection::PoolError;
use diesel_async::pooled_connection::deadpool::PoolError as DeadpoolError;

use crate::TRACING_TARGET_CONNECTION;
use crate::types::ConstraintViolation;

/// Result of a database operation.
pub type PgResult<T, E = PgError> = Result<T, E>;

/// Failure of a pool, migration or query operation.
#[derive(Debug, thiserror::Error)]
#[must_use = "database errors should be handled appropriately"]
pub enum PgError {
    /// Rejected [`PgConfig`] settings.
    ///
    /// [`PgConfig`]: crate::PgConfig
    #[error("invalid database configuration: {0}")]
    Config(Cow<'static, str>),

    /// Waiting for, creating or recycling a pooled connection timed out.
    #[error("database {} timed out", timeout_stage(.0))]
    Timeout(TimeoutType),

    #[error("database connection failed: {0}")]
    Connection(#[from] ConnectionError),

    #[error("database migration failed: {0}")]
    Migration(Box<dyn std::error::Error + Send + Sync>),

    /// Query failure, including unique and check constraint violations.
    #[error("database query failed: {0}")]
    Query(#[from] DieselError),

    /// The pool itself is unusable, for example closed or misconfigured.
    #[error("connection pool error: {0}")]
    Pool(Cow<'static, str>),
}

fn timeout_stage(timeout: &TimeoutType) -> &'static str {
    match timeout {
        TimeoutType::Wait => "pool wait",
        TimeoutType::Create => "connect",
        TimeoutType::Recycle => "connection recycle",
    }
}

impl PgError {
    /// Name of the violated constraint, if the query hit one.
    pub fn constraint(&self) -> Option<&str> {
        match self {
            Self::Query(DieselError::DatabaseError(_, info)) => info.constraint_name(),
            _ => None,
        }
    }

    /// Typed form of [`constraint`] for constraints this schema declares.
    ///
    /// [`constraint`]: PgError::constraint
    pub fn constraint_violation(&self) -> Option<ConstraintViolation> {
        self.constraint().and_then(ConstraintViolation::new)
    }

    /// Whether retrying the same operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_)
                | Self::Connection(ConnectionError::BadConnection(_))
                | Self::Query(DieselError::DatabaseError(
                    DatabaseErrorKind::SerializationFailure,
                    _
                ))
        )
    }
}

impl From<DeadpoolError> for PgError {
    fn from(error: DeadpoolError) -> Self {
        match error {
            DeadpoolError::Timeout(timeout) => Self::Timeout(timeout),
            DeadpoolError::Backend(PoolError::ConnectionError(error)) => Self::Connection(error),
            DeadpoolError::Backend(PoolError::QueryError(error)) => Self::Query(error),
            DeadpoolError::Closed => Self::Pool("pool is closed".into()),
            DeadpoolError::NoRuntimeSpecified => Self::Pool("no async runtime configured".into()),
            DeadpoolError::PostCreateHook(error) => {
                tracing::warn!(target: TRACING_TARGET_CONNECTION, error = %error, "post-create hook failed");
                Self::Pool(error.to_string().into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_is_permanent() {
        let error = PgError::Config("url cannot be empty".into());
        assert!(!error.is_transient());
        assert!(error.constraint().is_none());
        assert_eq!(
            error.to_string(),
            "invalid database configuration: url cannot be empty"
        );
    }

    #[test]
    fn timeouts_are_transient_and_name_the_stage() {
        let error = PgError::Timeout(TimeoutType::Wait);
        assert!(error.is_transient());
        assert_eq!(error.to_string(), "database pool wait timed out");
        assert_eq!(
            PgError::Timeout(TimeoutType::Create).to_string(),
            "database connect timed out"
        );
    }

    #[test]
    fn closed_pool_is_permanent() {
        let error = PgError::from(DeadpoolError::Closed);
        assert!(matches!(error, PgError::Pool(_)));
        assert!(!error.is_transient());
    }

    #[test]
    fn not_found_has_no_constraint() {
        let error = PgError::Query(DieselError::NotFound);
        assert!(error.constraint_violation().is_none());
        assert!(!error.is_transient());
    }
}
