//! Embedded migration runner.

use std::time::{Duration, Instant};

use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::MigrationHarness;
use tokio::task::spawn_blocking;

use crate::{MIGRATIONS, PgClient, PgError, PgResult, TRACING_TARGET_MIGRATION};

/// Outcome of a migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationResult {
    /// Wall-clock time spent applying migrations.
    pub duration: Duration,
    /// Versions applied during this run, oldest first.
    pub applied_versions: Vec<String>,
}

impl MigrationResult {
    /// Returns whether the schema was already up to date.
    #[inline]
    pub fn is_no_op(&self) -> bool {
        self.applied_versions.is_empty()
    }

    /// Returns the most recent version applied by this run.
    pub fn last_applied_version(&self) -> Option<&str> {
        self.applied_versions.last().map(String::as_str)
    }
}

/// Runs all pending embedded migrations.
///
/// Diesel's migration harness is synchronous, so the pooled connection is
/// wrapped and driven on a blocking thread.
#[tracing::instrument(skip(pg), target = TRACING_TARGET_MIGRATION)]
pub async fn run_pending_migrations(pg: &PgClient) -> PgResult<MigrationResult> {
    tracing::info!(target: TRACING_TARGET_MIGRATION, "Starting database migration process");

    let start_time = Instant::now();
    let conn = pg.get_pooled_connection().await?;
    let mut conn: AsyncConnectionWrapper<_> = conn.into();

    let versions = spawn_blocking(move || {
        conn.run_pending_migrations(MIGRATIONS).map(|versions| {
            versions
                .into_iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
        })
    })
    .await
    .map_err(|err| {
        tracing::error!(target: TRACING_TARGET_MIGRATION, error = %err, "Migration task panicked");
        PgError::Migration(err.into())
    })?
    .map_err(|err| {
        tracing::error!(target: TRACING_TARGET_MIGRATION, error = %err, "Database migration failed");
        PgError::Migration(err)
    })?;

    let result = MigrationResult {
        duration: start_time.elapsed(),
        applied_versions: versions,
    };

    if result.is_no_op() {
        tracing::info!(target: TRACING_TARGET_MIGRATION, "Database schema is already up to date");
    } else {
        tracing::info!(
            target: TRACING_TARGET_MIGRATION,
            duration = ?result.duration,
            migrations_count = result.applied_versions.len(),
            last_version = result.last_applied_version(),
            "Database migrations applied"
        );
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_is_no_op() {
        let result = MigrationResult {
            duration: Duration::from_millis(3),
            applied_versions: vec![],
        };
        assert!(result.is_no_op());
        assert_eq!(result.last_applied_version(), None);
    }

    #[test]
    fn last_applied_version() {
        let result = MigrationResult {
            duration: Duration::from_millis(3),
            applied_versions: vec!["20260101000000".into(), "20260201000000".into()],
        };
        assert!(!result.is_no_op());
        assert_eq!(result.last_applied_version(), Some("20260201000000"));
    }
}
