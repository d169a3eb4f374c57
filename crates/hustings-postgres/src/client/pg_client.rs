use std::fmt;
use std::time::{Duration, Instant};

use derive_more::{Deref, DerefMut};
use diesel_async::AsyncConnection;
use diesel_async::scoped_futures::ScopedBoxFuture;

use crate::{
    ConnectionPool, PgConfig, PgError, PgResult, PooledConnection, TRACING_TARGET_CONNECTION,
};

/// Size, idle and waiter counts of the pool.
pub type PgPoolStatus = deadpool::managed::Status;

/// Checkouts slower than this are logged.
const SLOW_CHECKOUT: Duration = Duration::from_millis(100);

/// Handle to the connection pool. Clones share the pool.
#[derive(Clone)]
pub struct PgClient {
    pool: ConnectionPool,
}

impl PgClient {
    /// Creates a client without validating `config`; see [`PgConfig::build`].
    pub fn new(config: &PgConfig) -> PgResult<Self> {
        let pool = config.build_pool()?;
        tracing::info!(
            target: TRACING_TARGET_CONNECTION,
            url = %config.masked_url(),
            max_connections = config.max_connections,
            "Connection pool created"
        );

        Ok(Self { pool })
    }

    /// Checks out a connection, waiting up to the configured timeout.
    pub async fn get_connection(&self) -> PgResult<PgConn> {
        self.get_pooled_connection().await.map(PgConn::new)
    }

    pub(crate) async fn get_pooled_connection(&self) -> PgResult<PooledConnection> {
        let start = Instant::now();
        let result = self.pool.get().await;
        let elapsed = start.elapsed();

        match result {
            Ok(conn) => {
                if elapsed > SLOW_CHECKOUT {
                    tracing::warn!(target: TRACING_TARGET_CONNECTION, ?elapsed, "Slow connection checkout");
                }
                Ok(conn)
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET_CONNECTION,
                    %error,
                    ?elapsed,
                    "Connection checkout failed"
                );
                Err(PgError::from(error))
            }
        }
    }

    #[inline]
    pub fn pool_status(&self) -> PgPoolStatus {
        self.pool.status()
    }
}

impl fmt::Debug for PgClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgClient")
            .field("status", &self.pool_status())
            .finish()
    }
}

/// A pooled database connection.
///
/// Implements every repository trait (for example [`UserRepository`]) via
/// [`Deref`] to the underlying [`AsyncPgConnection`]. The connection goes
/// back to the pool on drop.
///
/// ```ignore
/// let mut conn = pg_client.get_connection().await?;
/// let user = conn.find_user_by_id(user_id).await?;
/// ```
///
/// [`UserRepository`]: crate::query::UserRepository
/// [`AsyncPgConnection`]: crate::PgConnection
#[derive(Deref, DerefMut)]
pub struct PgConn {
    #[deref]
    #[deref_mut]
    conn: PooledConnection,
}

impl PgConn {
    fn new(conn: PooledConnection) -> Self {
        Self { conn }
    }

    /// Executes the given function within a database transaction.
    ///
    /// Commits when the function returns `Ok`, rolls back on `Err`.
    ///
    /// ```ignore
    /// conn.transaction(|conn| {
    ///     async move {
    ///         let user = conn.update_user(user_id, changes).await?;
    ///         conn.create_moderation_log(entry).await?;
    ///         Ok(user)
    ///     }
    ///     .scope_boxed()
    /// })
    /// .await?;
    /// ```
    pub async fn transaction<'a, T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: for<'r> FnOnce(&'r mut PooledConnection) -> ScopedBoxFuture<'a, 'r, Result<T, E>>
            + Send
            + 'a,
        T: Send + 'a,
        E: From<diesel::result::Error> + Send + 'a,
    {
        self.conn.transaction(f).await
    }
}

impl fmt::Debug for PgConn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgConn").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_pool() -> PgResult<()> {
        let client = PgConfig::new("postgresql://localhost/hustings")
            .with_max_connections(3)
            .build()?;
        let clone = client.clone();

        assert_eq!(clone.pool_status().max_size, 3);
        assert_eq!(client.pool_status().size, 0);
        assert!(format!("{client:?}").starts_with("PgClient"));
        Ok(())
    }
}
