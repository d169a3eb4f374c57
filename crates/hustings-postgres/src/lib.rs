#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Migrations under `migrations/`, compiled into the binary.
pub(crate) const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
    diesel_migrations::embed_migrations!();

/// Pool setup, connection handshakes and pool hooks.
pub const TRACING_TARGET_CONNECTION: &str = "hustings_postgres::connection";

/// Startup schema migrations.
pub const TRACING_TARGET_MIGRATION: &str = "hustings_postgres::migrations";

mod client;
pub mod error;
pub mod model;
pub mod query;
mod schema;
pub mod types;

pub use diesel_async::AsyncPgConnection as PgConnection;

pub use crate::client::{
    ConnectionPool, MigrationResult, PgClient, PgConfig, PgConn, PgPoolStatus, PooledConnection,
    run_pending_migrations,
};
pub use crate::error::{PgError, PgResult};
