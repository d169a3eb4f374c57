//! Health check response types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Liveness of the server and its database.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    /// Whether every dependency is usable.
    pub is_healthy: bool,
    /// Whether a database connection could be acquired.
    pub database: bool,
    /// Timestamp of the check.
    pub checked_at: Timestamp,
}
