//! Authentication response types.

use hustings_postgres::types::UserRole;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extract::AuthClaims;

/// Session issued after registration, login or email verification.
///
/// The same token is also returned in the `Authorization` header.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    /// ID of the signed-in user.
    pub user_id: Uuid,
    /// Role at the time the token was issued.
    pub role: UserRole,
    /// Timestamp when the token was issued.
    pub issued_at: Timestamp,
    /// Timestamp when the token expires.
    pub expires_at: Timestamp,
    /// The bearer token.
    pub token: String,
}

impl AuthSession {
    /// Creates a session response from signed claims.
    pub fn new(claims: &AuthClaims, token: String) -> Self {
        Self {
            user_id: claims.subject_id,
            role: claims.role,
            issued_at: claims.issued_at,
            expires_at: claims.expires_at,
            token,
        }
    }
}
