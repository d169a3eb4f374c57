//! User account model.
//!
//! - [`User`] - Complete account row including role and status
//! - [`NewUser`] - Data for registering a new account
//! - [`UpdateUser`] - Partial changes to an existing account

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::users;
use crate::types::{UserRole, UserStatus};

/// A registered platform user.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Lower-cased email address used to sign in.
    pub email: String,
    /// Public name shown next to comments and articles.
    pub display_name: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// The single role that determines the user's permissions.
    pub role: UserRole,
    /// Account lifecycle status.
    pub status: UserStatus,
    /// SHA-256 hex digest of the outstanding email verification token.
    pub verification_token_hash: Option<String>,
    /// When the outstanding verification token stops being accepted.
    pub verification_expires_at: Option<Timestamp>,
    /// When the email address was confirmed.
    pub email_verified_at: Option<Timestamp>,
    /// Timestamp when the account was created.
    pub created_at: Timestamp,
    /// Timestamp when the account was last updated.
    pub updated_at: Timestamp,
}

/// Data for registering a new user.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUser {
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub verification_token_hash: Option<String>,
    pub verification_expires_at: Option<Timestamp>,
}

/// Data for updating a user.
///
/// For nullable columns `Some(None)` clears the value and `None` leaves it untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateUser {
    pub display_name: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub verification_token_hash: Option<Option<String>>,
    pub verification_expires_at: Option<Option<Timestamp>>,
    pub email_verified_at: Option<Option<Timestamp>>,
    pub updated_at: Option<Timestamp>,
}

impl User {
    /// Returns whether the user may authenticate in their current status.
    #[inline]
    pub fn can_authenticate(&self) -> bool {
        self.status.can_authenticate()
    }

    /// Returns whether the email address has been confirmed.
    #[inline]
    pub fn is_email_verified(&self) -> bool {
        self.email_verified_at.is_some()
    }

    /// Returns whether the outstanding verification token has expired.
    ///
    /// Users without a token are treated as expired.
    pub fn is_verification_expired(&self) -> bool {
        self.verification_expires_at
            .map(|expires_at| jiff::Timestamp::from(expires_at) <= jiff::Timestamp::now())
            .unwrap_or(true)
    }
}
