//! User administration request types.

use hustings_postgres::types::{UserRole, UserStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request payload for assigning a role.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRole {
    /// The role to assign.
    pub role: UserRole,
}

/// Request payload for ban, suspend and reinstate.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ModerateUser {
    /// Why the action was taken, kept in the moderation log.
    #[validate(length(max = 1000))]
    pub reason: Option<String>,
}

/// Filters for listing users.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
pub struct UserFilter {
    /// Only users holding this role.
    pub role: Option<UserRole>,
    /// Only users in this status.
    pub status: Option<UserStatus>,
}

/// Filters for listing moderation logs.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationLogFilter {
    /// Only entries about this user.
    pub target_user_id: Option<Uuid>,
}
