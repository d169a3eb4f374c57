//! User and moderation response types.

use hustings_postgres::model;
use hustings_postgres::types::{ModerationAction, UserRole, UserStatus};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a user account. Never includes credentials.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// ID of the user.
    pub user_id: Uuid,
    /// Email address.
    pub email: String,
    /// Public name.
    pub display_name: String,
    /// Current role.
    pub role: UserRole,
    /// Current status.
    pub status: UserStatus,
    /// Timestamp when the email address was confirmed.
    pub email_verified_at: Option<Timestamp>,
    /// Timestamp when the account was created.
    pub created_at: Timestamp,
    /// Timestamp when the account was last updated.
    pub updated_at: Timestamp,
}

impl User {
    /// Creates a User response from a database model.
    pub fn from_model(user: model::User) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
            display_name: user.display_name,
            role: user.role,
            status: user.status,
            email_verified_at: user.email_verified_at.map(Into::into),
            created_at: user.created_at.into(),
            updated_at: user.updated_at.into(),
        }
    }

    /// Creates a list of User responses from database models.
    pub fn from_models(models: Vec<model::User>) -> Vec<Self> {
        models.into_iter().map(Self::from_model).collect()
    }
}

/// Response for listing users.
pub type Users = Vec<User>;

/// Represents a moderation log entry.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationLog {
    /// ID of the entry.
    pub log_id: Uuid,
    /// Staff member who acted.
    pub moderator_id: Uuid,
    /// User the action was taken against.
    pub target_user_id: Uuid,
    /// What was done.
    pub action: ModerationAction,
    /// Why it was done.
    pub reason: Option<String>,
    /// Timestamp of the action.
    pub created_at: Timestamp,
}

impl ModerationLog {
    /// Creates a ModerationLog response from a database model.
    pub fn from_model(log: model::ModerationLog) -> Self {
        Self {
            log_id: log.id,
            moderator_id: log.moderator_id,
            target_user_id: log.target_user_id,
            action: log.action,
            reason: log.reason,
            created_at: log.created_at.into(),
        }
    }

    /// Creates a list of ModerationLog responses from database models.
    pub fn from_models(models: Vec<model::ModerationLog>) -> Vec<Self> {
        models.into_iter().map(Self::from_model).collect()
    }
}

/// Response for listing moderation logs.
pub type ModerationLogs = Vec<ModerationLog>;

/// Outcome of a ban, suspend or reinstate action.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationResult {
    /// The user after the action.
    pub user: User,
    /// The log entry recording the action.
    pub log: ModerationLog,
}

impl ModerationResult {
    /// Creates a ModerationResult response from database models.
    pub fn from_models(user: model::User, log: model::ModerationLog) -> Self {
        Self {
            user: User::from_model(user),
            log: ModerationLog::from_model(log),
        }
    }
}
