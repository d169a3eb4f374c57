//! Moderation log model.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::moderation_logs;
use crate::types::ModerationAction;

/// An append-only record of a moderation action.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = moderation_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ModerationLog {
    pub id: Uuid,
    pub moderator_id: Uuid,
    pub target_user_id: Uuid,
    pub action: ModerationAction,
    pub reason: Option<String>,
    pub created_at: Timestamp,
}

/// Data for recording a moderation action.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = moderation_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewModerationLog {
    pub moderator_id: Uuid,
    pub target_user_id: Uuid,
    pub action: ModerationAction,
    pub reason: Option<String>,
}
