//! Moderation log repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use super::Pagination;
use crate::model::{ModerationLog, NewModerationLog};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for moderation log database operations.
///
/// Entries are append-only: there is no update or delete.
pub trait ModerationLogRepository {
    /// Records a moderation action.
    fn create_moderation_log(
        &mut self,
        entry: NewModerationLog,
    ) -> impl Future<Output = PgResult<ModerationLog>> + Send;

    /// Lists moderation entries, newest first, optionally for one target user.
    fn list_moderation_logs(
        &mut self,
        target_user_id: Option<Uuid>,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<ModerationLog>>> + Send;
}

impl ModerationLogRepository for PgConnection {
    async fn create_moderation_log(&mut self, entry: NewModerationLog) -> PgResult<ModerationLog> {
        use schema::moderation_logs;

        diesel::insert_into(moderation_logs::table)
            .values(&entry)
            .returning(ModerationLog::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn list_moderation_logs(
        &mut self,
        target_user_id: Option<Uuid>,
        pagination: Pagination,
    ) -> PgResult<Vec<ModerationLog>> {
        use schema::moderation_logs::{self, dsl};

        let mut query = moderation_logs::table.into_boxed();
        if let Some(target_user_id) = target_user_id {
            query = query.filter(dsl::target_user_id.eq(target_user_id));
        }

        query
            .order(dsl::created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(ModerationLog::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }
}
