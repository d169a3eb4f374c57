//! Moderation: banning, suspending and reinstating accounts.
//!
//! Every action writes the new status and a moderation log entry in a single
//! transaction. Banned and suspended users lose access on their next request
//! because the authorization layer re-reads the account every time.

use axum::extract::State;
use axum::http::StatusCode;
use hustings_postgres::PgClient;
use hustings_postgres::model::{NewModerationLog, User as UserModel};
use hustings_postgres::query::{ModerationLogRepository, UserRepository};
use hustings_postgres::types::{ModerationAction, UserStatus};
use scoped_futures::ScopedFutureExt;

use super::request::{ModerateUser, ModerationLogFilter, Pagination, UserPathParams};
use super::response::{ModerationLog, ModerationLogs, ModerationResult};
use super::users::{check_target, find_user};
use crate::extract::{AuthState, Json, Path, Permission, Query, RolePermissions, ValidateJson};
use crate::handler::{Error, ErrorKind, Result};
use crate::middleware::{PolicyRouter, RoutePolicy};
use crate::service::ServiceState;
use crate::utility::tracing_targets::TRACING_TARGET_MODERATION;

/// Works out the status `action` moves `target` into.
///
/// Reinstated accounts go back to `pending` until their email is confirmed.
fn next_status(action: ModerationAction, target: &UserModel) -> Result<UserStatus> {
    let conflict = |message: &'static str| {
        Err(ErrorKind::Conflict
            .with_message(message)
            .with_context(format!("account status: {}", target.status))
            .with_resource("user"))
    };

    match (action, target.status) {
        (ModerationAction::Ban, UserStatus::Banned) => conflict("User is already banned"),
        (ModerationAction::Suspend, UserStatus::Suspended) => {
            conflict("User is already suspended")
        }
        (ModerationAction::Suspend, UserStatus::Banned) => {
            conflict("Banned users must be reinstated before they can be suspended")
        }
        (ModerationAction::Reinstate, UserStatus::Active | UserStatus::Pending) => {
            conflict("User is not banned or suspended")
        }
        (ModerationAction::Reinstate, _) if !target.is_email_verified() => Ok(UserStatus::Pending),
        (action, _) => Ok(action.resulting_status()),
    }
}

/// Lifting a ban takes the ban permission, not just the suspend one.
fn check_reinstate(auth_state: &AuthState, target: &UserModel) -> Result<()> {
    if target.status != UserStatus::Banned
        || RolePermissions::global().role_has(auth_state.role, Permission::UserBan)
    {
        return Ok(());
    }

    tracing::warn!(
        target: TRACING_TARGET_MODERATION,
        subject_id = %auth_state.subject_id,
        target_user_id = %target.id,
        "ban lift refused"
    );

    Err(ErrorKind::Forbidden
        .with_message(format!("requires one of: {}", Permission::UserBan))
        .with_context("only holders of the ban permission may lift a ban")
        .with_resource("user"))
}

/// Applies a moderation action and records it.
async fn moderate(
    pg_client: PgClient,
    auth_state: AuthState,
    path_params: UserPathParams,
    request: ModerateUser,
    action: ModerationAction,
) -> Result<(StatusCode, Json<ModerationResult>)> {
    let mut conn = pg_client.get_connection().await?;
    let target = find_user(&mut conn, &path_params).await?;
    check_target(&auth_state, &target, None)?;

    if action == ModerationAction::Reinstate {
        check_reinstate(&auth_state, &target)?;
    }

    let previous_status = target.status;
    let status = next_status(action, &target)?;
    let entry = NewModerationLog {
        moderator_id: auth_state.subject_id,
        target_user_id: target.id,
        action,
        reason: request.reason,
    };

    let (user, log) = conn
        .transaction(|conn| {
            async move {
                let user = conn.set_user_status(entry.target_user_id, status).await?;
                let log = conn.create_moderation_log(entry).await?;
                Ok::<_, Error<'static>>((user, log))
            }
            .scope_boxed()
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET_MODERATION,
        moderator_id = %auth_state.subject_id,
        target_user_id = %user.id,
        action = %action,
        previous_status = %previous_status,
        status = %user.status,
        log_id = %log.id,
        "moderation action applied"
    );

    Ok((StatusCode::OK, Json(ModerationResult::from_models(user, log))))
}

/// Bans a user permanently.
#[tracing::instrument(skip_all, fields(user_id = %path_params.user_id))]
async fn ban_user(
    State(pg_client): State<PgClient>,
    auth_state: AuthState,
    Path(path_params): Path<UserPathParams>,
    ValidateJson(request): ValidateJson<ModerateUser>,
) -> Result<(StatusCode, Json<ModerationResult>)> {
    moderate(pg_client, auth_state, path_params, request, ModerationAction::Ban).await
}

/// Suspends a user.
#[tracing::instrument(skip_all, fields(user_id = %path_params.user_id))]
async fn suspend_user(
    State(pg_client): State<PgClient>,
    auth_state: AuthState,
    Path(path_params): Path<UserPathParams>,
    ValidateJson(request): ValidateJson<ModerateUser>,
) -> Result<(StatusCode, Json<ModerationResult>)> {
    moderate(pg_client, auth_state, path_params, request, ModerationAction::Suspend).await
}

/// Lifts a ban or suspension.
#[tracing::instrument(skip_all, fields(user_id = %path_params.user_id))]
async fn reinstate_user(
    State(pg_client): State<PgClient>,
    auth_state: AuthState,
    Path(path_params): Path<UserPathParams>,
    ValidateJson(request): ValidateJson<ModerateUser>,
) -> Result<(StatusCode, Json<ModerationResult>)> {
    moderate(pg_client, auth_state, path_params, request, ModerationAction::Reinstate).await
}

/// Lists moderation log entries, newest first.
#[tracing::instrument(skip_all)]
async fn list_moderation_logs(
    State(pg_client): State<PgClient>,
    Query(filter): Query<ModerationLogFilter>,
    Query(pagination): Query<Pagination>,
) -> Result<(StatusCode, Json<ModerationLogs>)> {
    let mut conn = pg_client.get_connection().await?;
    let logs = conn
        .list_moderation_logs(filter.target_user_id, pagination.into())
        .await?;
    Ok((StatusCode::OK, Json(ModerationLog::from_models(logs))))
}

/// Returns a [`PolicyRouter`] with all related routes.
pub fn routes() -> PolicyRouter<ServiceState> {
    PolicyRouter::new()
        .post(
            "/users/{user_id}/ban",
            ban_user,
            RoutePolicy::require([Permission::UserBan]),
        )
        .post(
            "/users/{user_id}/suspend",
            suspend_user,
            RoutePolicy::require([Permission::UserSuspend]),
        )
        .post(
            "/users/{user_id}/reinstate",
            reinstate_user,
            RoutePolicy::require([Permission::UserBan, Permission::UserSuspend]),
        )
        .get(
            "/moderation/logs",
            list_moderation_logs,
            RoutePolicy::require([Permission::ModerationLogRead]),
        )
}
