//! User administration: listing accounts and assigning roles.

use axum::extract::State;
use axum::http::StatusCode;
use hustings_postgres::model::User as UserModel;
use hustings_postgres::query::UserRepository;
use hustings_postgres::types::UserRole;
use hustings_postgres::{PgClient, PgConn};

use super::request::{Pagination, UpdateUserRole, UserFilter, UserPathParams};
use super::response::{User, Users};
use crate::extract::{AuthState, Json, Path, Permission, Query, ValidateJson};
use crate::handler::{ErrorKind, Result};
use crate::middleware::{PolicyRouter, RoutePolicy};
use crate::service::ServiceState;

/// Tracing target for user administration.
const TRACING_TARGET: &str = "hustings_server::handler::users";

/// Loads the user named in the path, or answers 404.
pub(super) async fn find_user(conn: &mut PgConn, params: &UserPathParams) -> Result<UserModel> {
    conn.find_user_by_id(params.user_id).await?.ok_or_else(|| {
        ErrorKind::NotFound
            .with_message(format!("User not found: {}", params.user_id))
            .with_resource("user")
    })
}

/// Rules shared by every action staff take against an account.
///
/// Nobody acts on their own account, and only a super admin acts on or
/// hands out the `admin` and `super_admin` roles.
pub(super) fn check_target(
    auth_state: &AuthState,
    target: &UserModel,
    granted_role: Option<UserRole>,
) -> Result<()> {
    if target.id == auth_state.subject_id {
        return Err(ErrorKind::BadRequest
            .with_message("You cannot perform this action on your own account")
            .with_resource("user"));
    }

    let touches_privileged =
        target.role.is_privileged() || granted_role.is_some_and(UserRole::is_privileged);

    if touches_privileged && auth_state.role != UserRole::SuperAdmin {
        tracing::warn!(
            target: TRACING_TARGET,
            subject_id = %auth_state.subject_id,
            target_user_id = %target.id,
            target_role = %target.role,
            "privileged account change refused"
        );
        return Err(ErrorKind::Forbidden
            .with_message("Only a super admin may manage admin accounts")
            .with_resource("user"));
    }

    Ok(())
}

/// Lists users, optionally filtered by role and status.
#[tracing::instrument(skip_all)]
async fn list_users(
    State(pg_client): State<PgClient>,
    Query(filter): Query<UserFilter>,
    Query(pagination): Query<Pagination>,
) -> Result<(StatusCode, Json<Users>)> {
    let mut conn = pg_client.get_connection().await?;
    let users = conn
        .list_users(filter.role, filter.status, pagination.into())
        .await?;
    Ok((StatusCode::OK, Json(User::from_models(users))))
}

/// Returns a user by id.
#[tracing::instrument(skip_all, fields(user_id = %path_params.user_id))]
async fn get_user(
    State(pg_client): State<PgClient>,
    Path(path_params): Path<UserPathParams>,
) -> Result<(StatusCode, Json<User>)> {
    let mut conn = pg_client.get_connection().await?;
    let user = find_user(&mut conn, &path_params).await?;
    Ok((StatusCode::OK, Json(User::from_model(user))))
}

/// Assigns a new role. Takes effect on the user's next request.
#[tracing::instrument(skip_all, fields(user_id = %path_params.user_id))]
async fn update_user_role(
    State(pg_client): State<PgClient>,
    auth_state: AuthState,
    Path(path_params): Path<UserPathParams>,
    ValidateJson(request): ValidateJson<UpdateUserRole>,
) -> Result<(StatusCode, Json<User>)> {
    let mut conn = pg_client.get_connection().await?;
    let target = find_user(&mut conn, &path_params).await?;
    check_target(&auth_state, &target, Some(request.role))?;

    let previous_role = target.role;
    let user = conn.set_user_role(target.id, request.role).await?;

    tracing::info!(
        target: TRACING_TARGET,
        subject_id = %auth_state.subject_id,
        user_id = %user.id,
        previous_role = %previous_role,
        role = %user.role,
        "role assigned"
    );

    Ok((StatusCode::OK, Json(User::from_model(user))))
}

/// Returns a [`PolicyRouter`] with all related routes.
pub fn routes() -> PolicyRouter<ServiceState> {
    PolicyRouter::new()
        .scope("/users", RoutePolicy::require([Permission::UserRead]))
        .get("/users", list_users, RoutePolicy::authenticated())
        .get("/users/{user_id}", get_user, RoutePolicy::authenticated())
        .patch(
            "/users/{user_id}/role",
            update_user_role,
            RoutePolicy::require([Permission::UserRoleAssign]),
        )
}
