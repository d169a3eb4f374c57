//! Registration, login, email verification and the current session.
//!
//! Every successful call answers with a fresh bearer token, both in the
//! `Authorization` header and in the body.

use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use hustings_postgres::PgClient;
use hustings_postgres::model::{NewUser, User as UserModel};
use hustings_postgres::query::UserRepository;
use hustings_postgres::types::{UserRole, UserStatus};

use super::request::{Login, Register, VerifyEmail};
use super::response::{AuthSession, User};
use crate::extract::{AuthClaims, AuthHeader, AuthState, Json, ValidateJson};
use crate::handler::{ErrorKind, Result};
use crate::middleware::{PolicyRouter, RoutePolicy};
use crate::service::{
    FeatureFlag, PasswordHasher, ServiceState, SessionKeys, VerificationNotifier,
    VerificationToken,
};

/// Tracing target for authentication operations.
const TRACING_TARGET: &str = "hustings_server::handler::authentication";

type BearerHeader = TypedHeader<Authorization<Bearer>>;

/// Signs a session token for `user`.
fn issue_session(session_keys: SessionKeys, user: &UserModel) -> Result<(BearerHeader, AuthSession)> {
    let claims = AuthClaims::new(user.id, &user.email, user.role, session_keys.session_ttl())?;
    let auth_header = AuthHeader::new(claims, session_keys);
    let session_claims = auth_header.as_auth_claims().clone();
    let (header, token) = auth_header.issue()?;
    Ok((header, AuthSession::new(&session_claims, token)))
}

/// Creates a pending member account and starts email verification.
#[tracing::instrument(skip_all)]
async fn register(
    State(pg_client): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    State(session_keys): State<SessionKeys>,
    State(notifier): State<VerificationNotifier>,
    ValidateJson(request): ValidateJson<Register>,
) -> Result<(StatusCode, BearerHeader, Json<AuthSession>)> {
    let email = request.normalized_email();
    let mut conn = pg_client.get_connection().await?;

    if conn.email_exists(&email).await? {
        tracing::warn!(target: TRACING_TARGET, "registration with an existing email");
        return Err(ErrorKind::Conflict
            .with_message("An account with this email address already exists")
            .with_resource("user"));
    }

    let password_hash = password_hasher.hash_password(&request.password)?;
    let verification = VerificationToken::generate()?;

    let new_user = NewUser {
        email,
        display_name: request.display_name.trim().to_owned(),
        password_hash,
        role: UserRole::Member,
        status: UserStatus::Pending,
        verification_token_hash: Some(verification.token_hash().to_owned()),
        verification_expires_at: Some(verification.expires_at().into()),
    };
    let user = conn.create_user(new_user).await?;

    notifier.send_verification(user.id, &user.email, &verification);

    tracing::info!(
        target: TRACING_TARGET,
        user_id = %user.id,
        "account registered"
    );

    let (header, session) = issue_session(session_keys, &user)?;
    Ok((StatusCode::CREATED, header, Json(session)))
}

/// Exchanges credentials for a session token.
#[tracing::instrument(skip_all)]
async fn login(
    State(pg_client): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    State(session_keys): State<SessionKeys>,
    ValidateJson(request): ValidateJson<Login>,
) -> Result<(StatusCode, BearerHeader, Json<AuthSession>)> {
    let email = request.normalized_email();
    let mut conn = pg_client.get_connection().await?;
    let user = conn.find_user_by_email(&email).await?;

    // Unknown accounts still pay for one hash so timing does not reveal them.
    let password_valid = match &user {
        Some(user) => password_hasher
            .verify_password(&request.password, &user.password_hash)
            .is_ok(),
        None => password_hasher.verify_dummy_password(&request.password),
    };

    let Some(user) = user.filter(|_| password_valid) else {
        tracing::warn!(target: TRACING_TARGET, "login with invalid credentials");
        return Err(ErrorKind::Unauthorized
            .with_message("Invalid email or password")
            .with_resource("authentication"));
    };

    if !user.can_authenticate() {
        tracing::warn!(
            target: TRACING_TARGET,
            user_id = %user.id,
            status = %user.status,
            "login by an account that may not sign in"
        );
        return Err(ErrorKind::Unauthorized
            .with_message("Account is not allowed to sign in")
            .with_context(format!("account status: {}", user.status))
            .with_resource("authentication"));
    }

    tracing::info!(
        target: TRACING_TARGET,
        user_id = %user.id,
        role = %user.role,
        "login succeeded"
    );

    let (header, session) = issue_session(session_keys, &user)?;
    Ok((StatusCode::OK, header, Json(session)))
}

/// Confirms an email address with the token sent at registration.
///
/// Activates the account and promotes a `member` to `verified_member`.
/// Other roles are kept as they are.
#[tracing::instrument(skip_all)]
async fn verify(
    State(pg_client): State<PgClient>,
    State(session_keys): State<SessionKeys>,
    ValidateJson(request): ValidateJson<VerifyEmail>,
) -> Result<(StatusCode, BearerHeader, Json<AuthSession>)> {
    let token_hash = VerificationToken::hash(&request.token);
    let mut conn = pg_client.get_connection().await?;

    let user = conn
        .find_user_by_verification_token(&token_hash)
        .await?
        .filter(|user| user.status == UserStatus::Pending && !user.is_verification_expired());

    let Some(user) = user else {
        tracing::warn!(target: TRACING_TARGET, "unknown or expired verification token");
        return Err(ErrorKind::BadRequest
            .with_message("Verification token is invalid or has expired")
            .with_resource("verification"));
    };

    let role = match user.role {
        UserRole::Member => UserRole::VerifiedMember,
        role => role,
    };
    let user = conn.confirm_user_email(user.id, role).await?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = %user.id,
        role = %user.role,
        "email address verified"
    );

    let (header, session) = issue_session(session_keys, &user)?;
    Ok((StatusCode::OK, header, Json(session)))
}

/// Returns the account behind the current token.
#[tracing::instrument(skip_all, fields(subject_id = %auth_state.subject_id))]
async fn me(
    State(pg_client): State<PgClient>,
    auth_state: AuthState,
) -> Result<(StatusCode, Json<User>)> {
    let mut conn = pg_client.get_connection().await?;
    let Some(user) = conn.find_user_by_id(auth_state.subject_id).await? else {
        return Err(ErrorKind::NotFound.with_resource("user"));
    };

    Ok((StatusCode::OK, Json(User::from_model(user))))
}

/// Returns a [`PolicyRouter`] with all related routes.
pub fn routes() -> PolicyRouter<ServiceState> {
    PolicyRouter::new()
        .post(
            "/auth/register",
            register,
            RoutePolicy::public().with_feature(FeatureFlag::Registration),
        )
        .post("/auth/login", login, RoutePolicy::public())
        .post("/auth/verify", verify, RoutePolicy::public())
        .get("/auth/me", me, RoutePolicy::authenticated())
}
