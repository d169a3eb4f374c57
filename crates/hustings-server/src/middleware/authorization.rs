//! Enforces the [`RoutePolicy`] declared for every matched route.

use std::sync::Arc;

use axum::Router;
use axum::extract::{FromRef, MatchedPath, OptionalFromRequestParts, Request, State};
use axum::middleware::{Next, from_fn_with_state};
use axum::response::{IntoResponse, Response};

use super::{RoutePolicy, RouteRegistry};
use crate::extract::{AuthDecision, AuthState, IdentityResolver, RolePermissions, authorize};
use crate::handler::{Error, ErrorKind};
use crate::service::{FeatureFlags, ServiceState, SessionKeys};
use crate::utility::tracing_targets::TRACING_TARGET_AUTHORIZATION;

/// Everything the authorization layer needs, independent of [`ServiceState`].
#[derive(Debug, Clone)]
pub struct AuthorizationState {
    registry: Arc<RouteRegistry>,
    feature_flags: FeatureFlags,
    identity_resolver: IdentityResolver,
    session_keys: SessionKeys,
}

impl AuthorizationState {
    /// Creates the layer state from explicit parts.
    pub fn new(
        registry: Arc<RouteRegistry>,
        feature_flags: FeatureFlags,
        identity_resolver: IdentityResolver,
        session_keys: SessionKeys,
    ) -> Self {
        Self {
            registry,
            feature_flags,
            identity_resolver,
            session_keys,
        }
    }

    /// Creates the layer state from the application state.
    pub fn from_service_state(registry: Arc<RouteRegistry>, state: &ServiceState) -> Self {
        Self::new(
            registry,
            FeatureFlags::from_ref(state),
            IdentityResolver::from_ref(state),
            SessionKeys::from_ref(state),
        )
    }

    /// Returns whether the method has a declaration on the route.
    #[inline]
    pub fn declares(&self, method: &axum::http::Method, path: &str) -> bool {
        self.registry.declares(method, path)
    }

    /// Returns the policy for a matched route.
    #[inline]
    pub fn resolve(&self, method: &axum::http::Method, path: &str) -> RoutePolicy {
        self.registry.resolve(method, path)
    }
}

impl FromRef<AuthorizationState> for IdentityResolver {
    fn from_ref(state: &AuthorizationState) -> Self {
        state.identity_resolver.clone()
    }
}

impl FromRef<AuthorizationState> for SessionKeys {
    fn from_ref(state: &AuthorizationState) -> Self {
        state.session_keys.clone()
    }
}

/// Extension trait for `axum::`[`Router`] to enforce route policies.
pub trait RouterAuthorizationExt<S> {
    /// Checks every matched route against its declared policy.
    ///
    /// Applied as a route layer, so unmatched paths still reach the fallback.
    fn with_authorization(self, state: AuthorizationState) -> Self;
}

impl<S> RouterAuthorizationExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_authorization(self, state: AuthorizationState) -> Self {
        self.route_layer(from_fn_with_state(state, enforce_route_policy))
    }
}

/// Middleware gating a matched route on its policy.
///
/// Methods without a declaration on a matched route pass straight to the
/// router, which answers 405. A disabled feature answers 404 before anything
/// else. Non-public routes
/// then resolve the caller's current identity from the bearer token and
/// consult [`authorize`]. The resolved [`AuthState`] stays in the request
/// extensions for the handler.
pub async fn enforce_route_policy(
    State(state): State<AuthorizationState>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let (path, matched) = match parts.extensions.get::<MatchedPath>() {
        Some(matched) => (matched.as_str().to_owned(), true),
        None => (parts.uri.path().to_owned(), false),
    };

    if matched && !state.declares(&parts.method, &path) {
        tracing::debug!(
            target: TRACING_TARGET_AUTHORIZATION,
            method = %parts.method,
            path = %path,
            "method not declared on route"
        );
        return next.run(Request::from_parts(parts, body)).await;
    }

    let policy = state.resolve(&parts.method, &path);

    if let Some(feature) = policy.feature
        && !state.feature_flags.is_enabled(feature)
    {
        tracing::debug!(
            target: TRACING_TARGET_AUTHORIZATION,
            method = %parts.method,
            path = %path,
            feature = %feature,
            "route hidden by disabled feature"
        );
        return ErrorKind::NotFound.into_response();
    }

    if policy.public {
        return next.run(Request::from_parts(parts, body)).await;
    }

    let auth_state =
        match <AuthState as OptionalFromRequestParts<_>>::from_request_parts(&mut parts, &state)
            .await
        {
            Ok(auth_state) => auth_state,
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET_AUTHORIZATION,
                    method = %parts.method,
                    path = %path,
                    error = %error,
                    "request authentication failed"
                );
                return error.into_response();
            }
        };

    let role = auth_state.as_ref().map(|auth_state| auth_state.role);
    match authorize(RolePermissions::global(), &policy, role) {
        AuthDecision::Allow => {
            tracing::debug!(
                target: TRACING_TARGET_AUTHORIZATION,
                method = %parts.method,
                path = %path,
                role = ?role,
                "request authorized"
            );
            next.run(Request::from_parts(parts, body)).await
        }
        AuthDecision::Deny(denial) => {
            tracing::warn!(
                target: TRACING_TARGET_AUTHORIZATION,
                method = %parts.method,
                path = %path,
                role = ?role,
                subject_id = ?auth_state.as_ref().map(|auth_state| auth_state.subject_id),
                reason = %denial,
                "request denied"
            );
            Error::from(denial).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::Extension;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use hustings_postgres::types::{UserRole, UserStatus};
    use serde_json::Value;

    use super::*;
    use crate::extract::auth::identity::tests::MemoryIdentityStore;
    use crate::extract::{AuthClaims, Identity, Permission};
    use crate::middleware::PolicyRouter;
    use crate::service::FeatureFlag;
    use crate::service::security::test_session_keys;

    async fn ok() -> &'static str {
        "ok"
    }

    async fn whoami(Extension(auth_state): Extension<AuthState>) -> String {
        auth_state.role.to_string()
    }

    struct Harness {
        server: TestServer,
        store: MemoryIdentityStore,
        keys: SessionKeys,
    }

    impl Harness {
        fn new(feature_flags: FeatureFlags) -> anyhow::Result<Self> {
            let (router, registry) = PolicyRouter::<()>::new()
                .get("/open", ok, RoutePolicy::public())
                .get("/me", whoami, RoutePolicy::authenticated())
                .post("/articles", ok, RoutePolicy::require([Permission::BlogCreate]))
                .post(
                    "/drafts",
                    ok,
                    RoutePolicy::require([Permission::BlogCreate, Permission::EventCreate]),
                )
                .post("/users/{user_id}/ban", ok, RoutePolicy::require([Permission::UserBan]))
                .get(
                    "/events",
                    ok,
                    RoutePolicy::public().with_feature(FeatureFlag::Events),
                )
                .into_parts();

            let store = MemoryIdentityStore::default();
            let keys = test_session_keys();
            let state = AuthorizationState::new(
                registry,
                feature_flags,
                IdentityResolver::new(store.clone()),
                keys.clone(),
            );

            let server = TestServer::new(router.with_authorization(state))?;
            Ok(Self {
                server,
                store,
                keys,
            })
        }

        fn token_for(&self, identity: &Identity) -> anyhow::Result<String> {
            let claims = AuthClaims::new(
                identity.subject_id,
                identity.email.clone(),
                identity.role,
                Duration::from_secs(300),
            )?;
            Ok(claims.sign(self.keys.encoding_key())?)
        }
    }

    #[tokio::test]
    async fn public_route_needs_no_token() -> anyhow::Result<()> {
        let harness = Harness::new(FeatureFlags::all())?;
        harness.server.get("/open").await.assert_status_ok();
        Ok(())
    }

    #[tokio::test]
    async fn missing_token_is_401() -> anyhow::Result<()> {
        let harness = Harness::new(FeatureFlags::all())?;

        let response = harness.server.post("/articles").await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let response = harness.server.get("/me").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn banned_user_is_401() -> anyhow::Result<()> {
        let harness = Harness::new(FeatureFlags::all())?;
        let banned = harness.store.insert(UserRole::SuperAdmin, UserStatus::Banned);

        let response = harness
            .server
            .get("/me")
            .authorization_bearer(harness.token_for(&banned)?)
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn insufficient_permissions_is_403_with_alternatives() -> anyhow::Result<()> {
        let harness = Harness::new(FeatureFlags::all())?;
        let member = harness.store.insert(UserRole::VerifiedMember, UserStatus::Active);

        let response = harness
            .server
            .post("/drafts")
            .authorization_bearer(harness.token_for(&member)?)
            .await;
        response.assert_status(StatusCode::FORBIDDEN);

        let body: Value = response.json();
        assert_eq!(body["message"], "requires one of: blog:create or event:create");
        Ok(())
    }

    #[tokio::test]
    async fn permitted_role_passes() -> anyhow::Result<()> {
        let harness = Harness::new(FeatureFlags::all())?;
        let moderator = harness.store.insert(UserRole::Moderator, UserStatus::Active);
        let event_admin = harness.store.insert(UserRole::EventAdmin, UserStatus::Active);

        harness
            .server
            .post("/users/0195c7b2-0000-7000-8000-000000000000/ban")
            .authorization_bearer(harness.token_for(&moderator)?)
            .await
            .assert_status_ok();

        harness
            .server
            .post("/drafts")
            .authorization_bearer(harness.token_for(&event_admin)?)
            .await
            .assert_status_ok();
        Ok(())
    }

    #[tokio::test]
    async fn disabled_feature_is_404_even_anonymously() -> anyhow::Result<()> {
        let harness = Harness::new(FeatureFlags::new([FeatureFlag::Registration]))?;
        harness.server.get("/events").await.assert_status_not_found();

        let enabled = Harness::new(FeatureFlags::all())?;
        enabled.server.get("/events").await.assert_status_ok();
        Ok(())
    }

    #[tokio::test]
    async fn role_change_applies_to_next_request() -> anyhow::Result<()> {
        let harness = Harness::new(FeatureFlags::all())?;
        let member = harness.store.insert(UserRole::Member, UserStatus::Active);
        let token = harness.token_for(&member)?;

        harness
            .server
            .post("/articles")
            .authorization_bearer(token.clone())
            .await
            .assert_status(StatusCode::FORBIDDEN);

        harness.store.set_role(member.subject_id, UserRole::BlogAdmin);

        harness
            .server
            .post("/articles")
            .authorization_bearer(token.clone())
            .await
            .assert_status_ok();

        let response = harness.server.get("/me").authorization_bearer(token).await;
        assert_eq!(response.text(), "blog_admin");
        Ok(())
    }

    #[tokio::test]
    async fn malformed_token_is_401() -> anyhow::Result<()> {
        let harness = Harness::new(FeatureFlags::all())?;
        let response = harness
            .server
            .get("/me")
            .authorization_bearer("definitely-not-a-jwt")
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn undeclared_method_is_405_without_identity_lookup() -> anyhow::Result<()> {
        let harness = Harness::new(FeatureFlags::all())?;
        harness
            .server
            .put("/articles")
            .await
            .assert_status(StatusCode::METHOD_NOT_ALLOWED);

        harness
            .server
            .put("/articles")
            .authorization_bearer("definitely-not-a-jwt")
            .await
            .assert_status(StatusCode::METHOD_NOT_ALLOWED);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_path_reaches_fallback() -> anyhow::Result<()> {
        let harness = Harness::new(FeatureFlags::all())?;
        harness.server.get("/nowhere").await.assert_status_not_found();
        Ok(())
    }
}
