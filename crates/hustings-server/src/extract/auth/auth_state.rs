//! Authenticated request state: verified token plus current account.

use axum::extract::{FromRef, FromRequestParts, OptionalFromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use derive_more::Deref;

use super::{AuthClaims, AuthHeader, Identity, IdentityResolver};
use crate::handler::{Error, Result};
use crate::service::SessionKeys;
use crate::utility::tracing_targets::TRACING_TARGET_AUTHENTICATION;

/// The verified token and the account it currently belongs to.
///
/// Extracting it verifies the bearer token and re-reads the account, so role
/// changes and bans take effect on the very next request. The result is
/// cached in request extensions; the authorization middleware usually does
/// the work and handlers get the cached copy.
///
/// Use `Option<AuthState>` for routes that behave differently for signed-in
/// callers. A missing header yields `None`, a bad one still fails.
#[derive(Debug, Clone, Deref, PartialEq, Eq)]
pub struct AuthState {
    claims: AuthClaims,
    #[deref]
    identity: Identity,
}

impl AuthState {
    /// Pairs verified claims with a freshly resolved identity.
    pub const fn new(claims: AuthClaims, identity: Identity) -> Self {
        Self { claims, identity }
    }

    /// Returns the verified token claims.
    #[inline]
    pub const fn claims(&self) -> &AuthClaims {
        &self.claims
    }

    /// Returns the current account identity.
    #[inline]
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Verifies the token from `parts` and resolves its account.
    async fn resolve<S>(parts: &mut Parts, state: &S) -> Result<Self>
    where
        S: Sync + Send,
        SessionKeys: FromRef<S>,
        IdentityResolver: FromRef<S>,
    {
        if let Some(auth_state) = parts.extensions.get::<Self>() {
            return Ok(auth_state.clone());
        }

        let auth_header = AuthHeader::from_request_parts(parts, state).await?;
        let claims = auth_header.into_auth_claims();
        let identity = IdentityResolver::from_ref(state).resolve(&claims).await?;

        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            subject_id = %identity.subject_id,
            role = %identity.role,
            token_id = %claims.token_id,
            "request authenticated"
        );

        let auth_state = Self::new(claims, identity);
        parts.extensions.insert(auth_state.clone());
        Ok(auth_state)
    }
}

impl<S> FromRequestParts<S> for AuthState
where
    S: Sync + Send,
    SessionKeys: FromRef<S>,
    IdentityResolver: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Self::resolve(parts, state).await
    }
}

impl<S> OptionalFromRequestParts<S> for AuthState
where
    S: Sync + Send,
    SessionKeys: FromRef<S>,
    IdentityResolver: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        if let Some(auth_state) = parts.extensions.get::<Self>() {
            return Ok(Some(auth_state.clone()));
        }

        if !parts.headers.contains_key(AUTHORIZATION) {
            return Ok(None);
        }

        Self::resolve(parts, state).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::Request;
    use hustings_postgres::types::{UserRole, UserStatus};

    use super::*;
    use crate::extract::auth::identity::tests::MemoryIdentityStore;
    use crate::handler::ErrorKind;
    use crate::service::security::test_session_keys;

    #[derive(Clone)]
    struct TestState {
        keys: SessionKeys,
        resolver: IdentityResolver,
    }

    impl FromRef<TestState> for SessionKeys {
        fn from_ref(state: &TestState) -> Self {
            state.keys.clone()
        }
    }

    impl FromRef<TestState> for IdentityResolver {
        fn from_ref(state: &TestState) -> Self {
            state.resolver.clone()
        }
    }

    fn parts_with(authorization: Option<String>) -> Parts {
        let mut builder = Request::builder().uri("/auth/me");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).expect("request").into_parts().0
    }

    fn state_with(store: &MemoryIdentityStore) -> TestState {
        TestState {
            keys: test_session_keys(),
            resolver: IdentityResolver::new(store.clone()),
        }
    }

    fn bearer_for(state: &TestState, identity: &Identity) -> anyhow::Result<String> {
        let claims = AuthClaims::new(
            identity.subject_id,
            identity.email.clone(),
            identity.role,
            Duration::from_secs(300),
        )?;
        Ok(format!("Bearer {}", claims.sign(state.keys.encoding_key())?))
    }

    #[tokio::test]
    async fn extracts_and_caches() -> anyhow::Result<()> {
        let store = MemoryIdentityStore::default();
        let identity = store.insert(UserRole::EventAdmin, UserStatus::Active);
        let state = state_with(&store);

        let mut parts = parts_with(Some(bearer_for(&state, &identity)?));
        let auth_state =
            <AuthState as FromRequestParts<TestState>>::from_request_parts(&mut parts, &state)
                .await?;

        assert_eq!(auth_state.role, UserRole::EventAdmin);
        assert!(parts.extensions.get::<AuthState>().is_some());
        Ok(())
    }

    #[tokio::test]
    async fn optional_without_header_is_none() -> anyhow::Result<()> {
        let store = MemoryIdentityStore::default();
        let state = state_with(&store);

        let mut parts = parts_with(None);
        let auth_state =
            <AuthState as OptionalFromRequestParts<TestState>>::from_request_parts(
                &mut parts, &state,
            )
            .await?;
        assert!(auth_state.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn optional_with_bad_header_fails() {
        let store = MemoryIdentityStore::default();
        let state = state_with(&store);

        let mut parts = parts_with(Some("Bearer nonsense".to_owned()));
        let error = <AuthState as OptionalFromRequestParts<TestState>>::from_request_parts(
            &mut parts, &state,
        )
        .await
        .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MalformedAuthToken);
    }

    #[tokio::test]
    async fn required_without_header_is_missing_token() {
        let store = MemoryIdentityStore::default();
        let state = state_with(&store);

        let mut parts = parts_with(None);
        let error = <AuthState as FromRequestParts<TestState>>::from_request_parts(
            &mut parts, &state,
        )
        .await
        .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MissingAuthToken);
    }
}
