//! JWT bearer token extraction and generation.
//!
//! [`AuthHeader`] only checks the token itself: signature, issuer, audience
//! and expiry. Use [`AuthState`] when the current account state matters,
//! which is almost always.
//!
//! [`AuthState`]: crate::extract::AuthState

use std::time::Duration;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::{IntoResponse, IntoResponseParts, Response, ResponseParts};
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::TypedHeaderRejectionReason;
use hustings_postgres::types::UserRole;
use jiff::Timestamp;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::handler::{Error, ErrorKind, Result};
use crate::service::SessionKeys;
use crate::utility::tracing_targets::TRACING_TARGET_AUTHENTICATION;

type BearerHeader = TypedHeader<Authorization<Bearer>>;

/// Verified JWT claims paired with the keys that verified them.
///
/// Works as an extractor (reads `Authorization: Bearer`) and as a response
/// part (writes a freshly signed `Authorization` header).
#[must_use]
#[derive(Debug, Clone)]
pub struct AuthHeader {
    auth_claims: AuthClaims,
    session_keys: SessionKeys,
}

impl AuthHeader {
    /// Creates a new authentication header with the given claims and keys.
    #[inline]
    pub const fn new(claims: AuthClaims, keys: SessionKeys) -> Self {
        Self {
            auth_claims: claims,
            session_keys: keys,
        }
    }

    /// Returns a reference to the JWT claims.
    #[inline]
    pub const fn as_auth_claims(&self) -> &AuthClaims {
        &self.auth_claims
    }

    /// Consumes this header and returns the JWT claims.
    #[inline]
    pub fn into_auth_claims(self) -> AuthClaims {
        self.auth_claims
    }

    /// Signs the claims and returns both the header and the raw token.
    pub fn issue(self) -> Result<(BearerHeader, String)> {
        let token = self.auth_claims.sign(self.session_keys.encoding_key())?;
        let bearer = Authorization::bearer(&token).map_err(|_| {
            tracing::error!(
                target: TRACING_TARGET_AUTHENTICATION,
                subject_id = %self.auth_claims.subject_id,
                "signed token is not a valid bearer credential"
            );
            ErrorKind::InternalServerError.with_message("Authentication header creation failed")
        })?;

        Ok((TypedHeader(bearer), token))
    }

    fn into_header(self) -> Result<BearerHeader> {
        self.issue().map(|(header, _)| header)
    }
}

impl<S> FromRequestParts<S> for AuthHeader
where
    S: Sync + Send,
    SessionKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth_header) = parts.extensions.get::<Self>() {
            return Ok(auth_header.clone());
        }

        let session_keys = SessionKeys::from_ref(state);
        let bearer = BearerHeader::from_request_parts(parts, state)
            .await
            .map_err(|rejection| match rejection.reason() {
                TypedHeaderRejectionReason::Missing => ErrorKind::MissingAuthToken
                    .with_message("Authentication required")
                    .with_context("Missing Authorization header with Bearer token")
                    .with_resource("authentication"),
                _ => ErrorKind::MalformedAuthToken
                    .with_message("Invalid token format")
                    .with_context("Authorization header must contain a valid Bearer token")
                    .with_resource("authentication"),
            })?;

        let auth_claims = AuthClaims::verify(bearer.token(), session_keys.decoding_key())?;
        let auth_header = Self::new(auth_claims, session_keys);
        parts.extensions.insert(auth_header.clone());
        Ok(auth_header)
    }
}

impl IntoResponseParts for AuthHeader {
    type Error = Error<'static>;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        let header = self.into_header()?;
        match header.into_response_parts(res) {
            Ok(parts) => Ok(parts),
            Err(never) => match never {},
        }
    }
}

impl IntoResponse for AuthHeader {
    fn into_response(self) -> Response {
        match self.into_header() {
            Ok(header) => header.into_response(),
            Err(error) => error.into_response(),
        }
    }
}

/// Claims carried by a session token.
///
/// `role` and `email` describe the account at issue time and are informative
/// only: every request re-reads the account before authorizing.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AuthClaims {
    #[serde(rename = "iss")]
    issued_by: String,
    #[serde(rename = "aud")]
    audience: String,

    /// Unique token identifier.
    #[serde(rename = "jti")]
    pub token_id: Uuid,
    /// The account this token represents.
    #[serde(rename = "sub")]
    pub subject_id: Uuid,

    /// Account email at issue time.
    pub email: String,
    /// Account role at issue time.
    pub role: UserRole,

    /// Issued at.
    #[serde(rename = "iat", with = "jiff::fmt::serde::timestamp::second::required")]
    pub issued_at: Timestamp,
    /// Expires at.
    #[serde(rename = "exp", with = "jiff::fmt::serde::timestamp::second::required")]
    pub expires_at: Timestamp,
}

impl AuthClaims {
    /// Audience every token is issued for.
    pub const JWT_AUDIENCE: &str = "hustings:api";
    /// Issuer of every token.
    pub const JWT_ISSUER: &str = "hustings";

    /// Creates claims for an account, valid for `ttl` from now.
    ///
    /// Timestamps are whole seconds, matching their encoding in the token.
    pub fn new(
        subject_id: Uuid,
        email: impl Into<String>,
        role: UserRole,
        ttl: Duration,
    ) -> Result<Self> {
        let generation_failed = |e: jiff::Error| {
            tracing::error!(target: TRACING_TARGET_AUTHENTICATION, error = %e, "session ttl overflow");
            ErrorKind::InternalServerError.with_message("Authentication token generation failed")
        };

        let issued_at = Timestamp::from_second(Timestamp::now().as_second())
            .map_err(generation_failed)?;
        let expires_at = issued_at.checked_add(ttl).map_err(generation_failed)?;

        Ok(Self {
            issued_by: Self::JWT_ISSUER.to_owned(),
            audience: Self::JWT_AUDIENCE.to_owned(),
            token_id: Uuid::now_v7(),
            subject_id,
            email: email.into(),
            role,
            issued_at,
            expires_at,
        })
    }

    /// Returns whether the token has expired.
    #[inline]
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Timestamp::now()
    }

    /// Verifies a raw token and returns its claims.
    pub fn verify(token: &str, decoding_key: &DecodingKey) -> Result<Self> {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.set_audience(&[Self::JWT_AUDIENCE]);
        validation.set_issuer(&[Self::JWT_ISSUER]);
        validation.set_required_spec_claims(&["iss", "aud", "sub", "exp"]);

        let claims = decode::<Self>(token, decoding_key, &validation)
            .map_err(|error| {
                tracing::debug!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    error = %error,
                    "token rejected"
                );
                Error::from(error)
            })?
            .claims;

        // The library allows a small leeway on `exp`; sessions do not.
        if claims.is_expired() {
            tracing::debug!(
                target: TRACING_TARGET_AUTHENTICATION,
                token_id = %claims.token_id,
                subject_id = %claims.subject_id,
                "token expired"
            );
            return Err(ErrorKind::Unauthorized
                .with_message("Authentication session has expired")
                .with_context("Please sign in again to continue"));
        }

        Ok(claims)
    }

    /// Signs the claims into a compact JWT.
    pub fn sign(&self, encoding_key: &EncodingKey) -> Result<String> {
        encode(&Header::new(Algorithm::EdDSA), self, encoding_key).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_AUTHENTICATION,
                error = %e,
                subject_id = %self.subject_id,
                "failed to encode token"
            );
            ErrorKind::InternalServerError.with_message("Authentication token generation failed")
        })
    }
}

impl From<JwtError> for Error<'static> {
    fn from(error: JwtError) -> Self {
        let error = match error.kind() {
            JwtErrorKind::ExpiredSignature => ErrorKind::Unauthorized
                .with_message("Authentication session has expired")
                .with_context("Please sign in again to continue"),
            JwtErrorKind::InvalidSignature => ErrorKind::Unauthorized
                .with_message("Authentication token verification failed"),
            JwtErrorKind::InvalidAudience => ErrorKind::Unauthorized
                .with_message("Authentication token is not valid for this service"),
            JwtErrorKind::InvalidIssuer => ErrorKind::Unauthorized
                .with_message("Authentication token is from an untrusted source"),
            JwtErrorKind::InvalidToken
            | JwtErrorKind::InvalidAlgorithm
            | JwtErrorKind::Base64(_)
            | JwtErrorKind::Json(_)
            | JwtErrorKind::Utf8(_)
            | JwtErrorKind::InvalidKeyFormat => ErrorKind::MalformedAuthToken
                .with_message("Authentication token is invalid"),
            JwtErrorKind::MissingRequiredClaim(claim) => ErrorKind::MalformedAuthToken
                .with_message("Authentication token is incomplete")
                .with_context(format!("Token is missing required claim: {claim}")),
            _ => ErrorKind::InternalServerError
                .with_message("Authentication processing failed"),
        };

        error.with_resource("authentication")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::security::test_session_keys;

    fn claims(role: UserRole) -> AuthClaims {
        AuthClaims::new(
            Uuid::now_v7(),
            "ada@example.org",
            role,
            Duration::from_secs(3600),
        )
        .expect("claims")
    }

    #[test]
    fn sign_and_verify_round_trip() -> anyhow::Result<()> {
        let keys = test_session_keys();
        let claims = claims(UserRole::Moderator);

        let token = claims.sign(keys.encoding_key())?;
        let verified = AuthClaims::verify(&token, keys.decoding_key())?;

        assert_eq!(verified, claims);
        assert_eq!(verified.expires_at.as_second(), claims.issued_at.as_second() + 3600);
        Ok(())
    }

    #[test]
    fn claims_carry_whole_seconds() {
        let claims = claims(UserRole::Member);
        assert_eq!(claims.issued_at.subsec_nanosecond(), 0);
        assert_eq!(claims.expires_at.subsec_nanosecond(), 0);
    }

    #[test]
    fn wrong_audience_is_rejected() -> anyhow::Result<()> {
        let keys = test_session_keys();
        let mut claims = claims(UserRole::Member);
        claims.audience = "someone:else".to_owned();

        let token = claims.sign(keys.encoding_key())?;
        let error = AuthClaims::verify(&token, keys.decoding_key()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unauthorized);
        Ok(())
    }

    #[test]
    fn expired_token_is_rejected() -> anyhow::Result<()> {
        let keys = test_session_keys();
        let mut claims = claims(UserRole::Member);
        claims.issued_at = Timestamp::from_second(Timestamp::now().as_second() - 7200)?;
        claims.expires_at = Timestamp::from_second(Timestamp::now().as_second() - 3600)?;

        let token = claims.sign(keys.encoding_key())?;
        let error = AuthClaims::verify(&token, keys.decoding_key()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unauthorized);
        Ok(())
    }

    #[test]
    fn garbage_is_malformed() {
        let keys = test_session_keys();
        let error = AuthClaims::verify("not.a.jwt", keys.decoding_key()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MalformedAuthToken);
    }

    #[test]
    fn issue_produces_matching_header() -> anyhow::Result<()> {
        let keys = test_session_keys();
        let (header, token) = AuthHeader::new(claims(UserRole::Admin), keys).issue()?;
        assert_eq!(header.token(), token);
        Ok(())
    }
}
