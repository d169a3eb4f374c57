//! Errors returned by handlers, extractors and the authorization layer.
//!
//! An [`ErrorKind`] fixes the status code and the stable `name` of the body.
//! The message, resource and context can be overridden per error.

use std::borrow::Cow;
use std::fmt;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use strum::{Display, IntoStaticStr};

use crate::handler::response::ErrorResponse;

/// Result of a handler or extractor.
pub type Result<T, E = Error<'static>> = std::result::Result<T, E>;

/// Category of an HTTP [`Error`].
///
/// Displays as the `name` field of the response body.
#[must_use = "error kinds do nothing unless turned into errors"]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    MissingPathParam,
    BadRequest,
    /// No bearer token on a route that needs one.
    MissingAuthToken,
    /// A bearer token that is not a well-formed session token.
    MalformedAuthToken,
    /// Bad credentials, an expired token or an account that may not sign in.
    Unauthorized,
    /// Signed in, but the role lacks the required permission.
    Forbidden,
    /// Missing resource, hidden draft or disabled feature.
    NotFound,
    Conflict,
    InternalServerError,
    /// Postgres or another dependency is unreachable.
    ServiceUnavailable,
}

impl ErrorKind {
    #[inline]
    pub const fn status_code(self) -> StatusCode {
        match self {
            Self::MissingPathParam | Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::MissingAuthToken | Self::MalformedAuthToken | Self::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Message used when the error carries none of its own.
    const fn default_message(self) -> &'static str {
        match self {
            Self::MissingPathParam => "A required path parameter is missing or malformed",
            Self::BadRequest => "The request data is invalid",
            Self::MissingAuthToken => "Sign in to continue",
            Self::MalformedAuthToken => "The session token is malformed",
            Self::Unauthorized => "The session is invalid or has expired",
            Self::Forbidden => "Your role does not allow this action",
            Self::NotFound => "Nothing was found here",
            Self::Conflict => "The request conflicts with the current state",
            Self::InternalServerError => "Something went wrong on our side",
            Self::ServiceUnavailable => "The service is temporarily unavailable",
        }
    }

    /// Turns the kind into an [`Error`] with default body fields.
    #[inline]
    pub const fn into_error(self) -> Error<'static> {
        Error {
            kind: self,
            message: None,
            resource: None,
            context: None,
        }
    }

    #[inline]
    pub fn with_message<'a>(self, message: impl Into<Cow<'a, str>>) -> Error<'a> {
        self.into_error().with_message(message)
    }

    #[inline]
    pub fn with_resource<'a>(self, resource: impl Into<Cow<'a, str>>) -> Error<'a> {
        self.into_error().with_resource(resource)
    }

    #[inline]
    pub fn with_context<'a>(self, context: impl Into<Cow<'a, str>>) -> Error<'a> {
        self.into_error().with_context(context)
    }
}

impl IntoResponse for ErrorKind {
    #[inline]
    fn into_response(self) -> Response {
        self.into_error().into_response()
    }
}

/// An HTTP error, rendered as an [`ErrorResponse`] body.
#[must_use = "errors do nothing unless returned"]
#[derive(Debug, Clone)]
pub struct Error<'a> {
    kind: ErrorKind,
    message: Option<Cow<'a, str>>,
    resource: Option<Cow<'a, str>>,
    context: Option<Cow<'a, str>>,
}

impl<'a> Error<'a> {
    /// Replaces the kind's default message.
    #[inline]
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Names the resource the error is about, such as `article`.
    #[inline]
    pub fn with_resource(mut self, resource: impl Into<Cow<'a, str>>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Adds detail that helps a client fix the request.
    #[inline]
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the custom message, if one was set.
    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[inline]
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    fn body(self) -> ErrorResponse<'a> {
        ErrorResponse {
            name: self.kind.into(),
            message: self
                .message
                .unwrap_or(Cow::Borrowed(self.kind.default_message())),
            resource: self.resource,
            context: self.context,
        }
    }
}

impl From<ErrorKind> for Error<'static> {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        kind.into_error()
    }
}

impl fmt::Display for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.message().unwrap_or(self.kind.default_message());
        write!(f, "{} ({}): {message}", self.kind, self.kind.status_code().as_u16())?;

        if let Some(context) = &self.context {
            write!(f, "; {context}")?;
        }
        if let Some(resource) = &self.resource {
            write!(f, " [{resource}]")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error<'_> {}

impl IntoResponse for Error<'_> {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();
        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_display_as_body_names() {
        assert_eq!(ErrorKind::MissingAuthToken.to_string(), "missing_auth_token");
        assert_eq!(ErrorKind::InternalServerError.to_string(), "internal_server_error");
    }

    #[test]
    fn builder_keeps_every_part() {
        let error = ErrorKind::NotFound
            .with_message("Article not found")
            .with_resource("article")
            .with_context("slug: town-hall");

        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.message(), Some("Article not found"));
        assert_eq!(error.resource(), Some("article"));

        let body = error.body();
        assert_eq!(body.name, "not_found");
        assert_eq!(body.context.as_deref(), Some("slug: town-hall"));
    }

    #[test]
    fn body_falls_back_to_default_message() {
        let body = ErrorKind::Forbidden.into_error().body();
        assert_eq!(body.message, "Your role does not allow this action");
        assert!(body.resource.is_none());
    }

    #[test]
    fn display_includes_every_part() {
        let error = ErrorKind::Forbidden
            .with_message("requires one of: blog:create")
            .with_resource("authorization")
            .with_context("role: member");

        assert_eq!(
            error.to_string(),
            "forbidden (403): requires one of: blog:create; role: member [authorization]"
        );
    }

    #[test]
    fn auth_kinds_are_401() {
        for kind in [
            ErrorKind::MissingAuthToken,
            ErrorKind::MalformedAuthToken,
            ErrorKind::Unauthorized,
        ] {
            assert_eq!(kind.status_code(), StatusCode::UNAUTHORIZED, "{kind}");
        }
        assert_eq!(ErrorKind::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ErrorKind::ServiceUnavailable.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
