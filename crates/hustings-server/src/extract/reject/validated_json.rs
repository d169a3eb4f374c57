//! JSON extractor that also runs `validator` rules.

use std::borrow::Cow;
use std::collections::HashMap;

use axum::extract::{FromRequest, Request};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use super::Json;
use crate::handler::{Error, ErrorKind};

/// JSON extractor that validates the body after deserialization.
///
/// Works with any type implementing both `serde::Deserialize` and
/// `validator::Validate`; validation failures become a 400 listing every
/// offending field.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct ValidateJson<T>(pub T);

impl<T> ValidateJson<T> {
    /// Returns the inner validated value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;
        data.validate()?;
        Ok(Self(data))
    }
}

fn param_as_u64(params: &HashMap<Cow<'static, str>, serde_json::Value>, key: &str) -> Option<u64> {
    params.get(key).and_then(serde_json::Value::as_u64)
}

fn format_length_error(field: &str, error: &ValidationError) -> String {
    match (
        param_as_u64(&error.params, "min"),
        param_as_u64(&error.params, "max"),
    ) {
        (Some(min), Some(max)) => {
            format!("Field '{field}' must be between {min} and {max} characters long")
        }
        (Some(min), None) => format!("Field '{field}' must be at least {min} characters long"),
        (None, Some(max)) => format!("Field '{field}' must be at most {max} characters long"),
        (None, None) => format!("Field '{field}' has invalid length"),
    }
}

fn format_validation_error(field: &str, error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return format!("Field '{field}': {message}");
    }

    match error.code.as_ref() {
        "length" => format_length_error(field, error),
        "required" => format!("Field '{field}' is required"),
        "email" => format!("Field '{field}' must be a valid email address"),
        "range" => format!("Field '{field}' is out of range"),
        code => format!("Field '{field}' failed validation: {code}"),
    }
}

impl From<ValidationErrors> for Error<'static> {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, field_errors)| {
                field_errors
                    .iter()
                    .map(move |error| format_validation_error(field, error))
            })
            .collect();
        messages.sort();

        let message = if messages.is_empty() {
            "Validation failed".to_owned()
        } else {
            messages.join(". ")
        };

        tracing::debug!(errors = ?errors.field_errors(), "request validation failed");

        ErrorKind::BadRequest
            .with_message(message)
            .with_resource("request")
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct Signup {
        #[validate(email)]
        email: String,
        #[validate(length(min = 8, max = 128))]
        password: String,
    }

    #[test]
    fn lists_every_failing_field() {
        let signup = Signup {
            email: "not-an-email".into(),
            password: "short".into(),
        };

        let error: Error = signup.validate().map_err(Error::from).unwrap_err();
        let message = error.message().unwrap_or_default();

        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert!(message.contains("Field 'email' must be a valid email address"));
        assert!(message.contains("Field 'password' must be between 8 and 128 characters long"));
    }

    #[test]
    fn valid_input_passes() {
        let signup = Signup {
            email: "ada@example.org".into(),
            password: "correct horse".into(),
        };
        assert!(signup.validate().is_ok());
    }
}
