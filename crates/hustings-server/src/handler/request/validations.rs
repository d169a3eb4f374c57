//! Request validation utilities.

use serde::{Deserialize, Deserializer};
use validator::ValidationError;

use crate::utility::slug::is_valid_slug;

pub fn validation_error(code: &'static str, message: &str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.to_owned().into());
    error
}

/// Accepts only lower-case, dash-joined ASCII slugs.
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if is_valid_slug(slug) {
        return Ok(());
    }

    Err(validation_error(
        "slug",
        "must contain only lower-case letters, digits and single dashes",
    ))
}

/// Rejects values that are empty once surrounding whitespace is removed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(validation_error("blank", "must not be blank"));
    }

    Ok(())
}

/// Deserializes a nullable field of a partial update.
///
/// A missing field stays `None`, an explicit `null` becomes `Some(None)`.
/// Use together with `#[serde(default)]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        summary: Option<Option<String>>,
    }

    #[test]
    fn double_option_distinguishes_null_from_missing() -> anyhow::Result<()> {
        let missing: Patch = serde_json::from_str("{}")?;
        assert_eq!(missing.summary, None);

        let cleared: Patch = serde_json::from_str(r#"{"summary":null}"#)?;
        assert_eq!(cleared.summary, Some(None));

        let set: Patch = serde_json::from_str(r#"{"summary":"hi"}"#)?;
        assert_eq!(set.summary, Some(Some("hi".to_owned())));
        Ok(())
    }

    #[test]
    fn slugs_and_blanks() {
        assert!(validate_slug("rally-2026").is_ok());
        assert!(validate_slug("Rally 2026").is_err());
        assert!(validate_not_blank("  ").is_err());
        assert!(validate_not_blank(" x ").is_ok());
    }
}
