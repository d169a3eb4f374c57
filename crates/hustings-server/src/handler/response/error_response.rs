use std::borrow::Cow;

use serde::Serialize;

/// JSON body of every error response.
///
/// Built from a handler [`Error`]; the status code travels separately.
///
/// [`Error`]: crate::handler::Error
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse<'a> {
    /// Stable machine-readable error name, such as `forbidden`.
    pub name: &'static str,
    /// Message safe for client display.
    pub message: Cow<'a, str>,
    /// The resource the error relates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Cow<'a, str>>,
    /// Detail that helps a client fix the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Cow<'a, str>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_are_omitted() -> anyhow::Result<()> {
        let response = ErrorResponse {
            name: "forbidden",
            message: Cow::Borrowed("requires one of: user:ban"),
            resource: Some(Cow::Borrowed("user")),
            context: None,
        };
        let json = serde_json::to_value(&response)?;

        assert_eq!(json["name"], "forbidden");
        assert_eq!(json["message"], "requires one of: user:ban");
        assert_eq!(json["resource"], "user");
        assert!(json.get("context").is_none());
        Ok(())
    }
}
