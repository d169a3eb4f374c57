//! Drop-in replacements for axum's `Json`, `Path` and `Query` extractors.
//!
//! Each one rejects with the crate's [`Error`] so clients always receive the
//! shared JSON error body instead of axum's plain-text rejections.
//!
//! [`Error`]: crate::handler::Error

mod enhanced_json;
mod enhanced_path;
mod enhanced_query;
mod validated_json;

pub use self::enhanced_json::Json;
pub use self::enhanced_path::Path;
pub use self::enhanced_query::Query;
pub use self::validated_json::ValidateJson;

/// Trims a rejection message to a few lines so parser internals do not leak.
fn sanitize_error_message(message: &str, max_len: usize) -> String {
    message
        .lines()
        .take(3)
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(max_len)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_truncates() {
        let message = "first line\nsecond line\nthird line\nfourth line";
        assert_eq!(
            sanitize_error_message(message, 200),
            "first line second line third line"
        );
        assert_eq!(sanitize_error_message(message, 5), "first");
    }
}
