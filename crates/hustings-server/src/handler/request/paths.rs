//! Path parameter types for HTTP handlers.
//!
//! Field names match the `{placeholder}` names of the route templates.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Path parameters for article operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
pub struct ArticlePathParams {
    /// Unique identifier of the article.
    pub article_id: Uuid,
}

/// Path parameters for looking an article up by slug.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
pub struct SlugPathParams {
    /// URL slug of the article.
    pub slug: String,
}

/// Path parameters for comment operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
pub struct CommentPathParams {
    /// Unique identifier of the comment.
    pub comment_id: Uuid,
}

/// Path parameters for event operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
pub struct EventPathParams {
    /// Unique identifier of the event.
    pub event_id: Uuid,
}

/// Path parameters for user administration.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
pub struct UserPathParams {
    /// Unique identifier of the user.
    pub user_id: Uuid,
}
