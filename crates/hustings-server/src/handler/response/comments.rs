//! Article comment response types.

use hustings_postgres::model;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents an article comment.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// ID of the comment.
    pub comment_id: Uuid,
    /// ID of the article this comment belongs to.
    pub article_id: Uuid,
    /// ID of the user that wrote the comment.
    pub author_id: Uuid,
    /// Comment text.
    pub body: String,
    /// Timestamp when the comment was created.
    pub created_at: Timestamp,
}

impl Comment {
    /// Creates a Comment response from a database model.
    pub fn from_model(comment: model::ArticleComment) -> Self {
        Self {
            comment_id: comment.id,
            article_id: comment.article_id,
            author_id: comment.author_id,
            body: comment.body,
            created_at: comment.created_at.into(),
        }
    }

    /// Creates a list of Comment responses from database models.
    pub fn from_models(models: Vec<model::ArticleComment>) -> Vec<Self> {
        models.into_iter().map(Self::from_model).collect()
    }
}

/// Response for listing comments.
pub type Comments = Vec<Comment>;
