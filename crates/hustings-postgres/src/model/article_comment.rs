//! Article comment model.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::article_comments;

/// A comment left by a verified member under a published article.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = article_comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ArticleComment {
    pub id: Uuid,
    pub article_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: Timestamp,
}

/// Data for creating a new comment.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = article_comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewArticleComment {
    pub article_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
}

impl ArticleComment {
    /// Returns whether the given user wrote this comment.
    #[inline]
    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }
}
