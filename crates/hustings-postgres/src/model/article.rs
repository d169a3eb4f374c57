//! Blog article model.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::articles;
use crate::types::ArticleStatus;

/// A blog article written by campaign staff.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = articles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Article {
    pub id: Uuid,
    /// User who created the article; owner for `*:own` permission checks.
    pub author_id: Uuid,
    pub title: String,
    /// URL-safe unique identifier derived from the title.
    pub slug: String,
    pub summary: Option<String>,
    pub body: String,
    pub status: ArticleStatus,
    /// Set once, the first time the article is published.
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Data for creating a new article.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = articles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewArticle {
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub body: String,
}

/// Data for updating an article.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = articles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateArticle {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub summary: Option<Option<String>>,
    pub body: Option<String>,
    pub status: Option<ArticleStatus>,
    pub published_at: Option<Option<Timestamp>>,
    pub updated_at: Option<Timestamp>,
}

impl Article {
    /// Returns whether the article is visible to the public.
    #[inline]
    pub fn is_published(&self) -> bool {
        self.status.is_public()
    }

    /// Returns whether the given user wrote this article.
    #[inline]
    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }
}
