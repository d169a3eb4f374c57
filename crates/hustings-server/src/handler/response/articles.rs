//! Article response types.

use hustings_postgres::model;
use hustings_postgres::types::ArticleStatus;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a blog article.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// ID of the article.
    pub article_id: Uuid,
    /// ID of the author.
    pub author_id: Uuid,
    /// Headline.
    pub title: String,
    /// URL slug.
    pub slug: String,
    /// Short teaser.
    pub summary: Option<String>,
    /// Content.
    pub body: String,
    /// Editorial status.
    pub status: ArticleStatus,
    /// Timestamp of the first publication.
    pub published_at: Option<Timestamp>,
    /// Timestamp when the article was created.
    pub created_at: Timestamp,
    /// Timestamp when the article was last updated.
    pub updated_at: Timestamp,
}

impl Article {
    /// Creates an Article response from a database model.
    pub fn from_model(article: model::Article) -> Self {
        Self {
            article_id: article.id,
            author_id: article.author_id,
            title: article.title,
            slug: article.slug,
            summary: article.summary,
            body: article.body,
            status: article.status,
            published_at: article.published_at.map(Into::into),
            created_at: article.created_at.into(),
            updated_at: article.updated_at.into(),
        }
    }

    /// Creates a list of Article responses from database models.
    pub fn from_models(models: Vec<model::Article>) -> Vec<Self> {
        models.into_iter().map(Self::from_model).collect()
    }
}

/// Response for listing articles.
pub type Articles = Vec<Article>;
