//! Article request types.

use hustings_postgres::model::{NewArticle, UpdateArticle as UpdateArticleModel};
use hustings_postgres::types::ArticleStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::validations::{double_option, validate_not_blank, validate_slug};

/// Request payload for drafting a new article.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticle {
    /// Headline of the article.
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub title: String,
    /// URL slug; derived from the title when omitted.
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    /// Short teaser shown in listings.
    #[validate(length(max = 500))]
    pub summary: Option<String>,
    /// Article content.
    #[validate(length(min = 1, max = 100000))]
    pub body: String,
}

impl CreateArticle {
    /// Converts to database model with the resolved slug.
    pub fn into_model(self, author_id: Uuid, slug: String) -> NewArticle {
        NewArticle {
            author_id,
            title: self.title,
            slug,
            summary: self.summary,
            body: self.body,
        }
    }
}

/// Request payload for editing an article.
///
/// Publishing has its own endpoint, so `status` only moves an article
/// between `draft` and `archived`.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticle {
    /// New headline.
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub title: Option<String>,
    /// New URL slug.
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    /// New teaser; `null` removes it.
    #[serde(default, deserialize_with = "double_option")]
    pub summary: Option<Option<String>>,
    /// New content.
    #[validate(length(min = 1, max = 100000))]
    pub body: Option<String>,
    /// New editorial status.
    pub status: Option<ArticleStatus>,
}

impl UpdateArticle {
    /// Converts to database model.
    pub fn into_model(self) -> UpdateArticleModel {
        UpdateArticleModel {
            title: self.title,
            slug: self.slug,
            summary: self.summary,
            body: self.body,
            status: self.status,
            ..Default::default()
        }
    }
}
