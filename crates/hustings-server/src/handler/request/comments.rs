//! Article comment request types.

use hustings_postgres::model::NewArticleComment;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::validations::validate_not_blank;

/// Request payload for commenting on an article.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateComment {
    /// Comment text.
    #[validate(length(min = 1, max = 4000), custom(function = "validate_not_blank"))]
    pub body: String,
}

impl CreateComment {
    /// Converts to database model.
    pub fn into_model(self, article_id: Uuid, author_id: Uuid) -> NewArticleComment {
        NewArticleComment {
            article_id,
            author_id,
            body: self.body,
        }
    }
}
