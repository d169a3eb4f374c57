//! Article comments table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Article comments table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum ArticleCommentConstraints {
    #[strum(serialize = "article_comments_body_length")]
    BodyLength,
}

impl ArticleCommentConstraints {
    /// Creates a new [`ArticleCommentConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            ArticleCommentConstraints::BodyLength => ConstraintCategory::Validation,
        }
    }
}

impl From<ArticleCommentConstraints> for String {
    #[inline]
    fn from(val: ArticleCommentConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for ArticleCommentConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
