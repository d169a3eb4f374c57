//! Articles table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Articles table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum ArticleConstraints {
    #[strum(serialize = "articles_slug_key")]
    SlugKey,
    #[strum(serialize = "articles_title_length")]
    TitleLength,
    #[strum(serialize = "articles_updated_after_created")]
    UpdatedAfterCreated,
}

impl ArticleConstraints {
    /// Creates a new [`ArticleConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            ArticleConstraints::SlugKey => ConstraintCategory::Uniqueness,
            ArticleConstraints::TitleLength => ConstraintCategory::Validation,
            ArticleConstraints::UpdatedAfterCreated => ConstraintCategory::Chronological,
        }
    }
}

impl From<ArticleConstraints> for String {
    #[inline]
    fn from(val: ArticleConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for ArticleConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
