//! Article publication status enumeration.

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Publication status of a blog article.
///
/// Corresponds to the `ARTICLE_STATUS` PostgreSQL enum.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::ArticleStatus"]
#[strum(serialize_all = "snake_case")]
pub enum ArticleStatus {
    #[db_rename = "draft"]
    #[serde(rename = "draft")]
    #[default]
    Draft,

    #[db_rename = "published"]
    #[serde(rename = "published")]
    Published,

    #[db_rename = "archived"]
    #[serde(rename = "archived")]
    Archived,
}

impl ArticleStatus {
    /// Returns whether articles in this status are visible to the public.
    #[inline]
    pub fn is_public(self) -> bool {
        matches!(self, ArticleStatus::Published)
    }
}
