//! Moderation logs table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Moderation logs table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum ModerationLogConstraints {
    #[strum(serialize = "moderation_logs_reason_length")]
    ReasonLength,
}

impl ModerationLogConstraints {
    /// Creates a new [`ModerationLogConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            ModerationLogConstraints::ReasonLength => ConstraintCategory::Validation,
        }
    }
}

impl From<ModerationLogConstraints> for String {
    #[inline]
    fn from(val: ModerationLogConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for ModerationLogConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
