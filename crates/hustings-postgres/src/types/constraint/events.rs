//! Events table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Events table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum EventConstraints {
    #[strum(serialize = "events_ends_after_starts")]
    EndsAfterStarts,
    #[strum(serialize = "events_capacity_positive")]
    CapacityPositive,
    #[strum(serialize = "events_updated_after_created")]
    UpdatedAfterCreated,
}

impl EventConstraints {
    /// Creates a new [`EventConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            EventConstraints::EndsAfterStarts => ConstraintCategory::Chronological,
            EventConstraints::CapacityPositive => ConstraintCategory::Validation,
            EventConstraints::UpdatedAfterCreated => ConstraintCategory::Chronological,
        }
    }
}

impl From<EventConstraints> for String {
    #[inline]
    fn from(val: EventConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for EventConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
