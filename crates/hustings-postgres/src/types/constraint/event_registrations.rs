//! Event registrations table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Event registrations table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum EventRegistrationConstraints {
    #[strum(serialize = "event_registrations_pkey")]
    AlreadyRegistered,
}

impl EventRegistrationConstraints {
    /// Creates a new [`EventRegistrationConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            EventRegistrationConstraints::AlreadyRegistered => ConstraintCategory::Uniqueness,
        }
    }
}

impl From<EventRegistrationConstraints> for String {
    #[inline]
    fn from(val: EventRegistrationConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for EventRegistrationConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
