//! Campaign event status enumeration.

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Publication status of a campaign event.
///
/// Corresponds to the `EVENT_STATUS` PostgreSQL enum.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::EventStatus"]
#[strum(serialize_all = "snake_case")]
pub enum EventStatus {
    /// Being prepared by organizers, hidden from the public.
    #[db_rename = "draft"]
    #[serde(rename = "draft")]
    #[default]
    Draft,

    /// Listed publicly and open for registration.
    #[db_rename = "published"]
    #[serde(rename = "published")]
    Published,

    /// Called off; still listed but closed for registration.
    #[db_rename = "cancelled"]
    #[serde(rename = "cancelled")]
    Cancelled,
}

impl EventStatus {
    /// Returns whether events in this status are visible to the public.
    #[inline]
    pub fn is_public(self) -> bool {
        matches!(self, EventStatus::Published | EventStatus::Cancelled)
    }
}
