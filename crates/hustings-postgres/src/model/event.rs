//! Campaign event model.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::events;
use crate::types::EventStatus;

/// A campaign event such as a rally, town hall or canvassing session.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Event {
    pub id: Uuid,
    /// User who created the event; owner for `*:own` permission checks.
    pub organizer_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    /// Maximum number of registrations, unlimited when absent.
    pub capacity: Option<i32>,
    pub status: EventStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Data for creating a new event.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewEvent {
    pub organizer_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub capacity: Option<i32>,
}

/// Data for updating an event.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub capacity: Option<Option<i32>>,
    pub status: Option<EventStatus>,
    pub updated_at: Option<Timestamp>,
}

impl Event {
    /// Returns whether the event is listed publicly.
    #[inline]
    pub fn is_public(&self) -> bool {
        self.status.is_public()
    }

    /// Returns whether the given user organizes this event.
    #[inline]
    pub fn is_organized_by(&self, user_id: Uuid) -> bool {
        self.organizer_id == user_id
    }

    /// Returns whether the event has already started.
    pub fn has_started(&self) -> bool {
        jiff::Timestamp::from(self.starts_at) <= jiff::Timestamp::now()
    }

    /// Returns whether new registrations are accepted, ignoring capacity.
    pub fn accepts_registrations(&self) -> bool {
        self.status == EventStatus::Published && !self.has_started()
    }

    /// Returns whether `registered` attendees fill the event.
    pub fn is_full(&self, registered: i64) -> bool {
        self.capacity
            .is_some_and(|capacity| registered >= i64::from(capacity))
    }
}
