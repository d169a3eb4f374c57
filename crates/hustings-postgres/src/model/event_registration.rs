//! Event registration model.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::event_registrations;

/// A user's registration for an event.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = event_registrations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EventRegistration {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub created_at: Timestamp,
}

/// Data for registering a user for an event.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = event_registrations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewEventRegistration {
    pub event_id: Uuid,
    pub user_id: Uuid,
}
