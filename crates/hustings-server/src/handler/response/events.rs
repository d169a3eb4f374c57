//! Campaign event response types.

use hustings_postgres::model;
use hustings_postgres::types::EventStatus;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a campaign event.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// ID of the event.
    pub event_id: Uuid,
    /// ID of the organizer.
    pub organizer_id: Uuid,
    /// Name of the event.
    pub title: String,
    /// Description.
    pub description: String,
    /// Location.
    pub location: String,
    /// Start time.
    pub starts_at: Timestamp,
    /// End time.
    pub ends_at: Timestamp,
    /// Maximum number of registrations.
    pub capacity: Option<i32>,
    /// Current status.
    pub status: EventStatus,
    /// Timestamp when the event was created.
    pub created_at: Timestamp,
    /// Timestamp when the event was last updated.
    pub updated_at: Timestamp,
}

impl Event {
    /// Creates an Event response from a database model.
    pub fn from_model(event: model::Event) -> Self {
        Self {
            event_id: event.id,
            organizer_id: event.organizer_id,
            title: event.title,
            description: event.description,
            location: event.location,
            starts_at: event.starts_at.into(),
            ends_at: event.ends_at.into(),
            capacity: event.capacity,
            status: event.status,
            created_at: event.created_at.into(),
            updated_at: event.updated_at.into(),
        }
    }

    /// Creates a list of Event responses from database models.
    pub fn from_models(models: Vec<model::Event>) -> Vec<Self> {
        models.into_iter().map(Self::from_model).collect()
    }
}

/// Response for listing events.
pub type Events = Vec<Event>;

/// Represents a registration for an event.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// ID of the event.
    pub event_id: Uuid,
    /// ID of the registered user.
    pub user_id: Uuid,
    /// Timestamp of the registration.
    pub created_at: Timestamp,
}

impl Registration {
    /// Creates a Registration response from a database model.
    pub fn from_model(registration: model::EventRegistration) -> Self {
        Self {
            event_id: registration.event_id,
            user_id: registration.user_id,
            created_at: registration.created_at.into(),
        }
    }
}

/// Represents a registered attendee, as seen by event staff.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    /// ID of the user.
    pub user_id: Uuid,
    /// Public name.
    pub display_name: String,
    /// Email address.
    pub email: String,
    /// Timestamp of the registration.
    pub registered_at: Timestamp,
}

impl Attendee {
    /// Creates an Attendee response from database models.
    pub fn from_model((registration, user): (model::EventRegistration, model::User)) -> Self {
        Self {
            user_id: user.id,
            display_name: user.display_name,
            email: user.email,
            registered_at: registration.created_at.into(),
        }
    }

    /// Creates a list of Attendee responses from database models.
    pub fn from_models(models: Vec<(model::EventRegistration, model::User)>) -> Vec<Self> {
        models.into_iter().map(Self::from_model).collect()
    }
}

/// Response for listing attendees.
pub type Attendees = Vec<Attendee>;
