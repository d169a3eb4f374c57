//! Campaign event request types.

use hustings_postgres::model::{NewEvent, UpdateEvent as UpdateEventModel};
use hustings_postgres::types::EventStatus;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::validations::{double_option, validate_not_blank};

/// Request payload for drafting a new event.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvent {
    /// Name of the event.
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub title: String,
    /// What attendees can expect.
    #[validate(length(max = 10000))]
    #[serde(default)]
    pub description: String,
    /// Where the event takes place.
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub location: String,
    /// When the event starts.
    pub starts_at: Timestamp,
    /// When the event ends; must be after `starts_at`.
    pub ends_at: Timestamp,
    /// Maximum number of registrations, unlimited when omitted.
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
}

impl CreateEvent {
    /// Converts to database model.
    pub fn into_model(self, organizer_id: Uuid) -> NewEvent {
        NewEvent {
            organizer_id,
            title: self.title,
            description: self.description,
            location: self.location,
            starts_at: self.starts_at.into(),
            ends_at: self.ends_at.into(),
            capacity: self.capacity,
        }
    }
}

/// Request payload for editing an event.
///
/// Publishing has its own endpoint, so `status` only moves an event
/// between `draft` and `cancelled`.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEvent {
    /// New name.
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub title: Option<String>,
    /// New description.
    #[validate(length(max = 10000))]
    pub description: Option<String>,
    /// New location.
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub location: Option<String>,
    /// New start time.
    pub starts_at: Option<Timestamp>,
    /// New end time.
    pub ends_at: Option<Timestamp>,
    /// New capacity; `null` removes the limit.
    #[serde(default, deserialize_with = "double_option")]
    pub capacity: Option<Option<i32>>,
    /// New status.
    pub status: Option<EventStatus>,
}

impl UpdateEvent {
    /// Converts to database model.
    pub fn into_model(self) -> UpdateEventModel {
        UpdateEventModel {
            title: self.title,
            description: self.description,
            location: self.location,
            starts_at: self.starts_at.map(Into::into),
            ends_at: self.ends_at.map(Into::into),
            capacity: self.capacity,
            status: self.status,
            ..Default::default()
        }
    }
}

/// Filters for listing events.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilter {
    /// Also list events that have already ended.
    #[serde(default)]
    pub include_past: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_timestamps() -> anyhow::Result<()> {
        let request: CreateEvent = serde_json::from_str(
            r#"{
                "title": "Canvass kickoff",
                "location": "Union Hall",
                "startsAt": "2026-11-02T17:00:00Z",
                "endsAt": "2026-11-02T19:00:00Z",
                "capacity": 40
            }"#,
        )?;

        assert!(request.validate().is_ok());
        assert!(request.ends_at > request.starts_at);
        assert!(request.description.is_empty());
        Ok(())
    }

    #[test]
    fn zero_capacity_is_invalid() -> anyhow::Result<()> {
        let request: CreateEvent = serde_json::from_str(
            r#"{
                "title": "Phone bank",
                "location": "Online",
                "startsAt": "2026-11-02T17:00:00Z",
                "endsAt": "2026-11-02T19:00:00Z",
                "capacity": 0
            }"#,
        )?;

        assert!(request.validate().is_err());
        Ok(())
    }

    #[test]
    fn null_capacity_clears_limit() -> anyhow::Result<()> {
        let request: UpdateEvent = serde_json::from_str(r#"{"capacity":null}"#)?;
        assert_eq!(request.into_model().capacity, Some(None));
        Ok(())
    }
}
