//! Event repository for campaign events.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff::Timestamp;
use uuid::Uuid;

use super::Pagination;
use crate::model::{Event, NewEvent, UpdateEvent};
use crate::types::EventStatus;
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for event database operations.
pub trait EventRepository {
    /// Inserts a new draft event.
    fn create_event(&mut self, new_event: NewEvent)
    -> impl Future<Output = PgResult<Event>> + Send;

    /// Finds an event by id regardless of its status.
    fn find_event_by_id(
        &mut self,
        event_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Event>>> + Send;

    /// Finds an event and locks its row until the surrounding transaction ends.
    ///
    /// Used to serialize registrations against the capacity limit.
    fn lock_event(
        &mut self,
        event_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Event>>> + Send;

    /// Lists published and cancelled events by start time.
    ///
    /// With `upcoming_only`, events that already ended are skipped.
    fn list_public_events(
        &mut self,
        upcoming_only: bool,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<Event>>> + Send;

    /// Applies partial updates and bumps `updated_at`.
    fn update_event(
        &mut self,
        event_id: Uuid,
        updates: UpdateEvent,
    ) -> impl Future<Output = PgResult<Event>> + Send;

    /// Deletes an event and its registrations. Returns whether a row was removed.
    fn delete_event(&mut self, event_id: Uuid) -> impl Future<Output = PgResult<bool>> + Send;
}

impl EventRepository for PgConnection {
    async fn create_event(&mut self, mut new_event: NewEvent) -> PgResult<Event> {
        use schema::events;

        new_event.title = new_event.title.trim().to_owned();
        new_event.location = new_event.location.trim().to_owned();

        diesel::insert_into(events::table)
            .values(&new_event)
            .returning(Event::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_event_by_id(&mut self, event_id: Uuid) -> PgResult<Option<Event>> {
        use schema::events::{self, dsl};

        events::table
            .filter(dsl::id.eq(event_id))
            .select(Event::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn lock_event(&mut self, event_id: Uuid) -> PgResult<Option<Event>> {
        use schema::events::{self, dsl};

        events::table
            .filter(dsl::id.eq(event_id))
            .for_update()
            .select(Event::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_public_events(
        &mut self,
        upcoming_only: bool,
        pagination: Pagination,
    ) -> PgResult<Vec<Event>> {
        use schema::events::{self, dsl};

        let mut query = events::table
            .filter(dsl::status.eq_any([EventStatus::Published, EventStatus::Cancelled]))
            .into_boxed();

        if upcoming_only {
            let now = jiff_diesel::Timestamp::from(Timestamp::now());
            query = query.filter(dsl::ends_at.gt(now));
        }

        query
            .order(dsl::starts_at.asc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(Event::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn update_event(&mut self, event_id: Uuid, mut updates: UpdateEvent) -> PgResult<Event> {
        use schema::events::{self, dsl};

        if let Some(title) = updates.title.as_mut() {
            *title = title.trim().to_owned();
        }
        updates.updated_at = Some(jiff_diesel::Timestamp::from(Timestamp::now()));

        diesel::update(events::table.filter(dsl::id.eq(event_id)))
            .set(&updates)
            .returning(Event::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn delete_event(&mut self, event_id: Uuid) -> PgResult<bool> {
        use schema::events::{self, dsl};

        diesel::delete(events::table.filter(dsl::id.eq(event_id)))
            .execute(self)
            .await
            .map(|rows| rows > 0)
            .map_err(PgError::from)
    }
}
