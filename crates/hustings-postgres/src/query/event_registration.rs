//! Registration repository for event attendance.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use super::Pagination;
use crate::model::{EventRegistration, NewEventRegistration, User};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for event registration database operations.
pub trait EventRegistrationRepository {
    /// Registers a user for an event.
    ///
    /// A second registration by the same user violates `event_registrations_pkey`.
    fn create_event_registration(
        &mut self,
        registration: NewEventRegistration,
    ) -> impl Future<Output = PgResult<EventRegistration>> + Send;

    /// Removes a registration. Returns whether a row was removed.
    fn delete_event_registration(
        &mut self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = PgResult<bool>> + Send;

    /// Counts the registrations of an event.
    fn count_event_registrations(
        &mut self,
        event_id: Uuid,
    ) -> impl Future<Output = PgResult<i64>> + Send;

    /// Lists the attendees of an event in registration order.
    fn list_event_attendees(
        &mut self,
        event_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<(EventRegistration, User)>>> + Send;
}

impl EventRegistrationRepository for PgConnection {
    async fn create_event_registration(
        &mut self,
        registration: NewEventRegistration,
    ) -> PgResult<EventRegistration> {
        use schema::event_registrations;

        diesel::insert_into(event_registrations::table)
            .values(&registration)
            .returning(EventRegistration::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn delete_event_registration(&mut self, event_id: Uuid, user_id: Uuid) -> PgResult<bool> {
        use schema::event_registrations::{self, dsl};

        diesel::delete(
            event_registrations::table
                .filter(dsl::event_id.eq(event_id))
                .filter(dsl::user_id.eq(user_id)),
        )
        .execute(self)
        .await
        .map(|rows| rows > 0)
        .map_err(PgError::from)
    }

    async fn count_event_registrations(&mut self, event_id: Uuid) -> PgResult<i64> {
        use schema::event_registrations::{self, dsl};

        event_registrations::table
            .filter(dsl::event_id.eq(event_id))
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn list_event_attendees(
        &mut self,
        event_id: Uuid,
        pagination: Pagination,
    ) -> PgResult<Vec<(EventRegistration, User)>> {
        use schema::event_registrations::{self, dsl};
        use schema::users;

        event_registrations::table
            .inner_join(users::table)
            .filter(dsl::event_id.eq(event_id))
            .order(dsl::created_at.asc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select((EventRegistration::as_select(), User::as_select()))
            .load(self)
            .await
            .map_err(PgError::from)
    }
}
