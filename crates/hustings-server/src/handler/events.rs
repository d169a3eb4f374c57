//! Campaign events and attendee registrations.

use axum::extract::State;
use axum::http::StatusCode;
use hustings_postgres::model::{Event as EventModel, NewEventRegistration};
use hustings_postgres::query::{EventRegistrationRepository, EventRepository};
use hustings_postgres::types::EventStatus;
use hustings_postgres::{PgClient, PgConn};
use jiff::Timestamp;
use scoped_futures::ScopedFutureExt;

use super::request::{
    CreateEvent, EventFilter, EventPathParams, Pagination, UpdateEvent,
};
use super::response::{Attendee, Attendees, Event, Events, Registration};
use crate::extract::{
    AuthState, Json, OwnershipRule, Path, Permission, Query, RolePermissions, ValidateJson,
};
use crate::handler::{Error, ErrorKind, Result};
use crate::middleware::{PolicyRouter, RoutePolicy};
use crate::service::{FeatureFlag, ServiceState};

/// Tracing target for event operations.
const TRACING_TARGET: &str = "hustings_server::handler::events";

fn event_not_found(params: &EventPathParams) -> Error<'static> {
    ErrorKind::NotFound
        .with_message(format!("Event not found: {}", params.event_id))
        .with_resource("event")
}

/// Rejects events that do not end after they start.
fn check_window(starts_at: Timestamp, ends_at: Timestamp) -> Result<()> {
    if ends_at > starts_at {
        return Ok(());
    }

    Err(ErrorKind::BadRequest
        .with_message("Event must end after it starts")
        .with_resource("event"))
}

/// Loads an event for a write, or answers 404.
async fn find_event(conn: &mut PgConn, params: &EventPathParams) -> Result<EventModel> {
    conn.find_event_by_id(params.event_id)
        .await?
        .ok_or_else(|| event_not_found(params))
}

/// Drafts are only visible to callers who could edit them.
fn is_visible(event: &EventModel, auth_state: Option<&AuthState>) -> bool {
    event.is_public()
        || auth_state.is_some_and(|auth_state| {
            OwnershipRule::EVENT_UPDATE.permits(
                RolePermissions::global(),
                auth_state,
                event.organizer_id,
            )
        })
}

/// Lists published and cancelled events by start time.
#[tracing::instrument(skip_all)]
async fn list_events(
    State(pg_client): State<PgClient>,
    Query(filter): Query<EventFilter>,
    Query(pagination): Query<Pagination>,
) -> Result<(StatusCode, Json<Events>)> {
    let mut conn = pg_client.get_connection().await?;
    let events = conn
        .list_public_events(!filter.include_past, pagination.into())
        .await?;
    Ok((StatusCode::OK, Json(Event::from_models(events))))
}

/// Returns an event by id.
#[tracing::instrument(skip_all, fields(event_id = %path_params.event_id))]
async fn get_event(
    State(pg_client): State<PgClient>,
    auth_state: Option<AuthState>,
    Path(path_params): Path<EventPathParams>,
) -> Result<(StatusCode, Json<Event>)> {
    let mut conn = pg_client.get_connection().await?;
    let event = conn
        .find_event_by_id(path_params.event_id)
        .await?
        .filter(|event| is_visible(event, auth_state.as_ref()))
        .ok_or_else(|| event_not_found(&path_params))?;

    Ok((StatusCode::OK, Json(Event::from_model(event))))
}

/// Drafts a new event organized by the caller.
#[tracing::instrument(skip_all, fields(subject_id = %auth_state.subject_id))]
async fn create_event(
    State(pg_client): State<PgClient>,
    auth_state: AuthState,
    ValidateJson(request): ValidateJson<CreateEvent>,
) -> Result<(StatusCode, Json<Event>)> {
    check_window(request.starts_at, request.ends_at)?;

    let mut conn = pg_client.get_connection().await?;
    let event = conn
        .create_event(request.into_model(auth_state.subject_id))
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        event_id = %event.id,
        "event drafted"
    );

    Ok((StatusCode::CREATED, Json(Event::from_model(event))))
}

/// Edits an event.
#[tracing::instrument(skip_all, fields(event_id = %path_params.event_id))]
async fn update_event(
    State(pg_client): State<PgClient>,
    auth_state: AuthState,
    Path(path_params): Path<EventPathParams>,
    ValidateJson(request): ValidateJson<UpdateEvent>,
) -> Result<(StatusCode, Json<Event>)> {
    if request.status == Some(EventStatus::Published) {
        return Err(ErrorKind::BadRequest
            .with_message("Events are published through the publish endpoint")
            .with_resource("event"));
    }

    let mut conn = pg_client.get_connection().await?;
    let event = find_event(&mut conn, &path_params).await?;
    auth_state.authorize_ownership(OwnershipRule::EVENT_UPDATE, event.organizer_id, "event")?;

    check_window(
        request.starts_at.unwrap_or(event.starts_at.into()),
        request.ends_at.unwrap_or(event.ends_at.into()),
    )?;

    let event = conn.update_event(event.id, request.into_model()).await?;

    tracing::info!(
        target: TRACING_TARGET,
        event_id = %event.id,
        subject_id = %auth_state.subject_id,
        status = %event.status,
        "event updated"
    );

    Ok((StatusCode::OK, Json(Event::from_model(event))))
}

/// Deletes an event together with its registrations.
#[tracing::instrument(skip_all, fields(event_id = %path_params.event_id))]
async fn delete_event(
    State(pg_client): State<PgClient>,
    auth_state: AuthState,
    Path(path_params): Path<EventPathParams>,
) -> Result<StatusCode> {
    let mut conn = pg_client.get_connection().await?;
    let event = find_event(&mut conn, &path_params).await?;
    auth_state.authorize_ownership(OwnershipRule::EVENT_DELETE, event.organizer_id, "event")?;

    if !conn.delete_event(event.id).await? {
        return Err(event_not_found(&path_params));
    }

    tracing::info!(
        target: TRACING_TARGET,
        event_id = %event.id,
        subject_id = %auth_state.subject_id,
        "event deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Publishes a draft event.
#[tracing::instrument(skip_all, fields(event_id = %path_params.event_id))]
async fn publish_event(
    State(pg_client): State<PgClient>,
    auth_state: AuthState,
    Path(path_params): Path<EventPathParams>,
) -> Result<(StatusCode, Json<Event>)> {
    let mut conn = pg_client.get_connection().await?;
    let event = find_event(&mut conn, &path_params).await?;

    if event.status == EventStatus::Cancelled {
        return Err(ErrorKind::Conflict
            .with_message("Cancelled events cannot be published")
            .with_resource("event"));
    }

    let changes = hustings_postgres::model::UpdateEvent {
        status: Some(EventStatus::Published),
        ..Default::default()
    };
    let event = conn.update_event(event.id, changes).await?;

    tracing::info!(
        target: TRACING_TARGET,
        event_id = %event.id,
        subject_id = %auth_state.subject_id,
        "event published"
    );

    Ok((StatusCode::OK, Json(Event::from_model(event))))
}

/// Registers the caller for an event.
///
/// The event row stays locked while capacity is checked, so concurrent
/// registrations cannot overfill it.
#[tracing::instrument(skip_all, fields(event_id = %path_params.event_id))]
async fn register_for_event(
    State(pg_client): State<PgClient>,
    auth_state: AuthState,
    Path(path_params): Path<EventPathParams>,
) -> Result<(StatusCode, Json<Registration>)> {
    let event_id = path_params.event_id;
    let user_id = auth_state.subject_id;
    let mut conn = pg_client.get_connection().await?;

    let registration = conn
        .transaction(|conn| {
            async move {
                let event = conn
                    .lock_event(event_id)
                    .await?
                    .filter(EventModel::is_public)
                    .ok_or_else(|| event_not_found(&path_params))?;

                if !event.accepts_registrations() {
                    return Err(ErrorKind::Conflict
                        .with_message("Event is not open for registration")
                        .with_context(format!("event status: {}", event.status))
                        .with_resource("event_registration"));
                }

                let registered = conn.count_event_registrations(event_id).await?;
                if event.is_full(registered) {
                    return Err(ErrorKind::Conflict
                        .with_message("Event is full")
                        .with_resource("event_registration"));
                }

                let registration = conn
                    .create_event_registration(NewEventRegistration { event_id, user_id })
                    .await?;
                Ok::<_, Error<'static>>(registration)
            }
            .scope_boxed()
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        event_id = %event_id,
        user_id = %user_id,
        "registered for event"
    );

    Ok((StatusCode::CREATED, Json(Registration::from_model(registration))))
}

/// Withdraws the caller's registration.
#[tracing::instrument(skip_all, fields(event_id = %path_params.event_id))]
async fn unregister_from_event(
    State(pg_client): State<PgClient>,
    auth_state: AuthState,
    Path(path_params): Path<EventPathParams>,
) -> Result<StatusCode> {
    let mut conn = pg_client.get_connection().await?;
    let removed = conn
        .delete_event_registration(path_params.event_id, auth_state.subject_id)
        .await?;

    if !removed {
        return Err(ErrorKind::NotFound
            .with_message("You are not registered for this event")
            .with_resource("event_registration"));
    }

    tracing::info!(
        target: TRACING_TARGET,
        event_id = %path_params.event_id,
        user_id = %auth_state.subject_id,
        "registration withdrawn"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Lists the attendees of an event.
#[tracing::instrument(skip_all, fields(event_id = %path_params.event_id))]
async fn list_attendees(
    State(pg_client): State<PgClient>,
    Path(path_params): Path<EventPathParams>,
    Query(pagination): Query<Pagination>,
) -> Result<(StatusCode, Json<Attendees>)> {
    let mut conn = pg_client.get_connection().await?;
    let event = find_event(&mut conn, &path_params).await?;
    let attendees = conn
        .list_event_attendees(event.id, pagination.into())
        .await?;

    Ok((StatusCode::OK, Json(Attendee::from_models(attendees))))
}

/// Returns a [`PolicyRouter`] with all related routes.
pub fn routes() -> PolicyRouter<ServiceState> {
    let events = |policy: RoutePolicy| policy.with_feature(FeatureFlag::Events);

    PolicyRouter::new()
        .get("/events", list_events, events(RoutePolicy::public()))
        .post(
            "/events",
            create_event,
            events(RoutePolicy::require([Permission::EventCreate])),
        )
        .get("/events/{event_id}", get_event, events(RoutePolicy::public()))
        .patch(
            "/events/{event_id}",
            update_event,
            events(RoutePolicy::require(OwnershipRule::EVENT_UPDATE.permissions())),
        )
        .delete(
            "/events/{event_id}",
            delete_event,
            events(RoutePolicy::require(OwnershipRule::EVENT_DELETE.permissions())),
        )
        .post(
            "/events/{event_id}/publish",
            publish_event,
            events(RoutePolicy::require([Permission::EventPublish])),
        )
        .post(
            "/events/{event_id}/registrations",
            register_for_event,
            events(RoutePolicy::require([Permission::EventRegister])),
        )
        .delete(
            "/events/{event_id}/registrations",
            unregister_from_event,
            events(RoutePolicy::require([Permission::EventRegister])),
        )
        .get(
            "/events/{event_id}/registrations",
            list_attendees,
            events(RoutePolicy::require([Permission::EventAttendeesRead])),
        )
}
