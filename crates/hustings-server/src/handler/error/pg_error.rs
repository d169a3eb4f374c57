//! Database error to HTTP error conversion.
//!
//! Named constraint violations become client errors with a specific message.
//! Everything else is logged and hidden behind a 500.

use hustings_postgres::PgError;
use hustings_postgres::error::DieselError;
use hustings_postgres::types::{
    ArticleCommentConstraints, ArticleConstraints, ConstraintViolation, EventConstraints,
    EventRegistrationConstraints, ModerationLogConstraints, UserConstraints,
};

use crate::handler::{Error, ErrorKind};

const TRACING_TARGET: &str = "hustings_server::postgres_constraints";

impl From<ConstraintViolation> for Error<'static> {
    fn from(constraint: ConstraintViolation) -> Self {
        match constraint {
            ConstraintViolation::User(c) => c.into(),
            ConstraintViolation::Article(c) => c.into(),
            ConstraintViolation::ArticleComment(c) => c.into(),
            ConstraintViolation::Event(c) => c.into(),
            ConstraintViolation::EventRegistration(c) => c.into(),
            ConstraintViolation::ModerationLog(c) => c.into(),
        }
    }
}

impl From<UserConstraints> for Error<'static> {
    fn from(c: UserConstraints) -> Self {
        let error = match c {
            UserConstraints::EmailKey => ErrorKind::Conflict
                .with_message("An account with this email address already exists"),
            UserConstraints::EmailLowercase => {
                ErrorKind::BadRequest.with_message("Email address must be lower-case")
            }
            UserConstraints::DisplayNameLength => ErrorKind::BadRequest
                .with_message("Display name must be between 2 and 64 characters long"),
            UserConstraints::UpdatedAfterCreated => ErrorKind::InternalServerError.into_error(),
        };

        error.with_resource("user")
    }
}

impl From<ArticleConstraints> for Error<'static> {
    fn from(c: ArticleConstraints) -> Self {
        let error = match c {
            ArticleConstraints::SlugKey => {
                ErrorKind::Conflict.with_message("An article with this slug already exists")
            }
            ArticleConstraints::TitleLength => ErrorKind::BadRequest
                .with_message("Title must be between 1 and 200 characters long"),
            ArticleConstraints::UpdatedAfterCreated => ErrorKind::InternalServerError.into_error(),
        };

        error.with_resource("article")
    }
}

impl From<ArticleCommentConstraints> for Error<'static> {
    fn from(c: ArticleCommentConstraints) -> Self {
        let error = match c {
            ArticleCommentConstraints::BodyLength => ErrorKind::BadRequest
                .with_message("Comment must be between 1 and 4000 characters long"),
        };

        error.with_resource("comment")
    }
}

impl From<EventConstraints> for Error<'static> {
    fn from(c: EventConstraints) -> Self {
        let error = match c {
            EventConstraints::EndsAfterStarts => {
                ErrorKind::BadRequest.with_message("Event must end after it starts")
            }
            EventConstraints::CapacityPositive => {
                ErrorKind::BadRequest.with_message("Event capacity must be positive")
            }
            EventConstraints::UpdatedAfterCreated => ErrorKind::InternalServerError.into_error(),
        };

        error.with_resource("event")
    }
}

impl From<EventRegistrationConstraints> for Error<'static> {
    fn from(c: EventRegistrationConstraints) -> Self {
        let error = match c {
            EventRegistrationConstraints::AlreadyRegistered => {
                ErrorKind::Conflict.with_message("You are already registered for this event")
            }
        };

        error.with_resource("event_registration")
    }
}

impl From<ModerationLogConstraints> for Error<'static> {
    fn from(c: ModerationLogConstraints) -> Self {
        let error = match c {
            ModerationLogConstraints::ReasonLength => {
                ErrorKind::BadRequest.with_message("Reason cannot exceed 1000 characters")
            }
        };

        error.with_resource("moderation_log")
    }
}

impl From<PgError> for Error<'static> {
    fn from(error: PgError) -> Self {
        if let Some(constraint) = error.constraint_violation() {
            tracing::warn!(
                target: TRACING_TARGET,
                constraint = %constraint,
                table = constraint.table_name(),
                "query rejected by constraint"
            );
            return constraint.into();
        }

        if error.is_transient() {
            tracing::error!(target: TRACING_TARGET, error = %error, "database unavailable");
            return ErrorKind::ServiceUnavailable.into_error();
        }

        tracing::error!(target: TRACING_TARGET, error = %error, "database error");
        ErrorKind::InternalServerError.into_error()
    }
}

// Lets transaction closures return HTTP errors directly.
impl From<DieselError> for Error<'static> {
    fn from(error: DieselError) -> Self {
        PgError::from(error).into()
    }
}
