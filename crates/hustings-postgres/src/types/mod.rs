//! Contains constraints, enumerations and other custom types.

mod constraint;
mod enums;

pub use constraint::{
    ArticleCommentConstraints, ArticleConstraints, ConstraintCategory, ConstraintViolation,
    EventConstraints, EventRegistrationConstraints, ModerationLogConstraints, UserConstraints,
};
pub use enums::{ArticleStatus, EventStatus, ModerationAction, UserRole, UserStatus};
