//! Database enumeration types for type-safe queries.
//!
//! Each enumeration mirrors a PostgreSQL ENUM type from the initial migration
//! and carries serde and strum support for the HTTP layer.

// User-related enumerations
mod moderation_action;
mod user_role;
mod user_status;

// Content-related enumerations
mod article_status;
mod event_status;

pub use article_status::ArticleStatus;
pub use event_status::EventStatus;
pub use moderation_action::ModerationAction;
pub use user_role::UserRole;
pub use user_status::UserStatus;
