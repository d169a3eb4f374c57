//! Database models for all tables.
//!
//! Each table has a queryable model plus `New*` (insert) and, where rows are
//! mutable, `Update*` (changeset) structures.

mod article;
mod article_comment;
mod event;
mod event_registration;
mod moderation_log;
mod user;

pub use article::{Article, NewArticle, UpdateArticle};
pub use article_comment::{ArticleComment, NewArticleComment};
pub use event::{Event, NewEvent, UpdateEvent};
pub use event_registration::{EventRegistration, NewEventRegistration};
pub use moderation_log::{ModerationLog, NewModerationLog};
pub use user::{NewUser, UpdateUser, User};
