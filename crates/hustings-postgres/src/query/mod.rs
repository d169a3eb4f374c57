//! Database query repositories for all entities in the system.
//!
//! Every repository is a trait implemented directly on [`PgConnection`], so a
//! pooled [`PgConn`] or a connection borrowed inside a transaction can call
//! any of them.
//!
//! [`PgConnection`]: crate::PgConnection
//! [`PgConn`]: crate::PgConn

mod article;
mod article_comment;
mod event;
mod event_registration;
mod moderation_log;
mod user;

pub use article::ArticleRepository;
pub use article_comment::ArticleCommentRepository;
pub use event::EventRepository;
pub use event_registration::EventRegistrationRepository;
pub use moderation_log::ModerationLogRepository;
use serde::{Deserialize, Serialize};
pub use user::UserRepository;

/// Pagination parameters for database queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Maximum number of records to return.
    pub limit: i64,
    /// Number of records to skip.
    pub offset: i64,
}

impl Pagination {
    /// Largest page the API hands out.
    pub const MAX_LIMIT: i64 = 100;
    /// Page size used when the caller does not ask for one.
    pub const DEFAULT_LIMIT: i64 = 20;

    /// Creates a new pagination instance, clamping out-of-range values.
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.clamp(1, Self::MAX_LIMIT),
            offset: offset.max(0),
        }
    }

    /// Creates pagination from page number and page size.
    pub fn from_page(page: i64, page_size: i64) -> Self {
        let page = page.max(1);
        let page_size = page_size.clamp(1, Self::MAX_LIMIT);
        Self::new(page_size, (page - 1) * page_size)
    }

    /// Gets the current page number (1-based).
    pub fn page_number(&self) -> i64 {
        (self.offset / self.limit) + 1
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_new() {
        let pagination = Pagination::new(25, 100);
        assert_eq!(pagination.limit, 25);
        assert_eq!(pagination.offset, 100);
    }

    #[test]
    fn pagination_bounds_checking() {
        assert_eq!(Pagination::new(0, 10).limit, 1);
        assert_eq!(Pagination::new(1500, 10).limit, Pagination::MAX_LIMIT);
        assert_eq!(Pagination::new(10, -5).offset, 0);
    }

    #[test]
    fn pagination_from_page() {
        let pagination = Pagination::from_page(1, 20);
        assert_eq!(pagination.offset, 0);

        let pagination = Pagination::from_page(3, 10);
        assert_eq!(pagination.limit, 10);
        assert_eq!(pagination.offset, 20);
        assert_eq!(pagination.page_number(), 3);

        let pagination = Pagination::from_page(0, 10);
        assert_eq!(pagination.page_number(), 1);
    }

    #[test]
    fn pagination_default() {
        let pagination = Pagination::default();
        assert_eq!(pagination.limit, Pagination::DEFAULT_LIMIT);
        assert_eq!(pagination.offset, 0);
    }
}
