//! Pagination query parameters.

use hustings_postgres::query::Pagination as QueryPagination;
use serde::{Deserialize, Serialize};

/// `?limit=&offset=` parameters accepted by every listing.
///
/// Out-of-range values are clamped rather than rejected: `limit` to
/// `1..=100`, `offset` to non-negative.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
pub struct Pagination {
    /// Maximum number of records to return, 20 when omitted.
    pub limit: Option<i64>,
    /// Number of records to skip, 0 when omitted.
    pub offset: Option<i64>,
}

impl Pagination {
    /// Returns a [`Pagination`] with both values set.
    #[inline]
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }
}

impl From<Pagination> for QueryPagination {
    fn from(pagination: Pagination) -> Self {
        Self::new(
            pagination.limit.unwrap_or(Self::DEFAULT_LIMIT),
            pagination.offset.unwrap_or(0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_omitted() {
        let pagination = QueryPagination::from(Pagination::default());
        assert_eq!(pagination.limit, 20);
        assert_eq!(pagination.offset, 0);
    }

    #[test]
    fn clamps_out_of_range_values() {
        let pagination = QueryPagination::from(Pagination::new(1_000, -5));
        assert_eq!(pagination.limit, 100);
        assert_eq!(pagination.offset, 0);

        let pagination = QueryPagination::from(Pagination::new(0, 40));
        assert_eq!(pagination.limit, 1);
        assert_eq!(pagination.offset, 40);
    }
}
