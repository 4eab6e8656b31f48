//! Shared query parameter types for API handlers.

use realcoop_core::paging::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Limit clamped to `[1, MAX_PAGE_LIMIT]`.
    pub fn limit(&self) -> i64 {
        clamp_limit(self.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT)
    }

    /// Offset clamped to non-negative.
    pub fn offset(&self) -> i64 {
        clamp_offset(self.offset)
    }
}
