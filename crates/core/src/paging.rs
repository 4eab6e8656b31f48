//! Pagination and ordering helpers shared by list endpoints.

use crate::error::CoreError;

/// Default number of listings per page.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Maximum number of listings per page.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Clamp a user-provided limit to `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Sort direction for an [`Ordering`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A caller-requested ordering over a whitelisted column.
///
/// Parsed from the `?ordering=` query syntax: a bare key sorts
/// ascending, a leading `-` sorts descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering {
    pub column: &'static str,
    pub direction: Direction,
}

impl Ordering {
    /// Parse `raw` against `allowed`. Only names in `allowed` ever reach SQL.
    pub fn parse(raw: &str, allowed: &[&'static str]) -> Result<Self, CoreError> {
        let (key, direction) = match raw.strip_prefix('-') {
            Some(rest) => (rest, Direction::Desc),
            None => (raw, Direction::Asc),
        };

        let column = allowed
            .iter()
            .copied()
            .find(|c| *c == key)
            .ok_or_else(|| {
                CoreError::field(
                    "ordering",
                    format!("Unknown ordering '{raw}'. Must be one of: {allowed:?}"),
                )
            })?;

        Ok(Self { column, direction })
    }

    /// Render as an `ORDER BY` body, e.g. `price DESC`.
    pub fn to_sql(self) -> String {
        format!("{} {}", self.column, self.direction.sql())
    }
}
