//! Repository error type.

use realcoop_core::error::CoreError;

/// Constraint and error-code names the repositories translate into domain errors.
pub mod constraints {
    pub const PROPERTY_SLUG: &str = "uq_properties_slug";
    pub const PROPERTY_REFERENCE_CODE: &str = "uq_properties_reference_code";
    pub const PROPERTY_OWNER: &str = "fk_properties_owner";

    /// PostgreSQL `unique_violation`.
    pub const UNIQUE_VIOLATION: &str = "23505";
    /// PostgreSQL `foreign_key_violation`.
    pub const FOREIGN_KEY_VIOLATION: &str = "23503";
}

/// Error returned by repositories that validate before writing.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Domain-level failure (validation, conflict, exhausted slug retries).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Any other database failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Name of the constraint behind a database error with the given SQLSTATE.
pub(crate) fn violated_constraint<'a>(err: &'a sqlx::Error, code: &str) -> Option<&'a str> {
    match err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(code) => {
            db_err.constraint()
        }
        _ => None,
    }
}
