//! Request handlers.
//!
//! Handlers delegate to the repositories in `realcoop_db` and map errors via
//! [`AppError`](crate::error::AppError).

pub mod admin;
pub mod property;
