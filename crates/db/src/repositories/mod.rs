//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod property_repo;
pub mod user_repo;

pub use property_repo::PropertyRepo;
pub use user_repo::UserRepo;
