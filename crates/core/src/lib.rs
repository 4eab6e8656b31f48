//! Domain core for the Real Coop listings backend.
//!
//! Holds the pure parts of the property record schema: enumerations,
//! default values, field validation and slug derivation. Nothing in here
//! touches the database or the network, so it is shared by the `db` and
//! `api` crates alike.

pub mod error;
pub mod paging;
pub mod property;
pub mod slug;
pub mod types;
