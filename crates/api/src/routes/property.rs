//! Route definitions for the `/properties` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::property;
use crate::state::AppState;

/// Routes mounted at `/properties`.
///
/// ```text
/// GET    /                -> list
/// POST   /                -> create
/// GET    /published       -> list_published
/// GET    /slug/{slug}     -> get_by_slug
/// GET    /{id}            -> get_by_id
/// PUT    /{id}            -> update
/// ```
///
/// Deletion is only exposed by the admin console ([`super::admin`]).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(property::list).post(property::create))
        .route("/published", get(property::list_published))
        .route("/slug/{slug}", get(property::get_by_slug))
        .route("/{id}", get(property::get_by_id).put(property::update))
}
