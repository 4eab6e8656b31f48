pub mod admin;
pub mod health;
pub mod property;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /properties                          create, list
///   /published                         published listings
///   /slug/{slug}                       fetch by slug
///   /{id}                              get, update
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/properties", property::router())
}
