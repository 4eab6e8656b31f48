//! Route definitions for the administrative console.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Console routes mounted at the absolute prefix `/{path}`.
///
/// ```text
/// GET    /{path}/                    -> index
/// GET    /{path}/properties          -> list_properties
/// GET    /{path}/properties/{id}     -> get_property
/// PUT    /{path}/properties/{id}     -> update_property
/// DELETE /{path}/properties/{id}     -> delete_property
/// ```
///
/// The index answers both with and without the trailing slash.
pub fn router(path: &str) -> Router<AppState> {
    let base = format!("/{}", path.trim_matches('/'));

    Router::new()
        .route(&base, get(admin::index))
        .route(&format!("{base}/"), get(admin::index))
        .route(&format!("{base}/properties"), get(admin::list_properties))
        .route(
            &format!("{base}/properties/{{id}}"),
            get(admin::get_property)
                .put(admin::update_property)
                .delete(admin::delete_property),
        )
}
