//! Handlers for the administrative console mounted under `/{ADMIN_PATH}`.
//!
//! The console is the only place listings can be deleted. Its labels come
//! from [`AdminSiteConfig`](crate::config::AdminSiteConfig).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use realcoop_core::types::DbId;
use realcoop_db::models::property::UpdateProperty;
use realcoop_db::repositories::PropertyRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::extract::{AppJson, AppQuery};
use crate::handlers::property::{not_found, to_responses, ListParams, PropertyResponse};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A model registered with the console.
#[derive(Debug, Serialize)]
pub struct AdminModel {
    pub name: &'static str,
    pub url: String,
}

/// Payload of the console landing page.
#[derive(Debug, Serialize)]
pub struct AdminIndex {
    pub site_header: String,
    pub site_title: String,
    pub index_title: String,
    pub models: Vec<AdminModel>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /{ADMIN_PATH}/
pub async fn index(State(state): State<AppState>) -> Json<DataResponse<AdminIndex>> {
    let admin = &state.config.admin;
    Json(DataResponse {
        data: AdminIndex {
            site_header: admin.site_header.clone(),
            site_title: admin.site_title.clone(),
            index_title: admin.index_title.clone(),
            models: vec![AdminModel {
                name: "Property",
                url: format!("/{}/properties", admin.path),
            }],
        },
    })
}

/// GET /{ADMIN_PATH}/properties
///
/// Same filters as the public listing; published and draft rows alike.
pub async fn list_properties(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> AppResult<Json<DataResponse<Vec<PropertyResponse>>>> {
    let filter = params.into_filter()?;
    let rows = PropertyRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse {
        data: to_responses(rows, &state.config.media),
    }))
}

/// GET /{ADMIN_PATH}/properties/{id}
pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PropertyResponse>>> {
    let property = PropertyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse {
        data: PropertyResponse::new(property, &state.config.media),
    }))
}

/// PUT /{ADMIN_PATH}/properties/{id}
pub async fn update_property(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateProperty>,
) -> AppResult<Json<DataResponse<PropertyResponse>>> {
    let property = PropertyRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(id = %property.id, slug = %property.slug, "Property updated from admin console");
    Ok(Json(DataResponse {
        data: PropertyResponse::new(property, &state.config.media),
    }))
}

/// DELETE /{ADMIN_PATH}/properties/{id}
pub async fn delete_property(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if PropertyRepo::hard_delete(&state.pool, id).await? {
        tracing::info!(%id, "Property deleted from admin console");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
