//! Handlers for the `/properties` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use realcoop_core::error::CoreError;
use realcoop_core::paging::Ordering;
use realcoop_core::property::{AdvertType, PropertyType};
use realcoop_core::types::DbId;
use realcoop_db::models::property::{
    CreateProperty, Property, PropertyFilter, UpdateProperty, ORDERABLE_COLUMNS,
};
use realcoop_db::repositories::PropertyRepo;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::MediaConfig;
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppQuery};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response / query types
// ---------------------------------------------------------------------------

/// A listing as returned over HTTP: the stored row plus derived values.
#[derive(Debug, Serialize)]
pub struct PropertyResponse {
    #[serde(flatten)]
    pub property: Property,
    /// Price including tax.
    pub final_price: Decimal,
    /// Public URL of the cover photo.
    pub cover_photo_url: String,
}

impl PropertyResponse {
    pub fn new(property: Property, media: &MediaConfig) -> Self {
        Self {
            final_price: property.final_price(),
            cover_photo_url: media.url_for(&property.cover_photo),
            property,
        }
    }
}

/// Query parameters for `GET /api/v1/properties`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub published: Option<bool>,
    pub advert_type: Option<AdvertType>,
    pub property_type: Option<PropertyType>,
    pub owner_id: Option<DbId>,
    /// Column name, `-` prefix for descending (e.g. `-price`).
    pub ordering: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListParams {
    /// Validate and convert into a repository filter.
    pub fn into_filter(self) -> Result<PropertyFilter, CoreError> {
        let ordering = self
            .ordering
            .as_deref()
            .map(|raw| Ordering::parse(raw, ORDERABLE_COLUMNS))
            .transpose()?;
        let page = PaginationParams {
            limit: self.limit,
            offset: self.offset,
        };
        Ok(PropertyFilter {
            published: self.published,
            advert_type: self.advert_type,
            property_type: self.property_type,
            owner_id: self.owner_id,
            ordering,
            limit: page.limit(),
            offset: page.offset(),
        })
    }
}

pub(crate) fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Property",
        id,
    })
}

pub(crate) fn to_responses(rows: Vec<Property>, media: &MediaConfig) -> Vec<PropertyResponse> {
    rows.into_iter()
        .map(|p| PropertyResponse::new(p, media))
        .collect()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/properties
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateProperty>,
) -> AppResult<(StatusCode, Json<DataResponse<PropertyResponse>>)> {
    let property = PropertyRepo::create(&state.pool, &input).await?;
    tracing::info!(id = %property.id, slug = %property.slug, "Property created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: PropertyResponse::new(property, &state.config.media),
        }),
    ))
}

/// GET /api/v1/properties
pub async fn list(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> AppResult<Json<DataResponse<Vec<PropertyResponse>>>> {
    let filter = params.into_filter()?;
    let rows = PropertyRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse {
        data: to_responses(rows, &state.config.media),
    }))
}

/// GET /api/v1/properties/published
///
/// Accepts the same parameters as the full listing; `published` is ignored.
pub async fn list_published(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> AppResult<Json<DataResponse<Vec<PropertyResponse>>>> {
    let filter = params.into_filter()?;
    let rows = PropertyRepo::list_published(&state.pool, &filter).await?;
    Ok(Json(DataResponse {
        data: to_responses(rows, &state.config.media),
    }))
}

/// GET /api/v1/properties/{id}
pub async fn get_by_id(
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

/// GET /api/v1/properties/slug/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<PropertyResponse>>> {
    let property = PropertyRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Property with slug '{slug}' not found")))?;
    Ok(Json(DataResponse {
        data: PropertyResponse::new(property, &state.config.media),
    }))
}

/// PUT /api/v1/properties/{id}
///
/// Partial update; the slug is re-derived from the resulting title.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateProperty>,
) -> AppResult<Json<DataResponse<PropertyResponse>>> {
    let property = PropertyRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(id = %property.id, slug = %property.slug, "Property updated");
    Ok(Json(DataResponse {
        data: PropertyResponse::new(property, &state.config.media),
    }))
}
