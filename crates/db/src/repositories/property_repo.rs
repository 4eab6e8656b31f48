//! Repository for the `properties` table.
//!
//! Every write goes through the same pre-save steps: resolve the full field
//! set, validate it, derive the slug from the title and pick a free
//! candidate. The unique index on `slug` is the final arbiter; when a
//! concurrent writer grabs the chosen slug first, the whole step is retried
//! up to [`MAX_SLUG_ATTEMPTS`] times.

use std::collections::HashSet;

use realcoop_core::error::CoreError;
use realcoop_core::property::{AdvertType, PropertyFields, PropertyType};
use realcoop_core::slug::{candidate_prefix, generate_slug, unique_slug};
use realcoop_core::types::DbId;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgExecutor, PgPool, Postgres};

use crate::error::{constraints, violated_constraint, RepoError};
use crate::models::property::{CreateProperty, Property, PropertyFilter, UpdateProperty};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, title, slug, reference_code, description, country, city, \
    postal_code, street_address, property_number, price, tax_rate, plot_area, total_floors, \
    bedrooms, bathrooms, advert_type, property_type, cover_photo, published_status, \
    created_at, updated_at";

/// How many times a write is retried after losing a slug race.
pub const MAX_SLUG_ATTEMPTS: u32 = 8;

type PropertyQuery<'q> = QueryAs<'q, Postgres, Property, PgArguments>;

/// Provides validated CRUD operations for property listings.
pub struct PropertyRepo;

impl PropertyRepo {
    /// Validate and insert a new listing, returning the created row.
    ///
    /// Omitted fields take their defaults. The slug is derived from the
    /// title and disambiguated against every existing listing.
    pub async fn create(pool: &PgPool, input: &CreateProperty) -> Result<Property, RepoError> {
        let fields = input.to_fields();
        fields.validate()?;
        let base = generate_slug(&fields.title);

        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let slug = Self::free_slug(pool, &base, None).await?;
            match Self::insert_row(pool, input.owner_id, &fields, &slug).await {
                Ok(property) => return Ok(property),
                Err(err) if is_slug_collision(&err) => {
                    tracing::warn!(attempt, %slug, "Slug taken concurrently, retrying insert");
                }
                Err(err) => return Err(classify_write_error(err, &fields)),
            }
        }

        Err(slug_attempts_exhausted(&base))
    }

    /// Find a listing by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Property>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM properties WHERE id = $1");
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a listing by its slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Property>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM properties WHERE slug = $1");
        sqlx::query_as::<_, Property>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List listings matching `filter`.
    ///
    /// Rows come back in no particular order unless `filter.ordering` is set.
    pub async fn list(pool: &PgPool, filter: &PropertyFilter) -> Result<Vec<Property>, sqlx::Error> {
        // Ordering columns come from a whitelist, never from raw input.
        let order_by = filter
            .ordering
            .map(|o| format!(" ORDER BY {}, id", o.to_sql()))
            .unwrap_or_default();

        let query = format!(
            "SELECT {COLUMNS} FROM properties
             WHERE ($1::bool IS NULL OR published_status = $1)
               AND ($2::text IS NULL OR advert_type = $2)
               AND ($3::text IS NULL OR property_type = $3)
               AND ($4::uuid IS NULL OR owner_id = $4){order_by}
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(filter.published)
            .bind(filter.advert_type.map(AdvertType::name))
            .bind(filter.property_type.map(PropertyType::name))
            .bind(filter.owner_id)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }

    /// The published-listings view: rows with `published_status = true`.
    ///
    /// Every other part of `filter` (type filters, ordering, paging) still
    /// applies; its `published` field is overridden.
    pub async fn list_published(
        pool: &PgPool,
        filter: &PropertyFilter,
    ) -> Result<Vec<Property>, sqlx::Error> {
        let filter = PropertyFilter {
            published: Some(true),
            ..filter.clone()
        };
        Self::list(pool, &filter).await
    }

    /// Apply a partial update. Only non-`None` fields in `input` are changed.
    ///
    /// The merged record is validated before anything is written and the
    /// slug is re-derived from the resulting title. Returns `None` if no row
    /// with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProperty,
    ) -> Result<Option<Property>, RepoError> {
        let mut base = String::new();

        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let mut tx = pool.begin().await?;

            let query = format!("SELECT {COLUMNS} FROM properties WHERE id = $1 FOR UPDATE");
            let Some(current) = sqlx::query_as::<_, Property>(&query)
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
            else {
                return Ok(None);
            };

            let mut fields = current.fields();
            input.clone().merge_into(&mut fields);
            let fields = fields.normalized();
            fields.validate()?;

            base = generate_slug(&fields.title);
            let slug = Self::free_slug(&mut *tx, &base, Some(id)).await?;

            match Self::update_row(&mut *tx, id, &fields, &slug).await {
                Ok(property) => {
                    tx.commit().await?;
                    return Ok(Some(property));
                }
                Err(err) if is_slug_collision(&err) => {
                    tracing::warn!(attempt, %id, %slug, "Slug taken concurrently, retrying update");
                }
                Err(err) => return Err(classify_write_error(err, &fields)),
            }
        }

        Err(slug_attempts_exhausted(&base))
    }

    /// Permanently delete a listing. Returns `true` if a row was removed.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Pick the smallest free slug candidate for `base`, ignoring the slug
    /// held by `exclude` (the record being updated).
    async fn free_slug<'e, E>(
        executor: E,
        base: &str,
        exclude: Option<DbId>,
    ) -> Result<String, RepoError>
    where
        E: PgExecutor<'e>,
    {
        let taken: Vec<String> = sqlx::query_scalar(
            "SELECT slug FROM properties
             WHERE slug LIKE $1 AND ($2::uuid IS NULL OR id <> $2)",
        )
        .bind(format!("{}%", candidate_prefix(base)))
        .bind(exclude)
        .fetch_all(executor)
        .await?;

        let taken: HashSet<String> = taken.into_iter().collect();
        Ok(unique_slug(base, &taken)?)
    }

    async fn insert_row<'e, E>(
        executor: E,
        owner_id: DbId,
        fields: &PropertyFields,
        slug: &str,
    ) -> Result<Property, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO properties
                (owner_id, title, slug, reference_code, description, country, city,
                 postal_code, street_address, property_number, price, tax_rate, plot_area,
                 total_floors, bedrooms, bathrooms, advert_type, property_type, cover_photo,
                 published_status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                     $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
             RETURNING {COLUMNS}"
        );
        bind_fields(sqlx::query_as::<_, Property>(&query).bind(owner_id), fields, slug)
            .fetch_one(executor)
            .await
    }

    async fn update_row<'e, E>(
        executor: E,
        id: DbId,
        fields: &PropertyFields,
        slug: &str,
    ) -> Result<Property, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE properties SET
                title = $2,
                slug = $3,
                reference_code = $4,
                description = $5,
                country = $6,
                city = $7,
                postal_code = $8,
                street_address = $9,
                property_number = $10,
                price = $11,
                tax_rate = $12,
                plot_area = $13,
                total_floors = $14,
                bedrooms = $15,
                bathrooms = $16,
                advert_type = $17,
                property_type = $18,
                cover_photo = $19,
                published_status = $20
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        bind_fields(sqlx::query_as::<_, Property>(&query).bind(id), fields, slug)
            .fetch_one(executor)
            .await
    }
}

/// Bind `$2..=$20` in the order shared by insert and update.
fn bind_fields<'q>(
    query: PropertyQuery<'q>,
    fields: &'q PropertyFields,
    slug: &'q str,
) -> PropertyQuery<'q> {
    query
        .bind(&fields.title)
        .bind(slug)
        .bind(&fields.reference_code)
        .bind(&fields.description)
        .bind(&fields.country)
        .bind(&fields.city)
        .bind(&fields.postal_code)
        .bind(&fields.street_address)
        .bind(fields.property_number)
        .bind(fields.price)
        .bind(fields.tax_rate)
        .bind(fields.plot_area)
        .bind(fields.total_floors)
        .bind(fields.bedrooms)
        .bind(fields.bathrooms)
        .bind(fields.advert_type.name())
        .bind(fields.property_type.name())
        .bind(&fields.cover_photo)
        .bind(fields.published_status)
}

fn is_slug_collision(err: &sqlx::Error) -> bool {
    violated_constraint(err, constraints::UNIQUE_VIOLATION) == Some(constraints::PROPERTY_SLUG)
}

/// Translate constraint violations callers can act on into domain errors.
fn classify_write_error(err: sqlx::Error, fields: &PropertyFields) -> RepoError {
    if violated_constraint(&err, constraints::UNIQUE_VIOLATION)
        == Some(constraints::PROPERTY_REFERENCE_CODE)
    {
        return CoreError::Conflict(format!(
            "reference_code: a property with reference code '{}' already exists",
            fields.reference_code
        ))
        .into();
    }
    if violated_constraint(&err, constraints::FOREIGN_KEY_VIOLATION)
        == Some(constraints::PROPERTY_OWNER)
    {
        return CoreError::field("owner_id", "Referenced user does not exist").into();
    }
    RepoError::Database(err)
}

fn slug_attempts_exhausted(base: &str) -> RepoError {
    tracing::error!(%base, attempts = MAX_SLUG_ATTEMPTS, "Gave up picking a unique slug");
    CoreError::Internal(format!(
        "Could not reserve a unique slug for '{base}' after {MAX_SLUG_ATTEMPTS} attempts"
    ))
    .into()
}
