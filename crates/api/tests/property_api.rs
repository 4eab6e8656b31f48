//! HTTP-level integration tests for the `/api/v1/properties` endpoints.
//!
//! Uses tower's `ServiceExt::oneshot` to send requests directly to the
//! router without a TCP listener.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_owner, decimal, delete, get, post_json, post_raw, put_json};
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::PgPool;

async fn create(pool: &PgPool, body: serde_json::Value) -> serde_json::Value {
    let response = post_json(common::build_test_app(pool.clone()), "/api/v1/properties", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_returns_201_with_defaults(pool: PgPool) {
    let owner = create_owner(&pool, "agent").await;
    let data = create(&pool, json!({"owner_id": owner, "title": "Casa en Chapinero"})).await;

    assert!(data["id"].is_string());
    assert_eq!(data["owner_id"], owner);
    assert_eq!(data["slug"], "casa-en-chapinero");
    assert_eq!(data["reference_code"], "");
    assert_eq!(data["country"], "CO");
    assert_eq!(data["city"], "Bogota");
    assert_eq!(data["postal_code"], "110111");
    assert_eq!(data["street_address"], "AV68");
    assert_eq!(data["property_number"], 112);
    assert_eq!(decimal(&data["price"]), Decimal::ZERO);
    assert_eq!(decimal(&data["tax_rate"]), Decimal::new(15, 2));
    assert_eq!(decimal(&data["bathrooms"]), Decimal::ONE);
    assert_eq!(data["bedrooms"], 1);
    assert_eq!(data["advert_type"], "For Sale");
    assert_eq!(data["property_type"], "Other");
    assert_eq!(data["published_status"], false);
    assert_eq!(data["cover_photo"], "house_sample.jpg");
    assert_eq!(data["cover_photo_url"], "/media/house_sample.jpg");
    assert!(data["created_at"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_computes_final_price(pool: PgPool) {
    let owner = create_owner(&pool, "agent").await;
    let data = create(
        &pool,
        json!({
            "owner_id": owner,
            "title": "Penthouse",
            "price": "100000.00",
            "property_type": "Apartment",
            "advert_type": "For Rent",
        }),
    )
    .await;

    assert_eq!(decimal(&data["price"]), Decimal::new(100_000, 0));
    assert_eq!(data["final_price"], "115000.00");
    assert_eq!(data["property_type"], "Apartment");
    assert_eq!(data["advert_type"], "For Rent");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_identical_titles_get_suffixed_slugs(pool: PgPool) {
    let owner = create_owner(&pool, "agent").await;
    let mut slugs = Vec::new();
    for _ in 0..3 {
        let data = create(&pool, json!({"owner_id": owner, "title": "Loft Usaquén"})).await;
        slugs.push(data["slug"].as_str().unwrap().to_string());
    }
    assert_eq!(slugs, ["loft-usaquen", "loft-usaquen-2", "loft-usaquen-3"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_invalid_fields_returns_422(pool: PgPool) {
    let owner = create_owner(&pool, "agent").await;
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/properties",
        json!({"owner_id": owner, "title": "Bad", "property_number": 0, "country": "Colombia"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = json["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["country", "property_number"]);

    let app = common::build_test_app(pool);
    let list = body_json(get(app, "/api/v1/properties").await).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_unknown_owner_returns_422(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/properties",
        json!({"owner_id": uuid::Uuid::new_v4(), "title": "Orphan"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["fields"][0]["field"], "owner_id");
}

/// POST a body expected to fail deserialization; returns the single field named.
async fn rejected_field(pool: &PgPool, body: serde_json::Value) -> serde_json::Value {
    let response = post_json(common::build_test_app(pool.clone()), "/api/v1/properties", body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.headers()["content-type"],
        "application/json",
        "rejections must use the JSON error shape"
    );
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let fields = json["fields"].as_array().unwrap();
    assert_eq!(fields.len(), 1);
    fields[0].clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_without_title_names_title(pool: PgPool) {
    let owner = create_owner(&pool, "agent").await;
    let field = rejected_field(&pool, json!({"owner_id": owner})).await;
    assert_eq!(field["field"], "title");
    assert_eq!(field["message"], "Title is required");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_without_owner_names_owner(pool: PgPool) {
    let field = rejected_field(&pool, json!({"title": "Casa"})).await;
    assert_eq!(field["field"], "owner_id");
    assert_eq!(field["message"], "This field is required");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_unknown_advert_type_names_field(pool: PgPool) {
    let owner = create_owner(&pool, "agent").await;
    let field = rejected_field(
        &pool,
        json!({"owner_id": owner, "title": "Casa", "advert_type": "Swap"}),
    )
    .await;
    assert_eq!(field["field"], "advert_type");
    assert!(field["message"].as_str().unwrap().contains("Swap"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_malformed_json_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_raw(
        app,
        "/api/v1/properties",
        "{\"title\": ",
        Some("application/json"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    let app = common::build_test_app(pool);
    let response = post_raw(app, "/api/v1/properties", "{}", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_with_bad_enum_names_field(pool: PgPool) {
    let owner = create_owner(&pool, "agent").await;
    let created = create(&pool, json!({"owner_id": owner, "title": "Casa"})).await;

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/properties/{}", created["id"].as_str().unwrap()),
        json!({"property_type": "Castle"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["fields"][0]["field"], "property_type");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_reference_code_returns_409(pool: PgPool) {
    let owner = create_owner(&pool, "agent").await;
    create(&pool, json!({"owner_id": owner, "title": "A", "reference_code": "RC-1"})).await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/properties",
        json!({"owner_id": owner, "title": "B", "reference_code": "RC-1"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_by_id_and_slug(pool: PgPool) {
    let owner = create_owner(&pool, "agent").await;
    let created = create(&pool, json!({"owner_id": owner, "title": "Finca Cajicá"})).await;
    let id = created["id"].as_str().unwrap();

    let app = common::build_test_app(pool.clone());
    let by_id = body_json(get(app, &format!("/api/v1/properties/{id}")).await).await;
    assert_eq!(by_id["data"]["title"], "Finca Cajicá");

    let app = common::build_test_app(pool);
    let by_slug = body_json(get(app, "/api/v1/properties/slug/finca-cajica").await).await;
    assert_eq!(by_slug["data"]["id"], id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_missing_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/properties/{}", uuid::Uuid::new_v4())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/properties/slug/nothing-here").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_published_view_hides_drafts(pool: PgPool) {
    let owner = create_owner(&pool, "agent").await;
    create(&pool, json!({"owner_id": owner, "title": "Draft"})).await;
    let live = create(
        &pool,
        json!({"owner_id": owner, "title": "Live", "published_status": true}),
    )
    .await;

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/properties/published").await).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], live["id"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_published_view_accepts_ordering(pool: PgPool) {
    let owner = create_owner(&pool, "agent").await;
    for (title, price, published) in [
        ("Low", "100.00", true),
        ("Draft", "500.00", false),
        ("High", "900.00", true),
    ] {
        create(
            &pool,
            json!({"owner_id": owner, "title": title, "price": price, "published_status": published}),
        )
        .await;
    }

    let app = common::build_test_app(pool.clone());
    let json = body_json(
        get(app, "/api/v1/properties/published?ordering=-price&published=false").await,
    )
    .await;
    let titles: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["High", "Low"]);

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/properties/published?ordering=owner_id").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_rejects_malformed_query(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/properties?limit=many").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_and_orders(pool: PgPool) {
    let owner = create_owner(&pool, "agent").await;
    for (title, price, kind) in [
        ("Cheap", "1000.00", "House"),
        ("Pricey", "9000.00", "House"),
        ("Office", "5000.00", "Office"),
    ] {
        create(
            &pool,
            json!({"owner_id": owner, "title": title, "price": price, "property_type": kind}),
        )
        .await;
    }

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, "/api/v1/properties?property_type=House&ordering=-price").await).await;
    let titles: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Pricey", "Cheap"]);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/properties?ordering=price&limit=1&offset=1").await).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["title"], "Office");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_rejects_unknown_ordering(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/properties?ordering=owner_id").await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["fields"][0]["field"], "ordering");
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_rederives_slug(pool: PgPool) {
    let owner = create_owner(&pool, "agent").await;
    create(&pool, json!({"owner_id": owner, "title": "Penthouse"})).await;
    let other = create(&pool, json!({"owner_id": owner, "title": "Studio"})).await;
    let id = other["id"].as_str().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/v1/properties/{id}"),
        json!({"title": "Penthouse", "bedrooms": 3}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["slug"], "penthouse-2");
    assert_eq!(data["bedrooms"], 3);

    // Unchanged title keeps the slug.
    let app = common::build_test_app(pool);
    let data = body_json(
        put_json(app, &format!("/api/v1/properties/{id}"), json!({"city": "Cali"})).await,
    )
    .await["data"]
        .clone();
    assert_eq!(data["slug"], "penthouse-2");
    assert_eq!(data["city"], "Cali");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_update_leaves_record_untouched(pool: PgPool) {
    let owner = create_owner(&pool, "agent").await;
    let created = create(&pool, json!({"owner_id": owner, "title": "Casa"})).await;
    let id = created["id"].as_str().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/v1/properties/{id}"),
        json!({"title": "Renamed", "property_number": -3}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let app = common::build_test_app(pool);
    let data = body_json(get(app, &format!("/api/v1/properties/{id}")).await).await["data"].clone();
    assert_eq!(data["title"], "Casa");
    assert_eq!(data["slug"], "casa");
    assert_eq!(data["property_number"], 112);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/properties/{}", uuid::Uuid::new_v4()),
        json!({"title": "Ghost"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_api_has_no_delete(pool: PgPool) {
    let owner = create_owner(&pool, "agent").await;
    let created = create(&pool, json!({"owner_id": owner, "title": "Keep"})).await;
    let id = created["id"].as_str().unwrap();

    let app = common::build_test_app(pool);
    let response = delete(app, &format!("/api/v1/properties/{id}")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
