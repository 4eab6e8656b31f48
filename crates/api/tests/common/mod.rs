#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use realcoop_api::config::{AdminSiteConfig, MediaConfig, ServerConfig};
use realcoop_api::router::build_app_router;
use realcoop_api::state::AppState;
use realcoop_db::models::user::CreateUser;
use realcoop_db::repositories::UserRepo;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout and the default admin labels. Media is
/// served from `media_root`.
pub fn test_config(media_root: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: String::new(),
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        media: MediaConfig {
            root: media_root,
            ..MediaConfig::default()
        },
        admin: AdminSiteConfig::default(),
    }
}

/// Build the full application router through [`build_app_router`], so
/// integration tests exercise the production routes and middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config(std::env::temp_dir()))
}

/// Same as [`build_test_app`] with an explicit configuration.
pub fn build_test_app_with(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Insert a user who can own listings.
pub async fn create_owner(pool: &PgPool, username: &str) -> String {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@realcoop.test"),
        },
    )
    .await
    .unwrap()
    .id
    .to_string()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, Body::empty(), None).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, Body::empty(), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(
        app,
        Method::POST,
        uri,
        Body::from(body.to_string()),
        Some("application/json"),
    )
    .await
}

/// POST a raw body, with an optional content type.
pub async fn post_raw(
    app: Router,
    uri: &str,
    body: &'static str,
    content_type: Option<&str>,
) -> Response {
    send(app, Method::POST, uri, Body::from(body), content_type).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(
        app,
        Method::PUT,
        uri,
        Body::from(body.to_string()),
        Some("application/json"),
    )
    .await
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Body,
    content_type: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Parse a decimal serialized as a JSON string.
pub fn decimal(value: &serde_json::Value) -> rust_decimal::Decimal {
    value.as_str().unwrap().parse().unwrap()
}

/// Collect a response body as raw bytes.
pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}
