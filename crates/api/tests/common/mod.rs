#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use prisma_api::auth::bootstrap::provision_initial_passwords;
use prisma_api::auth::password::hash_password;
use prisma_api::config::ServerConfig;
use prisma_api::engine::MaturityService;
use prisma_api::middleware::auth::USER_EMAIL_HEADER;
use prisma_api::router::build_app_router;
use prisma_api::state::AppState;
use prisma_core::catalog::ActivityCatalog;
use prisma_core::types::DbId;
use prisma_core::validation::DEFAULT_MAX_UPLOAD_BYTES;
use prisma_db::models::user::{CreateUser, User};
use prisma_db::repositories::{OrganizationRepo, ProfileRepo, UserRepo};
use sqlx::SqlitePool;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@cge.mt.gov.br";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const USER_PASSWORD: &str = "senha123";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(upload_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        database_url: "sqlite::memory:".to_string(),
        upload_dir: upload_dir.to_path_buf(),
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        catalog_path: None,
        admin_initial_password: ADMIN_PASSWORD.to_string(),
    }
}

/// Build the full application router over `pool` with the fallback
/// catalog. The seeded administrator gets [`ADMIN_PASSWORD`].
pub async fn build_test_app(pool: SqlitePool) -> Router {
    let upload_dir: PathBuf = std::env::temp_dir().join("prisma-api-tests");
    build_test_app_with_uploads(pool, &upload_dir).await
}

pub async fn build_test_app_with_uploads(pool: SqlitePool, upload_dir: &Path) -> Router {
    let config = test_config(upload_dir);
    provision_initial_passwords(&pool, &config.admin_initial_password)
        .await
        .expect("provisioning should succeed");

    let catalog = Arc::new(ActivityCatalog::fallback());
    let state = AppState {
        maturity: Arc::new(MaturityService::new(pool.clone(), catalog)),
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn organization_id(pool: &SqlitePool, abbreviation: &str) -> DbId {
    OrganizationRepo::list(pool)
        .await
        .unwrap()
        .into_iter()
        .find(|o| o.abbreviation == abbreviation)
        .unwrap_or_else(|| panic!("organization {abbreviation} should be seeded"))
        .id
}

pub async fn profile_id(pool: &SqlitePool, name: &str) -> DbId {
    ProfileRepo::find_by_name(pool, name)
        .await
        .unwrap()
        .unwrap_or_else(|| panic!("profile {name} should be seeded"))
        .id
}

/// Insert a user with [`USER_PASSWORD`].
pub async fn create_user(
    pool: &SqlitePool,
    email: &str,
    profile: &str,
    organization: Option<&str>,
) -> User {
    let organization_id = match organization {
        Some(abbreviation) => Some(organization_id(pool, abbreviation).await),
        None => None,
    };
    let input = CreateUser {
        email: email.to_string(),
        name: format!("Usuário {email}"),
        profile_id: profile_id(pool, profile).await,
        organization_id,
        password_hash: hash_password(USER_PASSWORD).unwrap(),
    };
    UserRepo::create(pool, &input).await.unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    email: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(email) = email {
        builder = builder.header(USER_EMAIL_HEADER, email);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_as(app: Router, uri: &str, email: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(email), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_as(
    app: Router,
    uri: &str,
    email: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(email), Some(body)).await
}

pub async fn put_json_as(
    app: Router,
    uri: &str,
    email: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(email), Some(body)).await
}

pub async fn delete_as(app: Router, uri: &str, email: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(email), None).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
