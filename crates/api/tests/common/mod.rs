#![allow(dead_code)]

use std::path::PathBuf;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use url::Url;

use flixhub_api::auth::jwt::JwtConfig;
use flixhub_api::auth::password::hash_password;
use flixhub_api::config::ServerConfig;
use flixhub_api::router::build_app_router;
use flixhub_api::state::AppState;
use flixhub_api::storage::StorageConfig;
use flixhub_core::roles::{ROLE_ADMIN, ROLE_USER};
use flixhub_db::models::user::{CreateUser, User};
use flixhub_db::repositories::{RoleRepo, UserRepo};

/// Password given to every user created through [`create_user`].
pub const TEST_PASSWORD: &str = "s3cret-pass";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uploads go to a fresh directory under the system temp dir and are capped
/// at 1 KiB for images and 4 KiB for videos. SMTP is disabled.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        frontend_url: Url::parse("http://localhost:5173").unwrap(),
        password_reset_expiry_mins: 60,
        storage: StorageConfig {
            root: test_storage_root(),
            public_base_url: "/media".to_string(),
            max_image_bytes: 1024,
            max_video_bytes: 4096,
        },
        email: None,
        bootstrap_admin: None,
    }
}

fn test_storage_root() -> PathBuf {
    std::env::temp_dir().join(format!("flixhub-test-{}", uuid::Uuid::new_v4()))
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// Goes through [`build_app_router`] so integration tests exercise the same
/// middleware stack that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState::new(pool, config.clone());
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

/// POST with no body, e.g. `/subscriptions/{id}/cancel`.
pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Account helpers
// ---------------------------------------------------------------------------

/// Insert a user with the given role directly through the repository.
pub async fn create_user(pool: &PgPool, username: &str, role: &str) -> User {
    let role_id = RoleRepo::find_by_name(pool, role)
        .await
        .unwrap()
        .expect("role should be seeded")
        .id;
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@flixhub.test"),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            first_name: None,
            last_name: None,
            role_id,
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Log in through the API and return the full auth response.
pub async fn login(pool: &PgPool, email: &str, password: &str) -> serde_json::Value {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/auth/login",
        serde_json::json!({ "email": email, "password": password }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

/// Create a user with `role`, log in and return `(user, access_token)`.
pub async fn user_with_token(pool: &PgPool, username: &str, role: &str) -> (User, String) {
    let user = create_user(pool, username, role).await;
    let json = login(pool, &user.email, TEST_PASSWORD).await;
    let token = json["access_token"].as_str().unwrap().to_string();
    (user, token)
}

pub async fn admin_token(pool: &PgPool) -> String {
    user_with_token(pool, "admin", ROLE_ADMIN).await.1
}

pub async fn viewer_token(pool: &PgPool, username: &str) -> (User, String) {
    user_with_token(pool, username, ROLE_USER).await
}
