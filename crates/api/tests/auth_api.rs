//! HTTP-level integration tests for the auth and profile endpoints.
//!
//! Tests cover registration, login, lockout, token refresh, logout,
//! password reset and password change.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{
    body_json, build_test_app, create_user, get, get_auth, login, post_auth, post_json,
    post_json_auth, put_json_auth, viewer_token, TEST_PASSWORD,
};
use flixhub_api::auth::jwt::generate_secret_token;
use flixhub_api::usecases::auth::MAX_FAILED_ATTEMPTS;
use flixhub_core::roles::ROLE_USER;
use flixhub_db::repositories::{PasswordResetRepo, SessionRepo, UserRepo};
use sqlx::PgPool;

fn registration(username: &str) -> serde_json::Value {
    serde_json::json!({
        "username": username,
        "email": format!("{username}@Example.com"),
        "password": "watching4ever",
        "confirm_password": "watching4ever",
        "first_name": "Ada",
    })
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_returns_tokens_and_user_role(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/auth/register", registration("newviewer")).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["token_type"], "Bearer");
    assert_eq!(json["expires_in"], 15 * 60);
    assert_eq!(json["user"]["username"], "newviewer");
    assert_eq!(json["user"]["email"], "newviewer@example.com");
    assert_eq!(json["user"]["role"], ROLE_USER);
    assert!(json["user"].get("password_hash").is_none());

    let user_id = json["user"]["id"].as_i64().unwrap();
    assert_eq!(SessionRepo::count_live_for_user(&pool, user_id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_duplicate_email_is_field_error(pool: PgPool) {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/auth/register",
        registration("first"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let mut again = registration("second");
    again["email"] = "FIRST@example.com".into();
    let response = post_json(build_test_app(pool), "/api/v1/auth/register", again).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["errors"]["email"][0], "Email is already registered");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_reports_every_invalid_field(pool: PgPool) {
    let body = serde_json::json!({
        "username": "x",
        "email": "not-an-email",
        "password": "short",
        "confirm_password": "different",
    });
    let response = post_json(build_test_app(pool), "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let errors = json["errors"].as_object().unwrap();
    for field in ["username", "email", "password", "confirm_password"] {
        assert!(errors.contains_key(field), "missing error for {field}");
    }
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_success_records_last_login(pool: PgPool) {
    let user = create_user(&pool, "loginuser", ROLE_USER).await;

    let json = login(&pool, "LoginUser@flixhub.test", TEST_PASSWORD).await;

    assert_eq!(json["user"]["id"], user.id);
    assert!(json["user"]["last_login_at"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_wrong_password_and_unknown_email_look_alike(pool: PgPool) {
    create_user(&pool, "wrongpw", ROLE_USER).await;

    let wrong = post_json(
        build_test_app(pool.clone()),
        "/api/v1/auth/login",
        serde_json::json!({ "email": "wrongpw@flixhub.test", "password": "nope12345" }),
    )
    .await;
    let unknown = post_json(
        build_test_app(pool),
        "/api/v1/auth/login",
        serde_json::json!({ "email": "ghost@flixhub.test", "password": "nope12345" }),
    )
    .await;

    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(wrong).await["error"], body_json(unknown).await["error"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_deactivated_user_is_forbidden(pool: PgPool) {
    let user = create_user(&pool, "inactive", ROLE_USER).await;
    UserRepo::deactivate(&pool, user.id).await.unwrap();

    let response = post_json(
        build_test_app(pool),
        "/api/v1/auth/login",
        serde_json::json!({ "email": user.email, "password": TEST_PASSWORD }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_repeated_failures_lock_the_account(pool: PgPool) {
    let user = create_user(&pool, "bruteforced", ROLE_USER).await;
    let bad = serde_json::json!({ "email": user.email, "password": "guess12345" });

    for _ in 0..MAX_FAILED_ATTEMPTS {
        let response =
            post_json(build_test_app(pool.clone()), "/api/v1/auth/login", bad.clone()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Even the right password is refused while the lock holds.
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/auth/login",
        serde_json::json!({ "email": user.email, "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let locked = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(locked.locked_until.unwrap() > Utc::now());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_expired_lock_restarts_failure_count(pool: PgPool) {
    let user = create_user(&pool, "returning", ROLE_USER).await;
    let bad = serde_json::json!({ "email": user.email, "password": "guess12345" });

    for _ in 0..MAX_FAILED_ATTEMPTS {
        post_json(build_test_app(pool.clone()), "/api/v1/auth/login", bad.clone()).await;
    }
    UserRepo::lock_account(&pool, user.id, Utc::now() - Duration::minutes(1))
        .await
        .unwrap();

    let response = post_json(build_test_app(pool.clone()), "/api/v1/auth/login", bad).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let after = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(after.failed_login_count, 1);
    assert!(after.locked_until.is_none());

    let json = login(&pool, &user.email, TEST_PASSWORD).await;
    assert!(json["access_token"].is_string());
}

// ---------------------------------------------------------------------------
// Refresh and logout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_rotates_and_old_token_dies(pool: PgPool) {
    let user = create_user(&pool, "refresher", ROLE_USER).await;
    let json = login(&pool, &user.email, TEST_PASSWORD).await;
    let original = json["refresh_token"].as_str().unwrap().to_string();

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": original }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let rotated = body_json(response).await;
    assert_ne!(rotated["refresh_token"].as_str().unwrap(), original);

    let replay = post_json(
        build_test_app(pool),
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": original }),
    )
    .await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_with_garbage_token_is_unauthorized(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": "not-a-real-token" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_revokes_every_session(pool: PgPool) {
    let user = create_user(&pool, "leaver", ROLE_USER).await;
    let first = login(&pool, &user.email, TEST_PASSWORD).await;
    login(&pool, &user.email, TEST_PASSWORD).await;
    assert_eq!(SessionRepo::count_live_for_user(&pool, user.id).await.unwrap(), 2);

    let token = first["access_token"].as_str().unwrap();
    let response = post_auth(build_test_app(pool.clone()), "/api/v1/auth/logout", token).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(SessionRepo::count_live_for_user(&pool, user.id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_without_token_is_unauthorized(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/v1/auth/logout",
        serde_json::json!({}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Password reset
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_forgot_password_is_accepted_for_unknown_email(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/v1/auth/forgot-password",
        serde_json::json!({ "email": "nobody@flixhub.test" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_forgot_password_issues_a_token(pool: PgPool) {
    let user = create_user(&pool, "forgetful", ROLE_USER).await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/auth/forgot-password",
        serde_json::json!({ "email": user.email }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let (outstanding,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM password_reset_tokens WHERE user_id = $1 AND used_at IS NULL",
    )
    .bind(user.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(outstanding, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reset_password_is_single_use(pool: PgPool) {
    let user = create_user(&pool, "resetter", ROLE_USER).await;
    login(&pool, &user.email, TEST_PASSWORD).await;
    let (token, token_hash) = generate_secret_token();
    PasswordResetRepo::issue(&pool, user.id, &token_hash, Utc::now() + Duration::minutes(30))
        .await
        .unwrap();

    let body = serde_json::json!({
        "email": user.email,
        "token": token,
        "new_password": "brandnew42",
        "confirm_password": "brandnew42",
    });
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/auth/reset-password",
        body.clone(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Existing sessions are gone and the new password works.
    assert_eq!(SessionRepo::count_live_for_user(&pool, user.id).await.unwrap(), 0);
    login(&pool, &user.email, "brandnew42").await;

    let replay = post_json(build_test_app(pool), "/api/v1/auth/reset-password", body).await;
    assert_eq!(replay.status(), StatusCode::BAD_REQUEST);
    let json = body_json(replay).await;
    assert_eq!(json["errors"]["token"][0], "Reset token is invalid or has expired");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reset_password_rejects_expired_token(pool: PgPool) {
    let user = create_user(&pool, "latecomer", ROLE_USER).await;
    let (token, token_hash) = generate_secret_token();
    PasswordResetRepo::issue(&pool, user.id, &token_hash, Utc::now() - Duration::minutes(1))
        .await
        .unwrap();

    let response = post_json(
        build_test_app(pool),
        "/api/v1/auth/reset-password",
        serde_json::json!({
            "email": user.email,
            "token": token,
            "new_password": "brandnew42",
            "confirm_password": "brandnew42",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_profile_requires_token(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/v1/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_profile_and_read_it_back(pool: PgPool) {
    let (_user, token) = viewer_token(&pool, "profiled").await;

    let response = put_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/me",
        serde_json::json!({ "first_name": "Grace", "avatar_url": "https://cdn.test/a.png" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get_auth(build_test_app(pool), "/api/v1/me", &token).await).await;
    assert_eq!(json["first_name"], "Grace");
    assert_eq!(json["avatar_url"], "https://cdn.test/a.png");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_change_password_checks_current_password(pool: PgPool) {
    let (user, token) = viewer_token(&pool, "changer").await;

    let wrong = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/me/change-password",
        serde_json::json!({
            "current_password": "not-it-123",
            "new_password": "evenbetter9",
            "confirm_password": "evenbetter9",
        }),
        &token,
    )
    .await;
    assert_eq!(wrong.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(wrong).await["errors"]["current_password"].is_array());

    let right = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/me/change-password",
        serde_json::json!({
            "current_password": TEST_PASSWORD,
            "new_password": "evenbetter9",
            "confirm_password": "evenbetter9",
        }),
        &token,
    )
    .await;
    assert_eq!(right.status(), StatusCode::NO_CONTENT);
    assert_eq!(SessionRepo::count_live_for_user(&pool, user.id).await.unwrap(), 0);
    login(&pool, &user.email, "evenbetter9").await;
}
