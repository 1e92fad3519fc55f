//! HTTP-level integration tests for registration, login, refresh, logout,
//! lockout, and RBAC enforcement.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_test_user, get_auth, mint_token, post_json, post_json_auth,
    ROLE_ID_ADMIN, ROLE_ID_CREATOR,
};
use sqlx::PgPool;

/// Log in a user via the API and return the JSON response.
async fn login_user(app: axum::Router, username: &str, password: &str) -> serde_json::Value {
    let body = serde_json::json!({ "username": username, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Registration creates a creator account and returns tokens.
#[sqlx::test(migrations = "../db/migrations")]
async fn register_creates_creator(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "username": "newpublisher",
        "email": "newpublisher@test.com",
        "password": "a-long-enough-password",
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["user"]["username"], "newpublisher");
    // Self-registration never yields anything but the creator role.
    assert_eq!(json["user"]["role"], "creator");
}

/// Passwords shorter than 12 characters are rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn register_rejects_short_password(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "username": "shortpw",
        "email": "shortpw@test.com",
        "password": "tooshort",
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// A taken username surfaces the unique constraint as 409.
#[sqlx::test(migrations = "../db/migrations")]
async fn register_duplicate_username_conflicts(pool: PgPool) {
    let (_user, _password) = create_test_user(&pool, "taken", ROLE_ID_CREATOR).await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "username": "taken",
        "email": "other@test.com",
        "password": "a-long-enough-password",
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Successful login returns tokens and user info.
#[sqlx::test(migrations = "../db/migrations")]
async fn login_success(pool: PgPool) {
    let (user, password) = create_test_user(&pool, "loginuser", ROLE_ID_CREATOR).await;
    let app = common::build_test_app(pool);

    let json = login_user(app, "loginuser", &password).await;

    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert!(json["expires_in"].is_number());
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["role"], "creator");
}

/// Wrong password returns 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn login_wrong_password(pool: PgPool) {
    let (_user, _password) = create_test_user(&pool, "wrongpw", ROLE_ID_CREATOR).await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "username": "wrongpw", "password": "incorrect" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Five consecutive failures lock the account; the next attempt with the
/// CORRECT password is still refused.
#[sqlx::test(migrations = "../db/migrations")]
async fn login_lockout_after_failures(pool: PgPool) {
    let (_user, password) = create_test_user(&pool, "lockme", ROLE_ID_CREATOR).await;

    for _ in 0..5 {
        let app = common::build_test_app(pool.clone());
        let body = serde_json::json!({ "username": "lockme", "password": "bad-guess" });
        let response = post_json(app, "/api/v1/auth/login", body).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "username": "lockme", "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Refresh & logout
// ---------------------------------------------------------------------------

/// A valid refresh token rotates into a new token pair.
#[sqlx::test(migrations = "../db/migrations")]
async fn token_refresh_rotates(pool: PgPool) {
    let (_user, password) = create_test_user(&pool, "refresher", ROLE_ID_CREATOR).await;

    let app = common::build_test_app(pool.clone());
    let login_json = login_user(app, "refresher", &password).await;
    let refresh_token = login_json["refresh_token"].as_str().unwrap();

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_ne!(
        json["refresh_token"].as_str().unwrap(),
        refresh_token,
        "refresh token must rotate on use"
    );
}

/// A rotated (already-used) refresh token is dead.
#[sqlx::test(migrations = "../db/migrations")]
async fn used_refresh_token_is_revoked(pool: PgPool) {
    let (_user, password) = create_test_user(&pool, "reuser", ROLE_ID_CREATOR).await;

    let app = common::build_test_app(pool.clone());
    let login_json = login_user(app, "reuser", &password).await;
    let refresh_token = login_json["refresh_token"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Second use of the same token must fail.
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Logout revokes all sessions and returns 204.
#[sqlx::test(migrations = "../db/migrations")]
async fn logout_revokes_sessions(pool: PgPool) {
    let (_user, password) = create_test_user(&pool, "logoutuser", ROLE_ID_CREATOR).await;

    let app = common::build_test_app(pool.clone());
    let login_json = login_user(app, "logoutuser", &password).await;
    let access_token = login_json["access_token"].as_str().unwrap().to_string();
    let refresh_token = login_json["refresh_token"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool.clone());
    let response =
        post_json_auth(app, "/api/v1/auth/logout", serde_json::json!({}), &access_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The refresh token must be unusable afterwards.
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// RBAC
// ---------------------------------------------------------------------------

/// Protected routes reject missing and malformed tokens with 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn protected_route_requires_token(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = common::get(app, "/api/v1/newsletters").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/newsletters", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Creators cannot reach the admin surface; the role claim is the only
/// thing consulted.
#[sqlx::test(migrations = "../db/migrations")]
async fn admin_routes_reject_creators(pool: PgPool) {
    let (creator, _password) = create_test_user(&pool, "plaincreator", ROLE_ID_CREATOR).await;
    let token = mint_token(creator.id, "creator");

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/admin/newsletters", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Admins pass the RBAC gate.
#[sqlx::test(migrations = "../db/migrations")]
async fn admin_routes_allow_admins(pool: PgPool) {
    let (admin, _password) = create_test_user(&pool, "realadmin", ROLE_ID_ADMIN).await;
    let token = mint_token(admin.id, "admin");

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/admin/newsletters", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}
