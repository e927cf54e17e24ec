//! Account endpoints and bearer authentication

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{test_app, MockChain, ScriptedLlm};
use serde_json::json;

fn app() -> common::TestApp {
    test_app(ScriptedLlm::default(), MockChain::default())
}

#[tokio::test]
async fn test_health_check() {
    let (status, body) = app().get("/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "smart-contract-intelligence-api");
}

#[tokio::test]
async fn test_register_returns_public_user() {
    let app = app();
    let (status, user) = app
        .post_json(
            "/api/users/register",
            json!({"email": "a@x.io", "username": "alice", "password": "pw", "full_name": "Alice"}),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["id"], "user_1");
    assert_eq!(user["username"], "alice");
    assert_eq!(user["full_name"], "Alice");
    assert_eq!(user["is_active"], true);
    assert!(user["wallet_address"].is_null());
    assert!(user.get("hashed_password").is_none());
}

#[tokio::test]
async fn test_register_rejects_duplicates() {
    let app = app();
    app.signup("alice").await;

    let (status, body) = app
        .post_json(
            "/api/users/register",
            json!({"email": "alice@example.com", "username": "other", "password": "pw"}),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already registered");
    assert_eq!(body["error"], "400");

    let (status, body) = app
        .post_json(
            "/api/users/register",
            json!({"email": "new@example.com", "username": "alice", "password": "pw"}),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Username already taken");
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = app();
    app.signup("alice").await;

    let (status, body) = app
        .post_json(
            "/api/users/login",
            json!({"email": "alice@example.com", "password": "wrong"}),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Incorrect email or password");
}

#[tokio::test]
async fn test_token_form_login() {
    let app = app();
    app.signup("alice").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/users/token")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("username=alice%40example.com&password=pa55word"))
        .unwrap();
    let (status, token) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(token["token_type"], "bearer");

    let (status, me) = app
        .get("/api/users/me", token["access_token"].as_str())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "alice@example.com");
}

#[tokio::test]
async fn test_me_requires_valid_token() {
    let app = app();

    let (status, body) = app.get("/api/users/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Could not validate credentials");

    let (status, _) = app.get("/api/users/me", Some("not.a.token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Signed with the right key but for a user that does not exist
    let orphan = scip_api::auth::create_access_token(
        "user_99",
        scip_api::config::DEFAULT_SECRET_KEY,
        5,
    )
    .unwrap();
    let (status, _) = app.get("/api/users/me", Some(&orphan)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_connect_wallet() {
    let app = app();
    let token = app.signup("alice").await;

    let (status, user) = app
        .post_json(
            "/api/users/wallet?wallet_address=0xabc",
            json!({}),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["wallet_address"], "0xabc");

    let (_, me) = app.get("/api/users/me", Some(&token)).await;
    assert_eq!(me["wallet_address"], "0xabc");
}
