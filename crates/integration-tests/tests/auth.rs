//! Integration tests for the mocked sign-in flow.
//!
//! Run with: cargo test -p vira-integration-tests

use axum::http::StatusCode;
use serde_json::{Value, json};
use vira_integration_tests::TestApp;

#[tokio::test]
async fn test_anonymous_visitor() {
    let mut app = TestApp::new();
    assert_eq!(app.get("/auth/me").await.json(), Value::Null);
}

#[tokio::test]
async fn test_login_remembers_user() {
    let mut app = TestApp::new();

    let response = app
        .post(
            "/auth/login",
            &json!({ "email": "jana@vira.cz", "password": "whatever" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({ "email": "jana@vira.cz", "name": "Jana" })
    );

    let me = app.get("/auth/me").await.json();
    assert_eq!(me["email"], "jana@vira.cz");
}

#[tokio::test]
async fn test_login_rejects_invalid_email() {
    let mut app = TestApp::new();
    let response = app
        .post("/auth/login", &json!({ "email": "jana" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "Bad request: Invalid email address");
    assert_eq!(app.get("/auth/me").await.json(), Value::Null);
}

#[tokio::test]
async fn test_register_uses_given_name() {
    let mut app = TestApp::new();
    let user = app
        .post(
            "/auth/register",
            &json!({ "name": "Jana Nováková", "email": "jana@vira.cz", "password": "x" }),
        )
        .await
        .json();

    assert_eq!(user["name"], "Jana Nováková");
}

#[tokio::test]
async fn test_logout_keeps_cart() {
    let mut app = TestApp::new();
    app.post("/cart/add", &json!({ "product_id": "t1" })).await;
    app.post("/auth/login", &json!({ "email": "jana@vira.cz" }))
        .await;

    let response = app.post_empty("/auth/logout").await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    assert_eq!(app.get("/auth/me").await.json(), Value::Null);
    assert_eq!(app.get("/cart/count").await.json()["count"], 1);
}
