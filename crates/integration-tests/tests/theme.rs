//! Integration tests for the theme preference.
//!
//! Run with: cargo test -p vira-integration-tests

use axum::http::Method;
use vira_integration_tests::TestApp;

const DARK_HINT: &[(&str, &str)] = &[("sec-ch-prefers-color-scheme", "dark")];

#[tokio::test]
async fn test_defaults_to_light() {
    let mut app = TestApp::new();
    let response = app.get("/theme").await;

    assert_eq!(response.json()["theme"], "light");
    assert_eq!(
        response.headers.get("accept-ch").and_then(|v| v.to_str().ok()),
        Some("Sec-CH-Prefers-Color-Scheme")
    );
}

#[tokio::test]
async fn test_follows_system_preference() {
    let mut app = TestApp::new();
    let response = app.request(Method::GET, "/theme", None, DARK_HINT).await;

    assert_eq!(response.json()["theme"], "dark");
}

#[tokio::test]
async fn test_toggle_is_remembered_over_system_preference() {
    let mut app = TestApp::new();

    let response = app
        .request(Method::POST, "/theme/toggle", None, DARK_HINT)
        .await;
    assert_eq!(response.json()["theme"], "light");

    let response = app.request(Method::GET, "/theme", None, DARK_HINT).await;
    assert_eq!(response.json()["theme"], "light");

    let response = app.post_empty("/theme/toggle").await;
    assert_eq!(response.json()["theme"], "dark");
    assert_eq!(app.get("/theme").await.json()["theme"], "dark");
}
