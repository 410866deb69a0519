//! Integration tests for the health check, shop listing and product pages.
//!
//! Run with: cargo test -p vira-integration-tests

use axum::http::StatusCode;
use serde_json::Value;
use vira_integration_tests::TestApp;

fn ids(listing: &Value) -> Vec<String> {
    listing["products"]
        .as_array()
        .map(|products| {
            products
                .iter()
                .filter_map(|p| p["id"].as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let mut app = TestApp::new();
    let response = app.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_upstream_request_id_is_echoed() {
    let mut app = TestApp::new();
    let response = app
        .request(
            axum::http::Method::GET,
            "/health",
            None,
            &[("x-request-id", "edge-1234")],
        )
        .await;

    assert_eq!(
        response.headers.get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("edge-1234")
    );
}

// =============================================================================
// Shop
// =============================================================================

#[tokio::test]
async fn test_shop_lists_whole_catalog_by_default() {
    let mut app = TestApp::new();
    let response = app.get("/shop").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["count"], 13);
    assert_eq!(body["title"], "Všechny produkty");
    assert_eq!(ids(&body).len(), 13);
}

#[tokio::test]
async fn test_shop_price_range() {
    let mut app = TestApp::new();
    let body = app.get("/shop?min_price=1000&max_price=3000").await.json();

    let mut found = ids(&body);
    found.sort();
    assert_eq!(found, ["b1", "b2", "b4", "s1", "t2"]);
}

#[tokio::test]
async fn test_shop_category_preselection_by_label() {
    let mut app = TestApp::new();
    let body = app.get("/shop?category=Dopl%C5%88ky").await.json();

    let mut found = ids(&body);
    found.sort();
    assert_eq!(found, ["h1", "h2", "h3", "h4"]);
}

#[tokio::test]
async fn test_shop_combines_color_and_category() {
    let mut app = TestApp::new();
    let body = app.get("/shop?categories=men&colors=white").await.json();

    let mut found = ids(&body);
    found.sort();
    assert_eq!(found, ["s1", "t1"]);
}

#[tokio::test]
async fn test_shop_ignores_unknown_color() {
    let mut app = TestApp::new();
    let body = app.get("/shop?colors=ultraviolet").await.json();

    assert_eq!(body["count"], 13);
}

// =============================================================================
// Product Detail
// =============================================================================

#[tokio::test]
async fn test_product_detail() {
    let mut app = TestApp::new();
    let response = app.get("/products/t1").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["product"]["name"], "Essential Tee");
    assert_eq!(body["default_size"], "S");
    let related = body["related"].as_array().map_or(0, Vec::len);
    assert!(related <= 4);
}

#[tokio::test]
async fn test_unknown_product_redirects_to_shop() {
    let mut app = TestApp::new();
    let response = app.get("/products/zz").await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/shop"));
}
