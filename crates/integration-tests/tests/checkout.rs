//! Integration tests for the simulated checkout.
//!
//! Run with: cargo test -p vira-integration-tests

use axum::http::StatusCode;
use serde_json::{Value, json};
use vira_integration_tests::TestApp;

fn order_form() -> Value {
    json!({
        "email": "jana@vira.cz",
        "first_name": "Jana",
        "last_name": "Nováková",
        "address": "Náměstí 1",
        "city": "Brno",
        "zip": "602 00",
        "payment": "wallet"
    })
}

// =============================================================================
// Empty Cart
// =============================================================================

#[tokio::test]
async fn test_empty_cart_redirects_home() {
    let mut app = TestApp::new();

    let response = app.get("/checkout").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));

    let response = app.post("/checkout", &order_form()).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
}

// =============================================================================
// Pricing
// =============================================================================

#[tokio::test]
async fn test_preview_charges_shipping_up_to_threshold() {
    let mut app = TestApp::new();
    // 2 x 2490 = 4980
    app.post("/cart/add", &json!({ "product_id": "t2", "quantity": 2 }))
        .await;

    let body = app.get("/checkout").await.json();
    assert_eq!(body["pricing"]["subtotal"], 4980);
    assert_eq!(body["pricing"]["shipping"], 129);
    assert_eq!(body["pricing"]["total"], 5109);
    assert_eq!(body["payment_methods"], json!(["card", "wallet"]));
}

#[tokio::test]
async fn test_preview_ships_free_above_threshold() {
    let mut app = TestApp::new();
    // 4500 + 590 = 5090
    app.post("/cart/add", &json!({ "product_id": "s2" })).await;
    app.post("/cart/add", &json!({ "product_id": "h3" })).await;

    let body = app.get("/checkout").await.json();
    assert_eq!(body["pricing"]["shipping"], 0);
    assert_eq!(body["pricing"]["total"], 5090);
}

// =============================================================================
// Submit
// =============================================================================

#[tokio::test]
async fn test_blank_field_is_rejected_and_cart_kept() {
    let mut app = TestApp::new();
    app.post("/cart/add", &json!({ "product_id": "b4" })).await;

    let mut form = order_form();
    form["city"] = json!("  ");
    let response = app.post("/checkout", &form).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "Bad request: city is required");
    assert_eq!(app.get("/cart/count").await.json()["count"], 1);
}

#[tokio::test]
async fn test_order_is_confirmed_and_cart_cleared() {
    let mut app = TestApp::new();
    app.post("/cart/add", &json!({ "product_id": "b4", "quantity": 2 }))
        .await;

    let response = app.post("/checkout", &order_form()).await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    assert!(
        body["order_number"]
            .as_str()
            .is_some_and(|n| n.starts_with("VIRA-"))
    );
    assert_eq!(body["contact"]["email"], "jana@vira.cz");
    assert_eq!(body["payment"], "wallet");
    assert_eq!(body["delivery"], "courier");
    assert_eq!(body["cart"]["item_count"], 2);
    assert_eq!(body["pricing"]["total"], 2400 + 129);

    assert_eq!(app.get("/cart/count").await.json()["count"], 0);
}
