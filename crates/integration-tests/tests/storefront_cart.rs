//! Cart actions through the storefront forms.
//!
//! Run with: `cargo test -p pocketshop-integration-tests --test storefront_cart`

#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Response, StatusCode};
use pocketshop_core::ProductId;
use pocketshop_integration_tests::{TestApp, body_text, location};
use rust_decimal::Decimal;

async fn add(app: &TestApp, product_id: &str) -> Response<Body> {
    app.post_form("/cart/add", &[("product_id", product_id)])
        .await
}

async fn update(app: &TestApp, product_id: &str, quantity: &str) -> Response<Body> {
    app.post_form(
        "/cart/update",
        &[("product_id", product_id), ("quantity", quantity)],
    )
    .await
}

/// Mascara twice and a steak: 2 x 9.99 + 12.99.
async fn fill_cart(app: &TestApp) {
    add(app, "1").await;
    add(app, "1").await;
    add(app, "12").await;
}

#[tokio::test]
async fn test_cart_requires_login() {
    let app = TestApp::new().await;

    let response = add(&app, "1").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    assert!(app.state.cart().is_empty());
}

#[tokio::test]
async fn test_add_merges_repeated_products() {
    let app = TestApp::new().await;
    app.login_as("alice").await;

    let response = add(&app, "1").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/productpage");

    add(&app, "1").await;
    add(&app, "12").await;

    let cart = app.state.cart();
    assert_eq!(cart.line_count(), 2);
    assert_eq!(cart.total_quantity(), 3);
    assert_eq!(cart.total_price(), Decimal::new(3297, 2));
    assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity, 2);
    assert!(cart.is_consistent());
}

#[tokio::test]
async fn test_cart_totals_render_on_product_page() {
    let app = TestApp::new().await;
    app.login_as("alice").await;
    fill_cart(&app).await;

    let html = body_text(app.get("/productpage").await).await;

    assert!(html.contains("Items: 3"));
    assert!(html.contains("Total: ₹32.97"));
    assert!(html.contains("₹9.99 &times; 2 = ₹19.98"));
    assert!(!html.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_add_unknown_product_is_not_found() {
    let app = TestApp::new().await;
    app.login_as("alice").await;

    let response = add(&app, "999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(app.state.cart().is_empty());
}

#[tokio::test]
async fn test_add_with_failing_catalog_changes_nothing() {
    let app = TestApp::with_failing_catalog(500).await;
    app.login_as("alice").await;

    let response = add(&app, "1").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(app.state.cart().is_empty());
}

#[tokio::test]
async fn test_update_sets_quantity() {
    let app = TestApp::new().await;
    app.login_as("alice").await;
    fill_cart(&app).await;

    let response = update(&app, "1", "5").await;
    assert_eq!(location(&response), "/productpage");

    let cart = app.state.cart();
    assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity, 5);
    assert_eq!(cart.total_quantity(), 6);
    assert_eq!(cart.total_price(), Decimal::new(6294, 2));
    assert!(cart.is_consistent());
}

#[tokio::test]
async fn test_update_to_zero_removes_line() {
    let app = TestApp::new().await;
    app.login_as("alice").await;
    fill_cart(&app).await;

    update(&app, "1", "0").await;

    let cart = app.state.cart();
    assert!(cart.get(ProductId::new(1)).is_none());
    assert_eq!(cart.line_count(), 1);
    assert_eq!(cart.total_price(), Decimal::new(1299, 2));
}

#[tokio::test]
async fn test_update_missing_line_is_ignored() {
    let app = TestApp::new().await;
    app.login_as("alice").await;
    fill_cart(&app).await;
    let before = app.state.cart();

    let response = update(&app, "7", "3").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(app.state.cart(), before);
}

#[tokio::test]
async fn test_remove_drops_whole_line() {
    let app = TestApp::new().await;
    app.login_as("alice").await;
    fill_cart(&app).await;

    let response = app
        .post_form("/cart/remove", &[("product_id", "1")])
        .await;
    assert_eq!(location(&response), "/productpage");

    let cart = app.state.cart();
    assert!(cart.get(ProductId::new(1)).is_none());
    assert_eq!(cart.total_quantity(), 1);
    assert_eq!(cart.total_price(), Decimal::new(1299, 2));
    assert!(cart.is_consistent());
}

#[tokio::test]
async fn test_clear_empties_cart() {
    let app = TestApp::new().await;
    app.login_as("alice").await;
    fill_cart(&app).await;

    let response = app.post_form("/cart/clear", &[]).await;
    assert_eq!(location(&response), "/productpage");

    let cart = app.state.cart();
    assert!(cart.is_empty());
    assert_eq!(cart.total_quantity(), 0);
    assert_eq!(cart.total_price(), Decimal::ZERO);

    let html = body_text(app.get("/productpage").await).await;
    assert!(html.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_return_to_keeps_product_page_state() {
    let app = TestApp::new().await;
    app.login_as("alice").await;

    let response = app
        .post_form(
            "/cart/add",
            &[("product_id", "6"), ("return_to", "/productpage?search=red&page=2")],
        )
        .await;
    assert_eq!(location(&response), "/productpage?search=red&page=2");

    let response = app
        .post_form(
            "/cart/add",
            &[("product_id", "6"), ("return_to", "https://evil.example.com/")],
        )
        .await;
    assert_eq!(location(&response), "/productpage");
}

#[tokio::test]
async fn test_return_to_with_control_character_falls_back() {
    let app = TestApp::new().await;
    app.login_as("alice").await;

    let response = app
        .post_form(
            "/cart/add",
            &[("product_id", "6"), ("return_to", "/productpage?a=\u{1}")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/productpage");
    assert_eq!(app.state.cart().total_quantity(), 1);
}

#[tokio::test]
async fn test_cart_survives_logout() {
    let app = TestApp::new().await;
    app.login_as("alice").await;
    fill_cart(&app).await;

    app.post_form("/logout", &[]).await;
    app.login_as("bob").await;

    assert_eq!(app.state.cart().total_quantity(), 3);
}
