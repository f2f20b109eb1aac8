//! Product page: search, category filter, sort and pagination against a
//! fake catalog.
//!
//! Run with: `cargo test -p pocketshop-integration-tests --test storefront_catalog`

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use pocketshop_integration_tests::{TestApp, body_text};

/// Render the product page as a logged-in user.
async fn product_page(app: &TestApp, query: &str) -> String {
    let uri = if query.is_empty() {
        "/productpage".to_string()
    } else {
        format!("/productpage?{query}")
    };
    let response = app.get(&uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_text(response).await
}

/// Byte offset of a product card title in the page.
fn title_position(html: &str, title: &str) -> usize {
    html.find(&format!("<h2>{title}</h2>")).unwrap()
}

#[tokio::test]
async fn test_first_page_shows_five_products() {
    let app = TestApp::new().await;
    app.login_as("alice").await;

    let html = product_page(&app, "").await;

    assert!(html.contains("<p>12 products</p>"));
    for title in [
        "Essence Mascara Lash Princess",
        "Eyeshadow Palette with Mirror",
        "Powder Canister",
        "Red Lipstick",
        "Red Nail Polish",
    ] {
        assert!(html.contains(&format!("<h2>{title}</h2>")), "missing {title}");
    }
    assert!(!html.contains("<h2>Calvin Klein CK One</h2>"));
    assert!(html.contains(r#"aria-current="page">1</span>"#));
    assert!(html.contains(">Next</a>"));
    assert!(!html.contains(">Previous</a>"));
}

#[tokio::test]
async fn test_last_page_holds_remainder() {
    let app = TestApp::new().await;
    app.login_as("alice").await;

    let html = product_page(&app, "page=3").await;

    assert!(html.contains("<h2>Apple</h2>"));
    assert!(html.contains("<h2>Beef Steak</h2>"));
    assert!(!html.contains("<h2>Essence Mascara Lash Princess</h2>"));
    assert!(html.contains(">Previous</a>"));
    assert!(!html.contains(">Next</a>"));
}

#[tokio::test]
async fn test_page_past_end_is_clamped() {
    let app = TestApp::new().await;
    app.login_as("alice").await;

    let html = product_page(&app, "page=99").await;

    assert!(html.contains(r#"aria-current="page">3</span>"#));
    assert!(html.contains("<h2>Apple</h2>"));
}

#[tokio::test]
async fn test_search_matches_title_ignoring_case() {
    let app = TestApp::new().await;
    app.login_as("alice").await;

    let html = product_page(&app, "search=RED").await;

    assert!(html.contains("<p>2 products</p>"));
    assert!(html.contains("<h2>Red Lipstick</h2>"));
    assert!(html.contains("<h2>Red Nail Polish</h2>"));
    assert!(!html.contains("<h2>Powder Canister</h2>"));
    // A single page needs no pagination
    assert!(!html.contains("Pagination"));
}

#[tokio::test]
async fn test_search_matches_category() {
    let app = TestApp::new().await;
    app.login_as("alice").await;

    let html = product_page(&app, "search=furn").await;

    assert!(html.contains("<p>3 products</p>"));
    assert!(html.contains("<h2>Annibale Colombo Bed</h2>"));
    assert!(html.contains("<h2>Annibale Colombo Sofa</h2>"));
    assert!(html.contains("<h2>Bedside Table African Cherry</h2>"));
}

#[tokio::test]
async fn test_search_without_matches() {
    let app = TestApp::new().await;
    app.login_as("alice").await;

    let html = product_page(&app, "search=zzz").await;

    assert!(html.contains("No products found."));
}

#[tokio::test]
async fn test_category_filter() {
    let app = TestApp::new().await;
    app.login_as("alice").await;

    let html = product_page(&app, "category=fragrances").await;

    assert!(html.contains("<p>2 products</p>"));
    assert!(html.contains("<h2>Calvin Klein CK One</h2>"));
    assert!(html.contains("<h2>Chanel Coco Noir Eau De</h2>"));
    assert!(html.contains(r#"<option value="fragrances" selected>"#));
}

#[tokio::test]
async fn test_sort_high_to_low() {
    let app = TestApp::new().await;
    app.login_as("alice").await;

    let html = product_page(&app, "sort=high-to-low").await;

    let sofa = title_position(&html, "Annibale Colombo Sofa");
    let bed = title_position(&html, "Annibale Colombo Bed");
    let table = title_position(&html, "Bedside Table African Cherry");
    assert!(sofa < bed && bed < table);
    assert!(!html.contains("<h2>Apple</h2>"));
}

#[tokio::test]
async fn test_sort_low_to_high_keeps_catalog_order_for_ties() {
    let app = TestApp::new().await;
    app.login_as("alice").await;

    let html = product_page(&app, "sort=low-to-high").await;

    // Apple 1.99, Red Nail Polish 8.99, Essence 9.99, then the two 12.99s
    let apple = title_position(&html, "Apple");
    let polish = title_position(&html, "Red Nail Polish");
    let lipstick = title_position(&html, "Red Lipstick");
    let steak = title_position(&html, "Beef Steak");
    assert!(apple < polish);
    assert!(polish < lipstick);
    assert!(lipstick < steak);
}

#[tokio::test]
async fn test_sorted_last_page_holds_most_expensive() {
    let app = TestApp::new().await;
    app.login_as("alice").await;

    let html = product_page(&app, "sort=low-to-high&page=3").await;

    // 12 products, 5 per page: page 3 holds the two priciest
    let bed = title_position(&html, "Annibale Colombo Bed");
    let sofa = title_position(&html, "Annibale Colombo Sofa");
    assert!(bed < sofa);
    assert_eq!(html.matches("<h2>").count() - html.matches("<h2>Cart</h2>").count(), 2);
    assert!(!html.contains("<h2>Bedside Table African Cherry</h2>"));
    assert!(!html.contains("<h2>Apple</h2>"));
    assert!(html.contains(r#"aria-current="page">3</span>"#));
}

#[tokio::test]
async fn test_unknown_sort_and_bad_page_fall_back() {
    let app = TestApp::new().await;
    app.login_as("alice").await;

    let html = product_page(&app, "sort=sideways&page=abc").await;

    assert!(html.contains("<p>12 products</p>"));
    assert!(html.contains("<h2>Essence Mascara Lash Princess</h2>"));
}

#[tokio::test]
async fn test_catalog_failure_shows_notice() {
    let app = TestApp::with_failing_catalog(503).await;
    app.login_as("alice").await;

    let html = product_page(&app, "").await;

    assert!(html.contains(r#"class="notice""#));
    assert!(html.contains("No products found."));
}

#[tokio::test]
async fn test_catalog_is_fetched_once() {
    let app = TestApp::new().await;
    app.login_as("alice").await;

    product_page(&app, "").await;
    product_page(&app, "page=2").await;
    product_page(&app, "search=red").await;

    let requests = app.catalog.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}
