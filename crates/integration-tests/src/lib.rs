//! Integration tests for Pocketshop.
//!
//! The storefront router is driven in-process with `tower::ServiceExt::oneshot`
//! against an in-memory store, and the remote product catalog is replaced by
//! a `wiremock` server serving a fixed listing.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pocketshop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_auth` - Registration, login, logout and the route guard
//! - `storefront_catalog` - Search, category, sort and pagination
//! - `storefront_cart` - Cart actions and totals

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pocketshop_storefront::config::StorefrontConfig;
use pocketshop_storefront::create_app;
use pocketshop_storefront::state::AppState;
use pocketshop_storefront::storage::MemoryStore;

/// Password used by [`TestApp::login_as`].
pub const TEST_PASSWORD: &str = "password1";

/// A running storefront router with its state and fake catalog.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub catalog: MockServer,
}

impl TestApp {
    /// Storefront backed by the twelve-product fixture catalog.
    pub async fn new() -> Self {
        let catalog = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture_products()))
            .mount(&catalog)
            .await;
        Self::with_catalog(catalog)
    }

    /// Storefront whose catalog always answers with `status`.
    pub async fn with_failing_catalog(status: u16) -> Self {
        let catalog = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&catalog)
            .await;
        Self::with_catalog(catalog)
    }

    fn with_catalog(catalog: MockServer) -> Self {
        let catalog_url = format!("{}/products", catalog.uri());
        let config = StorefrontConfig::from_lookup(|key| {
            (key == "CATALOG_URL").then(|| catalog_url.clone())
        })
        .unwrap();

        let state = AppState::new(&config, Arc::new(MemoryStore::new())).unwrap();
        let router = create_app(state.clone());

        Self {
            router,
            state,
            catalog,
        }
    }

    /// Send a GET request.
    pub async fn get(&self, uri: &str) -> Response<Body> {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Send a form POST.
    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)]) -> Response<Body> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Register a user through the form.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Response<Body> {
        self.post_form(
            "/register",
            &[
                ("username", username),
                ("email", email),
                ("password", password),
            ],
        )
        .await
    }

    /// Log in through the form.
    pub async fn login(&self, email: &str, password: &str) -> Response<Body> {
        self.post_form("/login", &[("email", email), ("password", password)])
            .await
    }

    /// Register `username` (email `<username>@example.com`) and log in.
    pub async fn login_as(&self, username: &str) {
        let email = format!("{username}@example.com");
        self.register(username, &email, TEST_PASSWORD).await;
        let response = self.login(&email, TEST_PASSWORD).await;
        assert_eq!(location(&response), "/productpage");
    }
}

/// The `Location` header of a redirect.
pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Collect a response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Twelve products across four categories, in catalog order.
pub fn fixture_products() -> Value {
    let products = [
        (1, "Essence Mascara Lash Princess", "9.99", "beauty"),
        (2, "Eyeshadow Palette with Mirror", "19.99", "beauty"),
        (3, "Powder Canister", "14.99", "beauty"),
        (4, "Red Lipstick", "12.99", "beauty"),
        (5, "Red Nail Polish", "8.99", "beauty"),
        (6, "Calvin Klein CK One", "49.99", "fragrances"),
        (7, "Chanel Coco Noir Eau De", "129.99", "fragrances"),
        (8, "Annibale Colombo Bed", "1899.99", "furniture"),
        (9, "Annibale Colombo Sofa", "2499.99", "furniture"),
        (10, "Bedside Table African Cherry", "299.99", "furniture"),
        (11, "Apple", "1.99", "groceries"),
        (12, "Beef Steak", "12.99", "groceries"),
    ];

    let products: Vec<Value> = products
        .iter()
        .map(|(id, title, price, category)| {
            json!({
                "id": id,
                "title": title,
                "description": format!("{title} description"),
                "category": category,
                "price": price.parse::<f64>().unwrap(),
                "thumbnail": format!("https://cdn.example.com/{id}/thumbnail.webp"),
                "images": [format!("https://cdn.example.com/{id}/1.webp")],
            })
        })
        .collect();

    json!({ "products": products, "total": 12, "skip": 0, "limit": 30 })
}
