//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Storage readiness check
//!
//! # Auth
//! GET  /register               - Register page
//! POST /register               - Register action (redirects to /login)
//! GET  /login                  - Login page
//! POST /login                  - Login action (redirects to /productpage)
//! POST /logout                 - Logout action (redirects to /login)
//!
//! # Products (requires login)
//! GET  /productpage            - Catalog with ?search=&category=&sort=&page=
//!
//! # Cart (requires login, redirects back to /productpage)
//! POST /cart/add               - Add one unit
//! POST /cart/remove            - Remove a line
//! POST /cart/update            - Set a line's quantity
//! POST /cart/clear             - Empty the cart
//!
//! *                            - Redirect to /register
//! ```

pub mod auth;
pub mod cart;
pub mod products;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/update", post(cart::update))
        .route("/clear", post(cart::clear))
}

/// Create all page routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .route("/productpage", get(products::index))
        .nest("/cart", cart_routes())
        .fallback(fallback)
}

/// Unknown paths land on the registration page.
async fn fallback() -> Redirect {
    Redirect::to("/register")
}
