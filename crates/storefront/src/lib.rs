//! Pocketshop Storefront library.
//!
//! A single-user storefront: registration and login against a local
//! key-value store, a product page backed by a remote catalog, and a cart.
//! The binary in `main.rs` serves [`create_app`]; the CLI and the
//! integration tests use the same modules directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;

use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    routing::get,
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::storage::keys;

/// Build the full application router.
///
/// Sentry layers are added by the binary, outside this router.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the storage backend cannot be read.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.storage().get(keys::REGISTERED_USERS) {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "storage not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
