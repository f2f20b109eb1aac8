//! HTTP middleware for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (recorded on the span and echoed in the response)
//!
//! The route guard is an extractor rather than a layer, so each protected
//! handler states its requirement in its signature.

pub mod auth;
pub mod request_id;

pub use auth::{AuthRejection, GuardState, RequireUser};
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
