//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Registration, login and logout over the local store
//!
//! The cart needs no service of its own: handlers call
//! [`pocketshop_core::CartState`] directly through [`crate::state::AppState`].

pub mod auth;

pub use auth::{AuthError, AuthService};
