//! Pocketshop Core - Shared types library.
//!
//! This crate provides the types used across all Pocketshop components:
//! - `storefront` - The single-user storefront server
//! - `cli` - Command-line access to the same local storage
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O,
//! no storage access, no HTTP clients. This keeps it lightweight and allows
//! it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices and emails, plus
//!   the `Product` and `User` records
//! - [`cart`] - The cart engine (`CartState`)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{CartItem, CartState};
pub use types::*;
