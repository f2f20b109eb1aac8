//! Product catalog.
//!
//! The catalog comes from a public demo API that returns every product in
//! one response:
//!
//! ```json
//! {"products": [{"id": 1, "title": "...", "price": 9.99, "category": "beauty", "images": [...]}], "total": 194}
//! ```
//!
//! [`CatalogClient`] fetches and caches that list; [`CatalogQuery`] filters,
//! sorts and paginates it in memory for the product page.

mod client;
mod view;

pub use client::CatalogClient;
pub use view::{CatalogPage, CatalogQuery, PAGE_SIZE, SortOrder, categories};

use thiserror::Error;

/// Errors that can occur while fetching the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request could not be sent or the body could not be read.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The catalog answered with a non-success status.
    #[error("catalog returned HTTP {0}")]
    Status(u16),

    /// The body was not a product listing.
    #[error("invalid catalog response: {0}")]
    Parse(#[from] serde_json::Error),
}
