//! HTTP client for the product catalog.

use std::sync::Arc;

use moka::future::Cache;
use serde::Deserialize;
use tracing::{debug, error, instrument};
use url::Url;

use pocketshop_core::{Product, ProductId};

use super::CatalogError;
use crate::config::CatalogConfig;

/// Cache key for catalog responses.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
enum CacheKey {
    AllProducts,
}

/// Response envelope; pagination fields are ignored.
#[derive(Debug, Deserialize)]
struct ProductListing {
    products: Vec<Product>,
}

/// Client for the external product catalog.
///
/// Successful fetches are cached for the configured TTL. Failures are never
/// cached, so the next request retries.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    endpoint: Url,
    cache: Cache<CacheKey, Arc<[Product]>>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Network` if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("pocketshop/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(8)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                endpoint: config.url.clone(),
                cache,
            }),
        })
    }

    /// The endpoint products are fetched from.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Every product, from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the catalog cannot be fetched.
    pub async fn products(&self) -> Result<Arc<[Product]>, CatalogError> {
        if let Some(products) = self.inner.cache.get(&CacheKey::AllProducts).await {
            debug!(count = products.len(), "Cache hit for products");
            return Ok(products);
        }

        let products: Arc<[Product]> = self.fetch_products().await?.into();

        self.inner
            .cache
            .insert(CacheKey::AllProducts, Arc::clone(&products))
            .await;

        Ok(products)
    }

    /// Look up one product by id.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the catalog cannot be fetched.
    pub async fn product(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        Ok(self
            .products()
            .await?
            .iter()
            .find(|product| product.id == id)
            .cloned())
    }

    /// Drop the cached listing so the next call refetches.
    pub fn invalidate(&self) {
        self.inner.cache.invalidate_all();
    }

    /// Fetch the listing, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Network` on transport failure,
    /// `CatalogError::Status` on a non-success status and
    /// `CatalogError::Parse` if the body is not a product listing.
    #[instrument(skip(self), fields(endpoint = %self.inner.endpoint))]
    pub async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        let response = self
            .inner
            .client
            .get(self.inner.endpoint.clone())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog returned non-success status"
            );
            return Err(CatalogError::Status(status.as_u16()));
        }

        let listing: ProductListing = serde_json::from_str(&body).map_err(|e| {
            error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })?;

        debug!(count = listing.products.len(), "Fetched catalog");
        Ok(listing.products)
    }
}
