//! Application state shared across handlers.

use std::sync::{Arc, Mutex, PoisonError};

use pocketshop_core::CartState;

use crate::catalog::{CatalogClient, CatalogError};
use crate::config::StorefrontConfig;
use crate::services::AuthService;
use crate::storage::{KeyValueStore, SessionStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It owns the storage handle,
/// the catalog client and the one cart the server models. Configuration is
/// only read at construction.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    storage: Arc<dyn KeyValueStore>,
    catalog: CatalogClient,
    cart: Mutex<CartState>,
}

impl AppState {
    /// Create a new application state with an empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog HTTP client cannot be built.
    pub fn new(
        config: &StorefrontConfig,
        storage: Arc<dyn KeyValueStore>,
    ) -> Result<Self, CatalogError> {
        let catalog = CatalogClient::new(&config.catalog)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                storage,
                catalog,
                cart: Mutex::new(CartState::new()),
            }),
        })
    }

    /// Get a reference to the key-value store.
    #[must_use]
    pub fn storage(&self) -> &dyn KeyValueStore {
        self.inner.storage.as_ref()
    }

    /// Get a reference to the product catalog client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Authentication service over the shared store.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.storage())
    }

    /// Session slot over the shared store.
    #[must_use]
    pub fn sessions(&self) -> SessionStore<'_> {
        SessionStore::new(self.storage())
    }

    /// Run `f` with exclusive access to the cart.
    ///
    /// Cart operations cannot leave the state half-written, so a poisoned
    /// lock is recovered rather than propagated.
    pub fn with_cart<R>(&self, f: impl FnOnce(&mut CartState) -> R) -> R {
        let mut cart = self
            .inner
            .cart
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }

    /// Snapshot of the cart.
    #[must_use]
    pub fn cart(&self) -> CartState {
        self.with_cart(|cart| cart.clone())
    }
}
