//! Logged-in user stored under `loggedInUser`.
//!
//! There is a single session slot per store: presence of the key means
//! someone is logged in, absence means nobody is.

use pocketshop_core::User;

use super::{KeyValueStore, StorageError, keys, read_json, write_json};

/// Access to the current session.
pub struct SessionStore<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> SessionStore<'a> {
    /// Create a session store over `store`.
    #[must_use]
    pub const fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// The logged-in user, if any.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the store cannot be read or the stored
    /// value is not a user record.
    pub fn current(&self) -> Result<Option<User>, StorageError> {
        read_json(self.store, keys::LOGGED_IN_USER)
    }

    /// Record `user` as logged in, replacing any previous session.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the store cannot be written.
    pub fn set(&self, user: &User) -> Result<(), StorageError> {
        write_json(self.store, keys::LOGGED_IN_USER, user)
    }

    /// End the session. Succeeds when nobody is logged in.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the store cannot be written.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(keys::LOGGED_IN_USER)
    }
}
