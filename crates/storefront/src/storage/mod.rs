//! Local key-value storage.
//!
//! The storefront keeps all of its durable state in a small string
//! key-value store, the way a browser app keeps it in local storage:
//!
//! ## Keys
//!
//! - `registeredUsers` - JSON array of every registered [`User`]
//! - `loggedInUser` - the current session's [`User`], absent when logged out
//!
//! There is no schema versioning and no migration; whatever the store
//! contains is the system of record.
//!
//! # Backends
//!
//! - [`FileStore`] - one JSON file on disk (the server and CLI default)
//! - [`MemoryStore`] - process-local map for tests
//!
//! [`User`]: pocketshop_core::User

pub mod file;
pub mod memory;
pub mod session;
pub mod users;

use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use session::SessionStore;
pub use users::UserRegistry;

/// Storage keys.
pub mod keys {
    /// Key holding the registered-user list.
    pub const REGISTERED_USERS: &str = "registeredUsers";

    /// Key holding the logged-in user.
    pub const LOGGED_IN_USER: &str = "loggedInUser";
}

/// Errors raised by storage backends and the typed helpers.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file is not a JSON object of strings.
    #[error("storage file {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A stored value could not be decoded or a value could not be encoded.
    #[error("invalid JSON under key {key}: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A thread panicked while holding the store lock.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// A string key-value store.
///
/// This is the only capability the user registry and session store need:
/// get, set and remove by key. Implementations must be `Send + Sync` so a
/// single store can be shared across axum handlers.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Read-modify-write the value under `key` without another writer on
    /// this store in between.
    ///
    /// `apply` receives the current value and returns the replacement, or
    /// `None` to leave the key as it is.
    ///
    /// # Errors
    ///
    /// Returns the error from `apply`, or a `StorageError` if the backend
    /// cannot be read or written.
    fn update(&self, key: &str, apply: &mut ValueUpdate<'_>) -> Result<(), StorageError>;
}

/// Closure passed to [`KeyValueStore::update`].
pub type ValueUpdate<'a> =
    dyn FnMut(Option<String>) -> Result<Option<String>, StorageError> + 'a;

/// Decode a raw value stored under `key`.
///
/// # Errors
///
/// Returns `StorageError::Json` if `raw` is not valid JSON for `T`.
pub fn decode_json<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T, StorageError> {
    serde_json::from_str(raw).map_err(|source| StorageError::Json {
        key: key.to_owned(),
        source,
    })
}

/// Encode `value` for storage under `key`.
///
/// # Errors
///
/// Returns `StorageError::Json` if `value` cannot be encoded.
pub fn encode_json<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|source| StorageError::Json {
        key: key.to_owned(),
        source,
    })
}

/// Read and decode the JSON value under `key`.
///
/// # Errors
///
/// Returns `StorageError::Json` if the stored value is not valid JSON for `T`.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    store
        .get(key)?
        .map(|raw| decode_json(key, &raw))
        .transpose()
}

/// Encode `value` as JSON and store it under `key`.
///
/// # Errors
///
/// Returns a `StorageError` if encoding or the write fails.
pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    store.set(key, &encode_json(key, value)?)
}
