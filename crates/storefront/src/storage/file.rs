//! JSON-file storage backend.
//!
//! The whole store is one JSON object mapping keys to string values. The
//! file is the only copy: every operation re-reads it, so the server and the
//! CLI see each other's writes. Changes go to a sibling temp file which is
//! then renamed over the original, so a crash mid-write leaves the previous
//! contents intact.
//!
//! Operations through one [`FileStore`] are serialized by its lock. Two
//! processes writing at the same moment can still lose one of the writes.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, instrument};

use super::{KeyValueStore, StorageError, ValueUpdate};

type Entries = BTreeMap<String, String>;

/// Key-value store persisted to a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Open the store at `path`, creating parent directories as needed.
    ///
    /// A missing file is treated as an empty store; it is created on the
    /// first write.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the file exists but cannot be read or the
    /// parent directory cannot be created, and `StorageError::Corrupt` if it
    /// does not contain a JSON object of strings.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let store = Self {
            path,
            lock: Mutex::new(()),
        };
        let entries = store.load()?;
        debug!(keys = entries.len(), "storage file checked");

        Ok(store)
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>, StorageError> {
        self.lock.lock().map_err(|_| StorageError::Poisoned)
    }

    /// Current file contents. Missing or blank means empty.
    fn load(&self) -> Result<Entries, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(Entries::new()),
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
                path: self.path.clone(),
                source,
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Entries::new()),
            Err(source) => Err(StorageError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn persist(&self, entries: &Entries) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(entries).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        // Unique per write so two processes never share a temp file.
        let tmp = self
            .path
            .with_extension(format!("json.{}.tmp", uuid::Uuid::new_v4().simple()));
        fs::write(&tmp, raw).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| {
            let _ = fs::remove_file(&tmp);
            StorageError::Io {
                path: self.path.clone(),
                source,
            }
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.guard()?;
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.guard()?;
        let mut entries = self.load()?;
        entries.insert(key.to_owned(), value.to_owned());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.guard()?;
        let mut entries = self.load()?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&entries)
    }

    fn update(&self, key: &str, apply: &mut ValueUpdate<'_>) -> Result<(), StorageError> {
        let _guard = self.guard()?;
        let mut entries = self.load()?;
        let Some(value) = apply(entries.get(key).cloned())? else {
            return Ok(());
        };
        entries.insert(key.to_owned(), value);
        self.persist(&entries)
    }
}
