//! Registered-user list stored under `registeredUsers`.

use pocketshop_core::{Email, User};

use super::{KeyValueStore, StorageError, decode_json, encode_json, keys, read_json};

/// Access to the persisted list of registered users.
///
/// The list is append-only and keeps registration order. An absent key
/// reads as an empty list.
pub struct UserRegistry<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> UserRegistry<'a> {
    /// Create a registry over `store`.
    #[must_use]
    pub const fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Every registered user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the store cannot be read or the stored
    /// list is not valid JSON.
    pub fn all(&self) -> Result<Vec<User>, StorageError> {
        Ok(read_json(self.store, keys::REGISTERED_USERS)?.unwrap_or_default())
    }

    /// Append `user` unless its email is already registered, ignoring case.
    ///
    /// The check and the append happen in one store update, so two
    /// registrations racing on the same email cannot both land.
    ///
    /// Returns `false`, leaving the list untouched, if the email is taken.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the list cannot be read or written.
    pub fn append_unique(&self, user: User) -> Result<bool, StorageError> {
        let mut pending = Some(user);
        let mut appended = false;

        self.store.update(keys::REGISTERED_USERS, &mut |current| {
            let Some(user) = pending.take() else {
                return Ok(None);
            };
            let mut users: Vec<User> = current
                .map(|raw| decode_json(keys::REGISTERED_USERS, &raw))
                .transpose()?
                .unwrap_or_default();

            if users.iter().any(|u| u.email.matches_ignore_case(&user.email)) {
                return Ok(None);
            }

            users.push(user);
            appended = true;
            encode_json(keys::REGISTERED_USERS, &users).map(Some)
        })?;

        Ok(appended)
    }

    /// The first user whose email and password both match exactly.
    ///
    /// # Errors
    ///
    /// Same as [`UserRegistry::all`].
    pub fn find_by_credentials(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Option<User>, StorageError> {
        Ok(self
            .all()?
            .into_iter()
            .find(|user| user.has_credentials(email, password)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn user(username: &str, email: &str, password: &str) -> User {
        User {
            username: username.to_string(),
            email: Email::parse(email).unwrap(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_absent_key_is_empty_list() {
        let store = MemoryStore::new();
        let registry = UserRegistry::new(&store);

        assert!(registry.all().unwrap().is_empty());
    }

    #[test]
    fn test_append_keeps_order() {
        let store = MemoryStore::new();
        let registry = UserRegistry::new(&store);

        assert!(registry.append_unique(user("alice", "a@x.com", "password1")).unwrap());
        assert!(registry.append_unique(user("bob", "b@x.com", "password2")).unwrap());

        let names: Vec<_> = registry
            .all()
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, ["alice", "bob"]);
    }

    #[test]
    fn test_append_unique_rejects_taken_email() {
        let store = MemoryStore::new();
        let registry = UserRegistry::new(&store);
        registry.append_unique(user("alice", "a@x.com", "password1")).unwrap();

        let appended = registry
            .append_unique(user("alice2", "A@X.COM", "password2"))
            .unwrap();

        assert!(!appended);
        let users = registry.all().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "alice");
    }

    #[test]
    fn test_find_by_credentials() {
        let store = MemoryStore::new();
        let registry = UserRegistry::new(&store);
        registry.append_unique(user("alice", "a@x.com", "password1")).unwrap();

        let email = Email::parse("a@x.com").unwrap();
        let found = registry.find_by_credentials(&email, "password1").unwrap();
        assert_eq!(found.map(|u| u.username).as_deref(), Some("alice"));
        assert!(registry.find_by_credentials(&email, "wrong").unwrap().is_none());
    }

    #[test]
    fn test_reads_list_written_elsewhere() {
        let store = MemoryStore::new();
        store
            .set(
                keys::REGISTERED_USERS,
                r#"[{"username":"carol","email":"c@x.com","password":"hunter22"}]"#,
            )
            .unwrap();

        let users = UserRegistry::new(&store).all().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email.as_str(), "c@x.com");
    }
}
