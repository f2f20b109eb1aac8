//! Authentication service.
//!
//! Register, login and logout against the local user registry and session
//! slot. Passwords are compared in plain text.

mod error;

pub use error::AuthError;

use tracing::{debug, info, instrument};

use pocketshop_core::{Email, User};

use crate::storage::{KeyValueStore, SessionStore, UserRegistry};

/// Minimum password length, counted after trimming.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRegistry<'a>,
    sessions: SessionStore<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service over `store`.
    #[must_use]
    pub const fn new(store: &'a dyn KeyValueStore) -> Self {
        Self {
            users: UserRegistry::new(store),
            sessions: SessionStore::new(store),
        }
    }

    /// Register a new user.
    ///
    /// All fields are trimmed and the email is lower-cased before it is
    /// stored. Registration does not log the user in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UsernameRequired`, `AuthError::InvalidEmail`,
    /// `AuthError::PasswordRequired` or `AuthError::WeakPassword` if the form
    /// is invalid, and `AuthError::DuplicateEmail` if the email is already
    /// registered (case-insensitively).
    #[instrument(skip(self, username, password))]
    pub fn register(&self, username: &str, email: &str, password: &str) -> Result<User, AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::UsernameRequired);
        }

        let email = Email::normalize(email)?;

        let password = password.trim();
        validate_password(password)?;

        let user = User {
            username: username.to_owned(),
            email,
            password: password.to_owned(),
        };
        if !self.users.append_unique(user.clone())? {
            debug!(email = %user.email, "registration rejected, email taken");
            return Err(AuthError::DuplicateEmail);
        }

        info!(email = %user.email, "user registered");
        Ok(user)
    }

    /// Log in with email and password, replacing any current session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` or `AuthError::PasswordRequired` if
    /// the form is invalid, and `AuthError::InvalidCredentials` if no user
    /// matches. A failed login leaves the current session untouched.
    #[instrument(skip(self, password))]
    pub fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::normalize(email)?;

        let password = password.trim();
        if password.is_empty() {
            return Err(AuthError::PasswordRequired);
        }

        let user = self
            .users
            .find_by_credentials(&email, password)?
            .ok_or(AuthError::InvalidCredentials)?;

        self.sessions.set(&user)?;

        info!(email = %user.email, "user logged in");
        Ok(user)
    }

    /// End the current session. Succeeds when nobody is logged in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the session cannot be cleared.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.sessions.clear()?;
        debug!("session cleared");
        Ok(())
    }

    /// The logged-in user, if any.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the session cannot be read.
    pub fn current_user(&self) -> Result<Option<User>, AuthError> {
        Ok(self.sessions.current()?)
    }

    /// Every registered user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the registry cannot be read.
    pub fn registered_users(&self) -> Result<Vec<User>, AuthError> {
        Ok(self.users.all()?)
    }
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::PasswordRequired);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(MIN_PASSWORD_LENGTH));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Barrier;
    use std::thread;

    use pocketshop_core::EmailError;

    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_register_normalizes_and_does_not_log_in() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);

        let user = auth
            .register("  alice ", " Alice@Example.COM ", " password1 ")
            .unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(user.email.as_str(), "alice@example.com");
        assert_eq!(user.password, "password1");
        assert_eq!(auth.registered_users().unwrap(), vec![user]);
        assert!(auth.current_user().unwrap().is_none());
    }

    #[test]
    fn test_register_duplicate_email_ignores_case() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);

        auth.register("alice", "a@x.com", "password1").unwrap();
        let err = auth.register("bob", "A@X.COM", "password2").unwrap_err();

        assert!(matches!(err, AuthError::DuplicateEmail));
        assert_eq!(err.code(), "email_taken");
        assert_eq!(auth.registered_users().unwrap().len(), 1);
    }

    #[test]
    fn test_register_validation() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);

        assert!(matches!(
            auth.register("   ", "a@x.com", "password1"),
            Err(AuthError::UsernameRequired)
        ));
        assert!(matches!(
            auth.register("alice", "not-an-email", "password1"),
            Err(AuthError::InvalidEmail(EmailError::MissingAtSymbol))
        ));
        assert!(matches!(
            auth.register("alice", "a@x.com", "   "),
            Err(AuthError::PasswordRequired)
        ));
        assert!(matches!(
            auth.register("alice", "a@x.com", " short7 "),
            Err(AuthError::WeakPassword(8))
        ));
        assert!(auth.registered_users().unwrap().is_empty());
    }

    #[test]
    fn test_login_sets_session() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);
        auth.register("alice", "a@x.com", "password1").unwrap();

        let user = auth.login(" A@x.com", "password1 ").unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(auth.current_user().unwrap(), Some(user));
    }

    #[test]
    fn test_failed_login_keeps_prior_session() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);
        auth.register("alice", "a@x.com", "password1").unwrap();
        auth.register("bob", "b@x.com", "password2").unwrap();
        auth.login("a@x.com", "password1").unwrap();

        let err = auth.login("b@x.com", "wrong-password").unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(err.code(), "credentials");
        assert_eq!(
            auth.current_user().unwrap().map(|u| u.username).as_deref(),
            Some("alice")
        );
    }

    #[test]
    fn test_login_replaces_session() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);
        auth.register("alice", "a@x.com", "password1").unwrap();
        auth.register("bob", "b@x.com", "password2").unwrap();

        auth.login("a@x.com", "password1").unwrap();
        auth.login("b@x.com", "password2").unwrap();

        assert_eq!(
            auth.current_user().unwrap().map(|u| u.username).as_deref(),
            Some("bob")
        );
    }

    #[test]
    fn test_login_password_is_case_sensitive() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);
        auth.register("alice", "a@x.com", "password1").unwrap();

        assert!(matches!(
            auth.login("a@x.com", "PASSWORD1"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("a@x.com", ""),
            Err(AuthError::PasswordRequired)
        ));
    }

    #[test]
    fn test_logout_without_session_succeeds() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);

        auth.logout().unwrap();
        assert!(auth.current_user().unwrap().is_none());
    }

    #[test]
    fn test_logout_clears_session() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);
        auth.register("alice", "a@x.com", "password1").unwrap();
        auth.login("a@x.com", "password1").unwrap();

        auth.logout().unwrap();

        assert!(auth.current_user().unwrap().is_none());
        assert_eq!(auth.registered_users().unwrap().len(), 1);
    }

    #[test]
    fn test_concurrent_registrations_keep_email_unique() {
        let store = MemoryStore::new();
        let barrier = Barrier::new(2);

        let results: Vec<_> = thread::scope(|scope| {
            let handles: Vec<_> = ["alice", "alicia"]
                .into_iter()
                .map(|username| {
                    let store = &store;
                    let barrier = &barrier;
                    scope.spawn(move || {
                        barrier.wait();
                        AuthService::new(store).register(username, "a@x.com", "password1")
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            results
                .iter()
                .any(|r| matches!(r, Err(AuthError::DuplicateEmail)))
        );
        assert_eq!(AuthService::new(&store).registered_users().unwrap().len(), 1);
    }

    #[test]
    fn test_corrupt_session_is_storage_error() {
        let store = MemoryStore::new();
        store
            .set(crate::storage::keys::LOGGED_IN_USER, "{broken")
            .unwrap();

        let err = AuthService::new(&store).current_user().unwrap_err();
        assert!(matches!(err, AuthError::Storage(_)));
        assert_eq!(err.code(), "unavailable");
    }
}
