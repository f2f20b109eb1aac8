//! Registered user records.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::Email;

/// A registered user.
///
/// Created by registration; never mutated; never deleted. The password is
/// stored and compared in plain text; this is a demo storefront with no
/// security model. `Debug` redacts it so it does not end up in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub email: Email,
    pub password: String,
}

impl User {
    /// Whether the given (already normalized) credentials belong to this user.
    #[must_use]
    pub fn has_credentials(&self, email: &Email, password: &str) -> bool {
        self.email == *email && self.password == password
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
