//! Authentication error types.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors that can occur during registration and login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username was empty after trimming.
    #[error("username is required")]
    UsernameRequired,

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] pocketshop_core::EmailError),

    /// Password was empty after trimming.
    #[error("password is required")]
    PasswordRequired,

    /// Password shorter than the minimum length.
    #[error("password must be at least {0} characters")]
    WeakPassword(usize),

    /// Another user already registered this email.
    #[error("user already exists")]
    DuplicateEmail,

    /// No user matches the email and password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Short code passed back to the form in the `?error=` query parameter.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UsernameRequired => "username_required",
            Self::InvalidEmail(_) => "invalid_email",
            Self::PasswordRequired => "password_required",
            Self::WeakPassword(_) => "password_too_short",
            Self::DuplicateEmail => "email_taken",
            Self::InvalidCredentials => "credentials",
            Self::Storage(_) => "unavailable",
        }
    }
}
