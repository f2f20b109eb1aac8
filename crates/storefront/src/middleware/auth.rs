//! Route guard for the protected catalog pages.
//!
//! The guard is a pure function of the session slot: a stored user means
//! `Authenticated`, anything else means `Unauthenticated`. It is evaluated
//! on every request, so logging out in another place takes effect on the
//! next navigation.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};

use pocketshop_core::User;

use crate::error::AppError;
use crate::state::AppState;
use crate::storage::{SessionStore, StorageError};

/// Result of evaluating the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    Unauthenticated,
    Authenticated(User),
}

impl GuardState {
    /// Evaluate the guard against the current session.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the session slot cannot be read.
    pub fn evaluate(sessions: &SessionStore<'_>) -> Result<Self, StorageError> {
        Ok(sessions
            .current()?
            .map_or(Self::Unauthenticated, Self::Authenticated))
    }
}

/// Extractor that requires a logged-in user.
///
/// If nobody is logged in, returns a redirect to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireUser(pub User);

/// Rejection returned when the guard denies access.
pub enum AuthRejection {
    /// Nobody is logged in.
    RedirectToLogin,
    /// The session slot could not be read.
    Storage(StorageError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::Storage(err) => AppError::Storage(err).into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match GuardState::evaluate(&state.sessions()).map_err(AuthRejection::Storage)? {
            GuardState::Authenticated(user) => Ok(Self(user)),
            GuardState::Unauthenticated => {
                tracing::debug!(path = %parts.uri.path(), "guard redirecting to login");
                Err(AuthRejection::RedirectToLogin)
            }
        }
    }
}
