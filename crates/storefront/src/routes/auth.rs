//! Registration, login and logout handlers.
//!
//! Form errors redirect back to the form with an `?error=` code which the
//! page turns into a message. Only storage failures become error responses.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{instrument, warn};

use crate::error::{AppError, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::services::auth::{AuthError, MIN_PASSWORD_LENGTH};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Query parameters for error/success display.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
    pub min_password_length: usize,
}

/// Human-readable text for an `?error=` code.
fn error_message(code: &str) -> String {
    match code {
        "username_required" => "Username is required.".to_string(),
        "invalid_email" => "Please enter a valid email address.".to_string(),
        "password_required" => "Password is required.".to_string(),
        "password_too_short" => {
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters.")
        }
        "email_taken" => "User already exists.".to_string(),
        "credentials" => "Invalid email or password.".to_string(),
        _ => "Something went wrong. Please try again.".to_string(),
    }
}

/// Human-readable text for a `?success=` code.
fn success_message(code: &str) -> Option<String> {
    match code {
        "registered" => Some("Registration successful. Please log in.".to_string()),
        "logged_out" => Some("You have been logged out.".to_string()),
        _ => None,
    }
}

/// Turn a form error into a redirect back to `form_path`.
fn form_error_redirect(form_path: &str, err: AuthError) -> Response {
    match err {
        AuthError::Storage(e) => AppError::Storage(e).into_response(),
        err => {
            warn!(error = %err, "{form_path} form rejected");
            Redirect::to(&format!("{form_path}?error={}", err.code())).into_response()
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    RegisterTemplate {
        error: query.error.as_deref().map(error_message),
        min_password_length: MIN_PASSWORD_LENGTH,
    }
}

/// Handle registration form submission.
///
/// Does not log the user in; success leads to the login page.
#[instrument(skip(state, form))]
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    match state
        .auth()
        .register(&form.username, &form.email, &form.password)
    {
        Ok(user) => {
            add_breadcrumb("auth", "Registered", Some(&[("email", user.email.as_str())]));
            Redirect::to("/login?success=registered").into_response()
        }
        Err(e) => form_error_redirect("/register", e),
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error.as_deref().map(error_message),
        success: query.success.as_deref().and_then(success_message),
    }
}

/// Handle login form submission.
#[instrument(skip(state, form))]
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    match state.auth().login(&form.email, &form.password) {
        Ok(user) => {
            set_sentry_user(&user.username, user.email.as_str());
            add_breadcrumb("auth", "Logged in", None);
            Redirect::to("/productpage").into_response()
        }
        Err(e) => form_error_redirect("/login", e),
    }
}

/// Handle logout.
///
/// # Errors
///
/// Returns `AppError::Storage` if the session cannot be cleared.
pub async fn logout(State(state): State<AppState>) -> Result<Redirect, AppError> {
    state.sessions().clear()?;
    clear_sentry_user();
    add_breadcrumb("auth", "Logged out", None);
    Ok(Redirect::to("/login?success=logged_out"))
}
