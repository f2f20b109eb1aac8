//! Account commands: register, login, logout, whoami, users.
//!
//! Each command opens the storage file, runs one auth operation and exits,
//! so the server picks up the change on its next request.

use pocketshop_storefront::config::StorefrontConfig;
use pocketshop_storefront::services::AuthService;
use pocketshop_storefront::storage::FileStore;

use super::CliError;

fn open_store(config: &StorefrontConfig) -> Result<FileStore, CliError> {
    tracing::debug!("Opening storage at {}", config.data_path.display());
    Ok(FileStore::open(&config.data_path)?)
}

/// Register a new user.
///
/// # Errors
///
/// Returns `CliError::Auth` if the details are invalid or the email is taken.
pub fn register(
    config: &StorefrontConfig,
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), CliError> {
    let store = open_store(config)?;
    let user = AuthService::new(&store).register(username, email, password)?;

    tracing::info!("Registered {} <{}>", user.username, user.email);
    tracing::info!("Log in with: pocketshop login -e {} -p <password>", user.email);
    Ok(())
}

/// Log in.
///
/// # Errors
///
/// Returns `CliError::Auth` if the credentials do not match.
pub fn login(config: &StorefrontConfig, email: &str, password: &str) -> Result<(), CliError> {
    let store = open_store(config)?;
    let user = AuthService::new(&store).login(email, password)?;

    tracing::info!("Logged in as {} <{}>", user.username, user.email);
    Ok(())
}

/// Log out. Succeeds when nobody is logged in.
///
/// # Errors
///
/// Returns `CliError::Auth` if the session cannot be cleared.
pub fn logout(config: &StorefrontConfig) -> Result<(), CliError> {
    let store = open_store(config)?;
    AuthService::new(&store).logout()?;

    tracing::info!("Logged out");
    Ok(())
}

/// Show the logged-in user.
///
/// # Errors
///
/// Returns `CliError::Auth` if the session cannot be read.
pub fn whoami(config: &StorefrontConfig) -> Result<(), CliError> {
    let store = open_store(config)?;

    match AuthService::new(&store).current_user()? {
        Some(user) => tracing::info!("{} <{}>", user.username, user.email),
        None => tracing::info!("Not logged in"),
    }
    Ok(())
}

/// List registered users in registration order.
///
/// # Errors
///
/// Returns `CliError::Auth` if the registry cannot be read.
pub fn users(config: &StorefrontConfig) -> Result<(), CliError> {
    let store = open_store(config)?;
    let users = AuthService::new(&store).registered_users()?;

    if users.is_empty() {
        tracing::info!("No registered users");
        return Ok(());
    }

    for (index, user) in users.iter().enumerate() {
        tracing::info!("{:>3}. {} <{}>", index + 1, user.username, user.email);
    }
    tracing::info!("{} user(s)", users.len());
    Ok(())
}
