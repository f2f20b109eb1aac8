//! CLI command implementations.

pub mod account;
pub mod catalog;

use thiserror::Error;
use url::Url;

use pocketshop_storefront::catalog::CatalogError;
use pocketshop_storefront::config::{ConfigError, StorefrontConfig};
use pocketshop_storefront::services::AuthError;
use pocketshop_storefront::storage::StorageError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid catalog URL: {0}")]
    CatalogUrl(#[from] url::ParseError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Load the storefront configuration, including `.env`.
///
/// # Errors
///
/// Returns `CliError::Config` if a variable is set but invalid.
pub fn load_config() -> Result<StorefrontConfig, CliError> {
    Ok(StorefrontConfig::from_env()?)
}

/// Parse a `--catalog-url` value.
///
/// # Errors
///
/// Returns `CliError::CatalogUrl` if the value is not an absolute URL.
pub fn parse_catalog_url(raw: &str) -> Result<Url, CliError> {
    Ok(Url::parse(raw)?)
}
