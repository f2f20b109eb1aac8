//! Catalog listing command.

use clap::Args;

use pocketshop_storefront::catalog::{CatalogClient, CatalogQuery, SortOrder, categories};
use pocketshop_storefront::config::StorefrontConfig;

use super::CliError;

/// Arguments of `pocketshop catalog`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Case-insensitive match against title or category
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Exact category ("all" for any)
    #[arg(short, long)]
    pub category: Option<String>,

    /// none, low-to-high or high-to-low
    #[arg(long, default_value = "none")]
    pub sort: String,

    /// 1-based page number
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// List the available categories instead of products
    #[arg(long)]
    pub categories: bool,
}

impl ListArgs {
    fn to_query(&self) -> CatalogQuery {
        CatalogQuery {
            search: self.search.clone(),
            category: self.category.clone(),
            sort: self.sort.parse().unwrap_or(SortOrder::None),
            page: self.page,
        }
    }
}

/// Fetch the catalog and print one page of it.
///
/// # Errors
///
/// Returns `CliError::Catalog` if the catalog cannot be fetched.
pub async fn list(config: &StorefrontConfig, args: &ListArgs) -> Result<(), CliError> {
    let client = CatalogClient::new(&config.catalog)?;
    tracing::debug!("Fetching catalog from {}", client.endpoint());
    let products = client.products().await?;

    if args.categories {
        for category in categories(&products) {
            tracing::info!("{category}");
        }
        return Ok(());
    }

    let page = args.to_query().apply(&products);

    if page.products.is_empty() {
        tracing::info!("No products found");
        return Ok(());
    }

    for product in &page.products {
        tracing::info!(
            "{:>5}  {:<40}  {:>12}  {}",
            product.id,
            product.title,
            product.unit_price().display(),
            product.category
        );
    }
    tracing::info!(
        "Page {} of {} ({} matching products)",
        page.page,
        page.total_pages,
        page.total_matches
    );
    Ok(())
}
