//! In-memory filtering, sorting and pagination of the catalog.

use std::cmp::Reverse;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use pocketshop_core::Product;

/// Products shown per page.
pub const PAGE_SIZE: usize = 5;

/// Price ordering for the product page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Source order.
    #[default]
    None,
    LowToHigh,
    HighToLow,
}

impl SortOrder {
    /// Value used in the `sort` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::LowToHigh => "low-to-high",
            Self::HighToLow => "high-to-low",
        }
    }

    /// Label shown in the sort dropdown.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "Sort by",
            Self::LowToHigh => "Price: Low to High",
            Self::HighToLow => "Price: High to Low",
        }
    }

    /// Every order, in dropdown order.
    pub const ALL: [Self; 3] = [Self::None, Self::LowToHigh, Self::HighToLow];
}

impl FromStr for SortOrder {
    type Err = std::convert::Infallible;

    /// Unknown values fall back to source order.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "low-to-high" => Self::LowToHigh,
            "high-to-low" => Self::HighToLow,
            _ => Self::None,
        })
    }
}

/// User-controlled view state of the product page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Substring matched against title or category, case-insensitively.
    pub search: String,
    /// Exact category, case-insensitively. `None`, empty or `all` means any.
    pub category: Option<String>,
    pub sort: SortOrder,
    /// 1-based page number.
    pub page: usize,
}

/// One page of the filtered, sorted catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPage {
    pub products: Vec<Product>,
    /// Current page after clamping, 1-based.
    pub page: usize,
    /// `ceil(total_matches / PAGE_SIZE)`; zero when nothing matches.
    pub total_pages: usize,
    pub total_matches: usize,
}

impl CatalogPage {
    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Whether a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

impl CatalogQuery {
    fn category_filter(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
    }

    /// Whether `product` passes the search and category filters.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let needle = self.search.trim().to_lowercase();
        let search_ok = needle.is_empty()
            || product.title.to_lowercase().contains(&needle)
            || product.category.to_lowercase().contains(&needle);

        let category_ok = self
            .category_filter()
            .is_none_or(|c| product.category.to_lowercase() == c.to_lowercase());

        search_ok && category_ok
    }

    /// Filter, sort and slice `products` into the requested page.
    ///
    /// The sort is stable, so equal prices keep source order. A page outside
    /// `1..=total_pages` is clamped into range.
    #[must_use]
    pub fn apply(&self, products: &[Product]) -> CatalogPage {
        let mut matches: Vec<&Product> = products.iter().filter(|p| self.matches(p)).collect();

        match self.sort {
            SortOrder::None => {}
            SortOrder::LowToHigh => matches.sort_by_key(|p| p.price),
            SortOrder::HighToLow => matches.sort_by_key(|p| Reverse(p.price)),
        }

        let total_matches = matches.len();
        let total_pages = total_matches.div_ceil(PAGE_SIZE);
        let page = self.page.clamp(1, total_pages.max(1));

        let products = matches
            .into_iter()
            .skip((page - 1) * PAGE_SIZE)
            .take(PAGE_SIZE)
            .cloned()
            .collect();

        CatalogPage {
            products,
            page,
            total_pages,
            total_matches,
        }
    }
}

/// Distinct categories in order of first appearance.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for product in products {
        if !seen.iter().any(|c| c.eq_ignore_ascii_case(&product.category)) {
            seen.push(product.category.clone());
        }
    }
    seen
}
