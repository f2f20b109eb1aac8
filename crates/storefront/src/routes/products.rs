//! Product page handler.
//!
//! `/productpage` is the only protected page. It renders one page of the
//! filtered catalog next to the cart.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::Uri,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::{error, instrument};

use pocketshop_core::Product;

use super::cart::{CartView, safe_return_to};
use crate::catalog::{CatalogPage, CatalogQuery, SortOrder, categories};
use crate::middleware::RequireUser;
use crate::state::AppState;

/// Shown instead of products when the catalog cannot be fetched.
const CATALOG_UNAVAILABLE: &str = "Products could not be loaded right now. Please try again later.";

/// Query parameters of the product page.
///
/// Everything is optional and parsed leniently: a bad `page` means page 1
/// and an unknown `sort` means source order.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogParams {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub category: Option<String>,
    pub page: Option<String>,
}

impl CatalogParams {
    /// Convert to a view query.
    #[must_use]
    pub fn to_query(&self) -> CatalogQuery {
        CatalogQuery {
            search: self.search.clone().unwrap_or_default(),
            category: self.category.clone(),
            sort: self
                .sort
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            page: self
                .page
                .as_deref()
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(1),
        }
    }
}

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: i32,
    pub title: String,
    pub category: String,
    pub price: String,
    pub image: Option<String>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            title: product.title.clone(),
            category: product.category.clone(),
            price: product.unit_price().display(),
            image: product.primary_image().map(String::from),
        }
    }
}

/// Sort dropdown entry.
#[derive(Clone)]
pub struct SortOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Category dropdown entry.
#[derive(Clone)]
pub struct CategoryOption {
    pub name: String,
    pub selected: bool,
}

/// Numbered pagination link.
#[derive(Clone)]
pub struct PageLink {
    pub number: usize,
    pub href: String,
    pub current: bool,
}

/// Product page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsTemplate {
    pub username: String,
    pub search: String,
    pub sort_options: Vec<SortOption>,
    pub category_options: Vec<CategoryOption>,
    pub any_category: bool,
    pub products: Vec<ProductView>,
    pub total_matches: usize,
    pub page: usize,
    pub total_pages: usize,
    pub pages: Vec<PageLink>,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
    pub cart: CartView,
    pub notice: Option<&'static str>,
    pub return_to: String,
}

/// Link to `page` keeping the other controls.
fn page_href(query: &CatalogQuery, page: usize) -> String {
    let mut href = format!("/productpage?page={page}");
    let search = query.search.trim();
    if !search.is_empty() {
        href.push_str("&search=");
        href.push_str(&urlencoding::encode(search));
    }
    if query.sort != SortOrder::None {
        href.push_str("&sort=");
        href.push_str(query.sort.as_str());
    }
    if let Some(category) = query.category.as_deref().filter(|c| !c.trim().is_empty()) {
        href.push_str("&category=");
        href.push_str(&urlencoding::encode(category));
    }
    href
}

fn build_template(
    username: String,
    query: &CatalogQuery,
    products: &[Product],
    cart: CartView,
    notice: Option<&'static str>,
    return_to: String,
) -> ProductsTemplate {
    let CatalogPage {
        products: page_products,
        page,
        total_pages,
        total_matches,
    } = query.apply(products);

    let selected_category = query.category.as_deref().map(str::trim).unwrap_or_default();
    let category_options: Vec<CategoryOption> = categories(products)
        .into_iter()
        .map(|name| CategoryOption {
            selected: name.eq_ignore_ascii_case(selected_category),
            name,
        })
        .collect();
    let any_category = !category_options.iter().any(|c| c.selected);

    ProductsTemplate {
        username,
        search: query.search.clone(),
        sort_options: SortOrder::ALL
            .into_iter()
            .map(|order| SortOption {
                value: order.as_str(),
                label: order.label(),
                selected: order == query.sort,
            })
            .collect(),
        category_options,
        any_category,
        products: page_products.iter().map(ProductView::from).collect(),
        total_matches,
        page,
        total_pages,
        pages: (1..=total_pages)
            .map(|number| PageLink {
                number,
                href: page_href(query, number),
                current: number == page,
            })
            .collect(),
        prev_href: (page > 1).then(|| page_href(query, page - 1)),
        next_href: (page < total_pages).then(|| page_href(query, page + 1)),
        cart,
        notice,
        return_to,
    }
}

/// Display the product page.
///
/// A catalog failure is logged and rendered as an inline notice over an
/// empty listing; the cart stays usable.
#[instrument(skip(state, user, uri), fields(user = %user.email))]
pub async fn index(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    uri: Uri,
    Query(params): Query<CatalogParams>,
) -> impl IntoResponse {
    let query = params.to_query();

    let (products, notice): (Arc<[Product]>, _) = match state.catalog().products().await {
        Ok(products) => (products, None),
        Err(e) => {
            error!(error = %e, "Failed to load product catalog");
            (Arc::from(Vec::new()), Some(CATALOG_UNAVAILABLE))
        }
    };

    let cart = CartView::from(&state.cart());
    let return_to = safe_return_to(uri.path_and_query().map(|pq| pq.as_str()));

    build_template(user.username, &query, &products, cart, notice, return_to)
}
