//! Cart route handlers.
//!
//! The cart lives in application state. Every action is a form post from the
//! product page that redirects back to where it came from.

use axum::{
    Form,
    extract::State,
    response::Redirect,
};
use serde::Deserialize;
use tracing::{instrument, warn};

use pocketshop_core::{CartItem, CartState, Price, ProductId};

use crate::error::{AppError, add_breadcrumb};
use crate::middleware::RequireUser;
use crate::state::AppState;

/// Where cart actions return to when no usable `return_to` is given.
pub const DEFAULT_RETURN_TO: &str = "/productpage";

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i32,
    pub title: String,
    pub image: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_total: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total_price: String,
    pub total_quantity: i64,
    /// Distinct products, shown on the cart badge.
    pub line_count: usize,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id().as_i32(),
            title: item.product.title.clone(),
            image: item.product.primary_image().map(String::from),
            quantity: item.quantity,
            price: item.product.unit_price().display(),
            line_total: Price::from(item.line_total()).display(),
        }
    }
}

impl From<&CartState> for CartView {
    fn from(cart: &CartState) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            total_price: cart.total().display(),
            total_quantity: cart.total_quantity(),
            line_count: cart.line_count(),
        }
    }
}

/// Keep redirects on the product page.
///
/// Anything that is not a local `/productpage` URL, or that carries a
/// control character a `Location` header cannot hold, falls back to the
/// plain product page.
#[must_use]
pub fn safe_return_to(return_to: Option<&str>) -> String {
    return_to
        .filter(|target| {
            (*target == DEFAULT_RETURN_TO || target.starts_with("/productpage?"))
                && !target.chars().any(char::is_control)
        })
        .unwrap_or(DEFAULT_RETURN_TO)
        .to_string()
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub return_to: Option<String>,
}

/// Remove line form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
    pub return_to: Option<String>,
}

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub quantity: u32,
    pub return_to: Option<String>,
}

/// Clear cart form data.
#[derive(Debug, Deserialize)]
pub struct ClearCartForm {
    pub return_to: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Add one unit of a catalog product.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the product is not in the catalog and
/// `AppError::Catalog` if the catalog cannot be fetched.
#[instrument(skip(state, _user), fields(product_id = %form.product_id))]
pub async fn add(
    State(state): State<AppState>,
    RequireUser(_user): RequireUser,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect, AppError> {
    let product = state
        .catalog()
        .product(form.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    state.with_cart(|cart| cart.add(&product));

    let id = form.product_id.to_string();
    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id.as_str())]));

    Ok(Redirect::to(&safe_return_to(form.return_to.as_deref())))
}

/// Remove a whole line. Unknown products are ignored.
#[instrument(skip(state, _user), fields(product_id = %form.product_id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireUser(_user): RequireUser,
    Form(form): Form<RemoveFromCartForm>,
) -> Redirect {
    if state
        .with_cart(|cart| cart.remove_line(form.product_id))
        .is_none()
    {
        warn!("remove requested for product not in cart");
    }

    Redirect::to(&safe_return_to(form.return_to.as_deref()))
}

/// Set a line's quantity; zero removes it.
///
/// The line is repriced at the catalog's current price, or keeps its stored
/// price when the catalog cannot be reached.
#[instrument(skip(state, _user), fields(product_id = %form.product_id, quantity = form.quantity))]
pub async fn update(
    State(state): State<AppState>,
    RequireUser(_user): RequireUser,
    Form(form): Form<UpdateCartForm>,
) -> Redirect {
    let catalog_price = match state.catalog().product(form.product_id).await {
        Ok(product) => product.map(|p| p.price),
        Err(e) => {
            warn!(error = %e, "catalog unavailable, keeping stored price");
            None
        }
    };

    let updated = state.with_cart(|cart| {
        let price = catalog_price.or_else(|| cart.get(form.product_id).map(|i| i.product.price));
        price.is_some_and(|price| cart.update_quantity(form.product_id, form.quantity, price))
    });

    if !updated {
        warn!("update requested for product not in cart");
    }

    Redirect::to(&safe_return_to(form.return_to.as_deref()))
}

/// Empty the cart.
pub async fn clear(
    State(state): State<AppState>,
    RequireUser(_user): RequireUser,
    Form(form): Form<ClearCartForm>,
) -> Redirect {
    state.with_cart(CartState::clear);
    add_breadcrumb("cart", "Cleared cart", None);

    Redirect::to(&safe_return_to(form.return_to.as_deref()))
}
