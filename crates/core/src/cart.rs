//! The cart engine.
//!
//! [`CartState`] is an ordered list of cart lines plus running totals. Every
//! operation is synchronous and mutates state the caller owns exclusively.
//!
//! In correct usage the totals always equal the sums over the lines:
//!
//! ```text
//! total_quantity == Σ item.quantity
//! total_price    == Σ item.price × item.quantity
//! ```
//!
//! [`CartState::remove`] trusts the quantity carried by its argument, so a
//! stale argument makes the totals drift. Drift is not corrected; totals are
//! signed so it stays visible instead of wrapping. Callers holding only an
//! id should use [`CartState::remove_line`].
//!
//! # Example
//!
//! ```
//! use pocketshop_core::{CartState, Product, ProductId};
//! use rust_decimal::Decimal;
//!
//! let product = Product {
//!     id: ProductId::new(1),
//!     title: "Mascara".into(),
//!     description: String::new(),
//!     price: Decimal::from(10),
//!     category: "beauty".into(),
//!     thumbnail: None,
//!     images: Vec::new(),
//! };
//!
//! let mut cart = CartState::new();
//! cart.add(&product);
//! cart.add(&product);
//! assert_eq!(cart.line_count(), 1);
//! assert_eq!(cart.total_quantity(), 2);
//! assert_eq!(cart.total_price(), Decimal::from(20));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Price, Product, ProductId};

/// One distinct product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    /// Positive unit count.
    pub quantity: u32,
}

impl CartItem {
    /// A new line holding one unit of `product`.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// `price × quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// Cart contents and running totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    items: Vec<CartItem>,
    total_price: Decimal,
    total_quantity: i64,
}

impl CartState {
    /// An empty cart with zero totals.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line for `product.id` or appends a new line
    /// with quantity 1. Either way the totals grow by exactly one unit at
    /// `product.price`.
    pub fn add(&mut self, product: &Product) {
        match self.items.iter_mut().find(|item| item.id() == product.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(1),
            None => self.items.push(CartItem::new(product.clone())),
        }
        self.total_quantity += 1;
        self.total_price += product.price;
    }

    /// Remove the line whose id matches `item`, whatever its quantity.
    ///
    /// The totals are reduced by `item.price × item.quantity` taken from the
    /// argument, not from the stored line, and are reduced even when no line
    /// matches. Pass a line taken from the current [`CartState::items`]
    /// snapshot to keep the totals consistent.
    pub fn remove(&mut self, item: &CartItem) {
        self.items.retain(|line| line.id() != item.id());
        self.total_price -= item.line_total();
        self.total_quantity -= i64::from(item.quantity);
    }

    /// Remove the line for `id` using the stored price and quantity.
    ///
    /// Returns the removed line, or `None` if `id` is not in the cart.
    pub fn remove_line(&mut self, id: ProductId) -> Option<CartItem> {
        let index = self.items.iter().position(|line| line.id() == id)?;
        let line = self.items.remove(index);
        self.total_price -= line.line_total();
        self.total_quantity -= i64::from(line.quantity);
        Some(line)
    }

    /// Set the quantity of the line for `id`, repricing it at `price`.
    ///
    /// The line's old contribution is taken out of the totals, the new
    /// quantity and price are stored (last write wins on price), and the new
    /// contribution is added back. A quantity of zero removes the line.
    ///
    /// Returns `false` and changes nothing if `id` is not in the cart.
    pub fn update_quantity(&mut self, id: ProductId, quantity: u32, price: Decimal) -> bool {
        let Some(index) = self.items.iter().position(|line| line.id() == id) else {
            return false;
        };

        if quantity == 0 {
            self.remove_line(id);
            return true;
        }

        let Some(line) = self.items.get_mut(index) else {
            return false;
        };
        self.total_price -= line.line_total();
        self.total_quantity -= i64::from(line.quantity);

        line.quantity = quantity;
        line.product.price = price;

        self.total_price += line.line_total();
        self.total_quantity += i64::from(quantity);
        true
    }

    /// Empty the cart and zero the totals.
    pub fn clear(&mut self) {
        self.items.clear();
        self.total_price = Decimal::ZERO;
        self.total_quantity = 0;
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// The line for `id`, if present.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|line| line.id() == id)
    }

    #[must_use]
    pub const fn total_price(&self) -> Decimal {
        self.total_price
    }

    /// Total price for display.
    #[must_use]
    pub fn total(&self) -> Price {
        Price::from(self.total_price)
    }

    #[must_use]
    pub const fn total_quantity(&self) -> i64 {
        self.total_quantity
    }

    /// Number of distinct products (the cart badge count).
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the running totals match the sums over the lines.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let quantity: i64 = self.items.iter().map(|line| i64::from(line.quantity)).sum();
        let price: Decimal = self.items.iter().map(CartItem::line_total).sum();
        quantity == self.total_quantity && price == self.total_price
    }
}
