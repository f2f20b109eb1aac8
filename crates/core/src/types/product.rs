//! Product records as served by the external catalog.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A catalog product.
///
/// Products are immutable and sourced entirely from the external catalog.
/// The catalog returns more fields than these; unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Externally assigned, unique id.
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Non-negative unit price.
    pub price: Decimal,
    pub category: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    /// Unit price for display.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        Price::from(self.price)
    }

    /// The image shown on listing cards: the first gallery image, falling
    /// back to the thumbnail.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images
            .first()
            .map(String::as_str)
            .or(self.thumbnail.as_deref())
    }
}
