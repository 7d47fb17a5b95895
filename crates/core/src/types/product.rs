//! Catalog product reference.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A catalog item as the cart sees it.
///
/// The cart copies this value into each line item; the catalog remains the
/// owner of the product itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier, unique per item.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Product image, if the catalog has one.
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Product {
    /// Create a product reference without an image.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image_url: None,
        }
    }

    /// Attach an image reference.
    #[must_use]
    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }
}
