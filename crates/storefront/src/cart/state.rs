//! Cart contents and the pure operations on them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use bella_core::{Price, Product, ProductId, Quantity};

use super::CartError;

/// A product in the cart together with how many units were chosen.
///
/// Serializes flat, with the product fields next to `quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub image_url: Option<String>,
    pub quantity: Quantity,
}

impl LineItem {
    /// Start a line for `product`.
    #[must_use]
    pub fn new(product: Product, quantity: Quantity) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            image_url: product.image_url,
            quantity,
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Ordered line items, at most one per product id.
///
/// Lines keep the order in which products were first added. The methods
/// here only change state; persistence is the store's concern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CartDocument")]
pub struct Cart {
    items: Vec<LineItem>,
}

/// Wire form of a cart, validated on the way in.
#[derive(Deserialize)]
struct CartDocument {
    #[serde(default)]
    items: Vec<LineItem>,
}

impl TryFrom<CartDocument> for Cart {
    type Error = CartError;

    fn try_from(doc: CartDocument) -> Result<Self, Self::Error> {
        Self::from_items(doc.items)
    }
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from existing lines.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::DuplicateProduct`] if two lines share a product id.
    pub fn from_items(items: Vec<LineItem>) -> Result<Self, CartError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(&item.id) {
                return Err(CartError::DuplicateProduct(item.id.clone()));
            }
        }
        Ok(Self { items })
    }

    /// The lines in display order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// The line for `id`, if any.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Sum of every line's unit price times quantity.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Add `quantity` units of `product`, merging into an existing line.
    ///
    /// An existing line keeps its stored name, price and image.
    pub fn add(&mut self, product: Product, quantity: Quantity) {
        match self.get_mut(&product.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(quantity),
            None => self.items.push(LineItem::new(product, quantity)),
        }
    }

    /// Returns `true` if a line matched.
    pub fn increase(&mut self, id: &ProductId) -> bool {
        let Some(item) = self.get_mut(id) else {
            return false;
        };
        item.quantity = item.quantity.incremented();
        true
    }

    /// Returns `true` if a line matched. The quantity never drops below one.
    pub fn decrease(&mut self, id: &ProductId) -> bool {
        let Some(item) = self.get_mut(id) else {
            return false;
        };
        item.quantity = item.quantity.decremented();
        true
    }

    /// Returns `true` if a line was removed.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn get_mut(&mut self, id: &ProductId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| &item.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: &str, cents: u32) -> Product {
        Product::new(id, format!("Producto {id}"), Price::from_cents(cents))
    }

    fn qty(n: u32) -> Quantity {
        Quantity::new(n).unwrap()
    }

    #[test]
    fn test_add_merges_same_product() {
        let mut cart = Cart::new();
        cart.add(product("A", 1000), qty(2));
        cart.add(product("A", 1000), qty(3));

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity.get(), 5);
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut cart = Cart::new();
        cart.add(product("B", 500), qty(1));
        cart.add(product("A", 1000), qty(1));
        cart.add(product("B", 500), qty(1));

        let ids: Vec<_> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["B", "A"]);
    }

    #[test]
    fn test_add_existing_keeps_stored_price() {
        let mut cart = Cart::new();
        cart.add(product("A", 1000), qty(1));
        cart.add(product("A", 1200), qty(1));
        assert_eq!(cart.total(), Price::from_cents(2000));
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let mut cart = Cart::new();
        cart.add(product("A", 1000), qty(1));
        let before = cart.clone();
        let missing = ProductId::new("Z");

        assert!(!cart.increase(&missing));
        assert!(!cart.decrease(&missing));
        assert!(!cart.remove(&missing));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_decrease_floors_at_one() {
        let mut cart = Cart::new();
        cart.add(product("A", 1000), qty(2));
        let id = ProductId::new("A");

        assert!(cart.decrease(&id));
        assert!(cart.decrease(&id));
        assert_eq!(cart.get(&id).unwrap().quantity, Quantity::ONE);
    }

    #[test]
    fn test_total_and_count() {
        let mut cart = Cart::new();
        assert_eq!(cart.total(), Price::ZERO);

        cart.add(product("A", 1999), qty(3));
        cart.add(product("B", 1), qty(1));
        assert_eq!(cart.total(), Price::from_cents(5998));
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_from_items_rejects_duplicates() {
        let line = LineItem::new(product("A", 100), qty(1));
        let err = Cart::from_items(vec![line.clone(), line]).unwrap_err();
        assert!(matches!(err, CartError::DuplicateProduct(id) if id.as_str() == "A"));
    }

    #[test]
    fn test_deserialize_rejects_zero_quantity() {
        let json = r#"{"items":[{"id":"A","name":"x","price":1,"image_url":null,"quantity":0}]}"#;
        assert!(serde_json::from_str::<Cart>(json).is_err());
    }
}
