//! Cart state.
//!
//! A cart maps product ids to lines. Every operation is total: unknown ids
//! are ignored and out-of-range quantities are coerced, so callers never
//! branch on an error. The invariants are:
//!
//! - at most one line per product id;
//! - every stored quantity is at least 1;
//! - removal is the only way a product leaves the cart.
//!
//! Totals are derived on read from the price snapshot taken when the line
//! was written, never from a live product lookup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::{Price, ProductId};

/// Delivery charge added on top of the subtotal.
pub const DELIVERY_CHARGE: Price = Price::ZERO;

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product snapshot captured when the line was last written.
    pub product: Product,
    /// Units ordered, always at least 1.
    pub quantity: u32,
}

impl CartLine {
    /// `quantity × snapshot price`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// Clamp a requested quantity into `1..=u32::MAX`.
#[must_use]
pub fn coerce_quantity(requested: i64) -> u32 {
    u32::try_from(requested.max(1)).unwrap_or(u32::MAX)
}

/// The cart: product id to line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartState {
    lines: BTreeMap<ProductId, CartLine>,
}

impl CartState {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a line, or replace the snapshot and quantity of an existing one.
    ///
    /// A missing quantity or one below 1 is stored as 1. Quantities are not
    /// summed with an existing line.
    pub fn add_to_cart(&mut self, product: Product, quantity: Option<i64>) {
        let quantity = coerce_quantity(quantity.unwrap_or(1));
        self.lines
            .insert(product.product_id.clone(), CartLine { product, quantity });
    }

    /// Set the quantity of an existing line to `max(quantity, 1)`.
    ///
    /// No-op when the product is not in the cart. Stock is not checked.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        if let Some(line) = self.lines.get_mut(product_id) {
            line.quantity = coerce_quantity(quantity);
        }
    }

    /// Raise a line's quantity by one.
    pub fn increment(&mut self, product_id: &ProductId) {
        if let Some(current) = self.quantity_of(product_id) {
            self.update_quantity(product_id, i64::from(current).saturating_add(1));
        }
    }

    /// Lower a line's quantity by one, stopping at 1.
    pub fn decrement(&mut self, product_id: &ProductId) {
        if let Some(current) = self.quantity_of(product_id) {
            self.update_quantity(product_id, i64::from(current) - 1);
        }
    }

    /// Remove a line. No-op when absent.
    pub fn remove_from_cart(&mut self, product_id: &ProductId) {
        self.lines.remove(product_id);
    }

    /// Look up a line.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.get(product_id)
    }

    /// Quantity of a line, if present.
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> Option<u32> {
        self.lines.get(product_id).map(|line| line.quantity)
    }

    /// Whether the product has a line.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.lines.contains_key(product_id)
    }

    /// Lines in product-id order.
    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.values()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.values().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of line totals at full precision.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines.values().map(CartLine::line_total).sum()
    }

    /// Subtotal plus a delivery charge.
    #[must_use]
    pub fn total(&self, delivery_charge: Price) -> Price {
        self.subtotal() + delivery_charge
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn product(id: u64, price: u32) -> Product {
        serde_json::from_value(json!({
            "id": id,
            "title": format!("Product {id}"),
            "price": price,
            "thumbnail": "https://example.com/t.png"
        }))
        .unwrap()
    }

    fn id(n: u64) -> ProductId {
        ProductId::from(n)
    }

    #[test]
    fn test_subtotal_of_two_lines() {
        let mut cart = CartState::new();
        cart.add_to_cart(product(1, 10), Some(2));
        cart.add_to_cart(product(2, 5), Some(1));

        assert_eq!(cart.subtotal(), Price::from_cents(2500));
        assert_eq!(cart.subtotal().display(), "25.00");
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_add_then_update_then_subtotal() {
        let mut cart = CartState::new();
        cart.add_to_cart(product(1, 100), Some(1));
        cart.update_quantity(&id(1), 3);

        assert_eq!(cart.subtotal(), Price::from_cents(30_000));
    }

    #[test]
    fn test_remove_leaves_empty_cart_with_zero_subtotal() {
        let mut cart = CartState::new();
        cart.add_to_cart(product(1, 10), Some(5));
        cart.remove_from_cart(&id(1));

        assert!(!cart.contains(&id(1)));
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Price::ZERO);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = CartState::new();
        cart.add_to_cart(product(1, 10), None);
        cart.add_to_cart(product(2, 10), None);

        cart.remove_from_cart(&id(1));
        let once = cart.clone();
        cart.remove_from_cart(&id(1));
        assert_eq!(cart, once);
    }

    #[test]
    fn test_update_clamps_to_one() {
        let mut cart = CartState::new();
        cart.add_to_cart(product(1, 10), Some(4));

        for requested in [0, -1, i64::MIN] {
            cart.update_quantity(&id(1), requested);
            assert_eq!(cart.quantity_of(&id(1)), Some(1));
        }
    }

    #[test]
    fn test_update_absent_is_noop() {
        let mut cart = CartState::new();
        cart.add_to_cart(product(1, 10), Some(2));
        let before = cart.clone();

        cart.update_quantity(&id(99), 7);
        assert_eq!(cart, before);
        assert!(!cart.contains(&id(99)));
    }

    #[test]
    fn test_add_replaces_existing_line() {
        let mut cart = CartState::new();
        cart.add_to_cart(product(1, 10), Some(4));
        cart.add_to_cart(product(1, 12), Some(2));

        assert_eq!(cart.len(), 1);
        let line = cart.get(&id(1)).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.product.price, Price::from_cents(1200));
    }

    #[test]
    fn test_add_coerces_invalid_quantity() {
        let mut cart = CartState::new();
        cart.add_to_cart(product(1, 10), None);
        cart.add_to_cart(product(2, 10), Some(0));
        cart.add_to_cart(product(3, 10), Some(-8));
        cart.add_to_cart(product(4, 10), Some(i64::MAX));

        assert_eq!(cart.quantity_of(&id(1)), Some(1));
        assert_eq!(cart.quantity_of(&id(2)), Some(1));
        assert_eq!(cart.quantity_of(&id(3)), Some(1));
        assert_eq!(cart.quantity_of(&id(4)), Some(u32::MAX));
    }

    #[test]
    fn test_increment_and_decrement() {
        let mut cart = CartState::new();
        cart.add_to_cart(product(1, 10), Some(1));

        cart.increment(&id(1));
        cart.increment(&id(1));
        assert_eq!(cart.quantity_of(&id(1)), Some(3));

        for _ in 0..5 {
            cart.decrement(&id(1));
        }
        assert_eq!(cart.quantity_of(&id(1)), Some(1));

        cart.increment(&id(2));
        assert!(!cart.contains(&id(2)));
    }

    #[test]
    fn test_uniqueness_over_mixed_sequence() {
        let mut cart = CartState::new();
        for round in 0..4_i64 {
            for n in 1..=3 {
                cart.add_to_cart(product(n, 1), Some(round));
                cart.update_quantity(&id(n), round - 2);
            }
            cart.remove_from_cart(&id(2));
        }

        assert_eq!(cart.len(), 2);
        assert!(cart.lines().all(|line| line.quantity >= 1));
        let ids: Vec<_> = cart.lines().map(|l| l.product.product_id.clone()).collect();
        assert_eq!(ids, vec![id(1), id(3)]);
    }

    #[test]
    fn test_total_adds_delivery_charge() {
        let mut cart = CartState::new();
        cart.add_to_cart(product(1, 10), Some(1));

        assert_eq!(cart.total(DELIVERY_CHARGE), cart.subtotal());
        assert_eq!(
            cart.total(Price::from_cents(250)),
            Price::from_cents(1250)
        );
    }

    #[test]
    fn test_persisted_cart_rehydrates() {
        let mut cart = CartState::new();
        cart.add_to_cart(product(7, 3), Some(2));

        let json = serde_json::to_string(&cart).unwrap();
        let restored: CartState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_rehydrated_cart_keeps_full_precision() {
        let precise: Product = serde_json::from_value(json!({
            "id": 8,
            "title": "Saffron",
            "price": "0.1234567890123456789012345678"
        }))
        .unwrap();
        let mut cart = CartState::new();
        cart.add_to_cart(precise, Some(3));
        cart.add_to_cart(product(9, 2), Some(1));

        let json = serde_json::to_string(&cart).unwrap();
        let restored: CartState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
        assert_eq!(restored.subtotal(), cart.subtotal());
        assert_eq!(
            restored.subtotal().amount().to_string(),
            "2.3703703670370370367037037034"
        );
    }
}
