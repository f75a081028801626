//! Wishlist state: set membership keyed by product id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::ProductId;

/// A saved product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistEntry {
    /// Product snapshot captured when the entry was added.
    pub product: Product,
}

/// The wishlist. Independent of the cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WishlistState {
    entries: BTreeMap<ProductId, WishlistEntry>,
}

impl WishlistState {
    /// Create an empty wishlist.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product. Re-adding refreshes the snapshot; there are never duplicates.
    pub fn add_to_wishlist(&mut self, product: Product) {
        self.entries
            .insert(product.product_id.clone(), WishlistEntry { product });
    }

    /// Remove a product. No-op when absent.
    pub fn remove_from_wishlist(&mut self, product_id: &ProductId) {
        self.entries.remove(product_id);
    }

    /// Remove the product if present, add it otherwise.
    ///
    /// Returns `true` when the product is in the wishlist afterwards.
    pub fn toggle(&mut self, product: Product) -> bool {
        if self.entries.remove(&product.product_id).is_some() {
            false
        } else {
            self.add_to_wishlist(product);
            true
        }
    }

    /// Whether the product is saved.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.entries.contains_key(product_id)
    }

    /// Entries in product-id order.
    pub fn entries(&self) -> impl Iterator<Item = &WishlistEntry> {
        self.entries.values()
    }

    /// Number of saved products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
