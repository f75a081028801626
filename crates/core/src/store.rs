//! Session state container and its action reducer.
//!
//! A [`ShopState`] is owned by one session (a server session or the CLI's
//! state file). Every change goes through [`ShopState::dispatch`], which
//! applies one [`Action`]; fields are never written directly. Actions are
//! serde-tagged so they can travel as JSON request bodies.

use serde::{Deserialize, Serialize};

use crate::cart::CartState;
use crate::product::Product;
use crate::types::ProductId;
use crate::wishlist::WishlistState;

/// A state transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Insert or replace a cart line.
    AddToCart {
        product: Product,
        #[serde(default)]
        quantity: Option<i64>,
    },
    /// Set a line's quantity, clamped to at least 1.
    UpdateQuantity { product_id: ProductId, quantity: i64 },
    /// Add one unit to a line.
    IncrementQuantity { product_id: ProductId },
    /// Take one unit off a line, stopping at 1.
    DecrementQuantity { product_id: ProductId },
    /// Drop a line.
    RemoveFromCart { product_id: ProductId },
    /// Save a product.
    AddToWishlist { product: Product },
    /// Forget a saved product.
    RemoveFromWishlist { product_id: ProductId },
    /// Save or forget depending on current membership.
    ToggleWishlist { product: Product },
}

/// Cart and wishlist owned by one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopState {
    #[serde(default)]
    cart: CartState,
    #[serde(default)]
    wishlist: WishlistState,
}

impl ShopState {
    /// Empty state, as at application start.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one action. Never fails.
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::AddToCart { product, quantity } => self.cart.add_to_cart(product, quantity),
            Action::UpdateQuantity {
                product_id,
                quantity,
            } => self.cart.update_quantity(&product_id, quantity),
            Action::IncrementQuantity { product_id } => self.cart.increment(&product_id),
            Action::DecrementQuantity { product_id } => self.cart.decrement(&product_id),
            Action::RemoveFromCart { product_id } => self.cart.remove_from_cart(&product_id),
            Action::AddToWishlist { product } => self.wishlist.add_to_wishlist(product),
            Action::RemoveFromWishlist { product_id } => {
                self.wishlist.remove_from_wishlist(&product_id);
            }
            Action::ToggleWishlist { product } => {
                self.wishlist.toggle(product);
            }
        }
    }

    /// Read-only view of the cart.
    #[must_use]
    pub const fn cart(&self) -> &CartState {
        &self.cart
    }

    /// Read-only view of the wishlist.
    #[must_use]
    pub const fn wishlist(&self) -> &WishlistState {
        &self.wishlist
    }
}
