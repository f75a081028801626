//! Request and response bodies shared by the storefront server and client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{CartLine, CartState};
use crate::product::Product;
use crate::types::{Email, Price, ProductId, Role, UserId};
use crate::wishlist::WishlistState;

/// `POST /api/auth/login` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/register` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Opaque bearer token.
    pub token: String,
    pub user: UserProfile,
}

/// `{ "message": ... }` body used by most endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{ "msg": ... }` body used by registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgBody {
    pub msg: String,
}

impl MsgBody {
    #[must_use]
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// One rendered cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineView {
    pub product_id: ProductId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub unit_price: Price,
    pub quantity: u32,
    pub line_total: Price,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.product_id.clone(),
            title: line.product.title.clone(),
            thumbnail: line.product.thumbnail.clone(),
            unit_price: line.product.price,
            quantity: line.quantity,
            line_total: line.line_total(),
        }
    }
}

/// Cart with derived totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSummary {
    pub lines: Vec<CartLineView>,
    pub item_count: u64,
    pub subtotal: Price,
    pub delivery_charge: Price,
    pub total: Price,
}

impl CartSummary {
    /// Derive a summary from cart state.
    #[must_use]
    pub fn new(cart: &CartState, delivery_charge: Price) -> Self {
        Self {
            lines: cart.lines().map(CartLineView::from).collect(),
            item_count: cart.item_count(),
            subtotal: cart.subtotal(),
            delivery_charge,
            total: cart.total(delivery_charge),
        }
    }
}

/// Saved products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistSummary {
    pub products: Vec<Product>,
}

impl From<&WishlistState> for WishlistSummary {
    fn from(wishlist: &WishlistState) -> Self {
        Self {
            products: wishlist
                .entries()
                .map(|entry| entry.product.clone())
                .collect(),
        }
    }
}
