//! Session-related types.

/// Session keys.
pub mod keys {
    /// Key for the session's cart and wishlist.
    pub const SHOP_STATE: &str = "shop_state";
}
