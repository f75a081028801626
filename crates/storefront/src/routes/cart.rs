//! Session cart and wishlist handlers.
//!
//! Each session owns one [`ShopState`]. A request loads it, applies at most
//! one action, and writes the whole value back. Concurrent requests from the
//! same session are last-writer-wins.

use axum::Json;
use tower_sessions::Session;
use tracing::instrument;

use cartwheel_core::api::{CartSummary, WishlistSummary};
use cartwheel_core::{Action, DELIVERY_CHARGE, ShopState};

use crate::error::{ApiJson, Result};
use crate::models::session_keys;

async fn load(session: &Session) -> Result<ShopState> {
    Ok(session
        .get::<ShopState>(session_keys::SHOP_STATE)
        .await?
        .unwrap_or_default())
}

/// `GET /api/cart`
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartSummary>> {
    let state = load(&session).await?;
    Ok(Json(CartSummary::new(state.cart(), DELIVERY_CHARGE)))
}

/// `POST /api/cart/actions`
#[instrument(skip(session, action))]
pub async fn dispatch(
    session: Session,
    ApiJson(action): ApiJson<Action>,
) -> Result<Json<CartSummary>> {
    let mut state = load(&session).await?;
    state.dispatch(action);
    session.insert(session_keys::SHOP_STATE, &state).await?;
    Ok(Json(CartSummary::new(state.cart(), DELIVERY_CHARGE)))
}

/// `GET /api/wishlist`
#[instrument(skip(session))]
pub async fn wishlist(session: Session) -> Result<Json<WishlistSummary>> {
    let state = load(&session).await?;
    Ok(Json(WishlistSummary::from(state.wishlist())))
}
