//! Public catalog proxy handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use cartwheel_core::Product;

use super::products::parse_id;
use crate::error::Result;
use crate::state::AppState;

/// Query parameters for the catalog listing.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
}

/// `GET /api/catalog/products[?category=slug]`
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = state
        .catalog()
        .list_products(query.category.as_deref())
        .await?;
    Ok(Json(products.as_ref().clone()))
}

/// `GET /api/catalog/products/{id}`
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    let id = parse_id(&id)?;
    let product = state.catalog().get_product(&id).await?;
    Ok(Json(product))
}
