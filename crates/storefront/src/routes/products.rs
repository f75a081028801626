//! Product store handlers.
//!
//! CRUD over the local product table. Mutations are not role-gated.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use cartwheel_core::api::MessageBody;
use cartwheel_core::{Product, ProductId, ProductPatch};

use crate::db::{ProductRepository, RepositoryError};
use crate::error::{ApiJson, AppError, Result};
use crate::state::AppState;

const NOT_FOUND: &str = "Product not found";

/// Parse a product id from the path.
pub(crate) fn parse_id(raw: &str) -> Result<ProductId> {
    ProductId::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}

fn not_found(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound(NOT_FOUND.to_string()),
        other => AppError::Database(other),
    }
}

/// `POST /api/products`
#[instrument(skip(state, product), fields(product_id = %product.product_id))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(product): ApiJson<Product>,
) -> Result<(StatusCode, Json<Product>)> {
    let created = ProductRepository::new(state.pool()).create(&product).await?;
    tracing::info!("Product created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/products`
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products))
}

/// `GET /api/products/{id}`
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    let id = parse_id(&id)?;
    ProductRepository::new(state.pool())
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
}

/// `PUT /api/products/{id}`
#[instrument(skip(state, patch))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<ProductPatch>,
) -> Result<Json<Product>> {
    let id = parse_id(&id)?;
    let updated = ProductRepository::new(state.pool())
        .update(&id, &patch)
        .await
        .map_err(not_found)?;
    tracing::info!("Product updated");
    Ok(Json(updated))
}

/// `DELETE /api/products/{id}`
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>> {
    let id = parse_id(&id)?;
    ProductRepository::new(state.pool())
        .delete(&id)
        .await
        .map_err(not_found)?;
    tracing::info!("Product deleted");
    Ok(Json(MessageBody::new("Product deleted")))
}
