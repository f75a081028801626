//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                      - Liveness
//! GET    /health/ready                - Readiness (database)
//!
//! # Product store
//! POST   /api/products                - Create
//! GET    /api/products                - List
//! GET    /api/products/{id}           - Show
//! PUT    /api/products/{id}           - Partial update
//! DELETE /api/products/{id}           - Delete
//!
//! # Auth (strict rate limit on login/register)
//! POST   /api/auth/login              - Issue bearer token
//! POST   /api/auth/register           - Create account
//! GET    /api/auth/me                 - Current user (bearer)
//! POST   /api/auth/logout             - Revoke token (bearer)
//!
//! # Public catalog proxy
//! GET    /api/catalog/products        - List (?category=slug)
//! GET    /api/catalog/products/{id}   - Show
//!
//! # Session cart
//! GET    /api/cart                    - Cart summary
//! POST   /api/cart/actions            - Apply one action
//! GET    /api/wishlist                - Saved products
//! ```

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod health;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Login and registration, behind the strict limiter.
pub fn credential_routes(config: &StorefrontConfig) -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .layer(auth_rate_limiter(config.trust_proxy_headers))
}

/// Everything else under `/api`, behind the general limiter.
pub fn api_routes(config: &StorefrontConfig) -> Router<AppState> {
    Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
        .route(
            "/api/products",
            get(products::index).post(products::create),
        )
        .route(
            "/api/products/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
        .route("/api/catalog/products", get(catalog::index))
        .route("/api/catalog/products/{id}", get(catalog::show))
        .route("/api/cart", get(cart::show))
        .route("/api/cart/actions", post(cart::dispatch))
        .route("/api/wishlist", get(cart::wishlist))
        .layer(api_rate_limiter(config.trust_proxy_headers))
}

/// Create all routes for the storefront.
pub fn routes(config: &StorefrontConfig) -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(credential_routes(config))
        .merge(api_routes(config))
        .fallback(|| async { AppError::NotFound("Route not found".to_string()) })
}
