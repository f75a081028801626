//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::services::catalog::{CatalogClient, CatalogError};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; provides access to the database pool,
/// configuration and the catalog client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    catalog: CatalogClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the catalog HTTP client cannot be built.
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Result<Self, CatalogError> {
        let catalog = CatalogClient::new(&config.catalog)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                catalog,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the public catalog client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }
}
