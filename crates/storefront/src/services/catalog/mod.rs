//! Client for the public product catalog (dummyjson.com).
//!
//! The catalog is read-only. Responses are cached in memory via `moka` for
//! five minutes. Every request is bounded by the configured timeout and is
//! never retried.
//!
//! # Endpoints
//!
//! - `GET /products?limit=0` - every product, wrapped as `{ "products": [...] }`
//! - `GET /products/category/{slug}?limit=0` - one category, same envelope
//! - `GET /products/{id}` - a single product, 404 when unknown

mod cache;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use cartwheel_core::{Product, ProductId};

use self::cache::{CacheKey, CacheValue};
use crate::config::CatalogConfig;

/// Errors that can occur when talking to the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request exceeded the configured timeout.
    #[error("catalog request timed out")]
    Timeout,

    /// Product or category not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Catalog answered with an unexpected status.
    #[error("catalog returned HTTP {0}")]
    Status(StatusCode),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot carry a path.
    #[error("catalog base URL cannot be a base: {0}")]
    InvalidBaseUrl(Url),
}

/// Catalog list envelope.
#[derive(Debug, Deserialize)]
struct ProductPage {
    products: Vec<serde_json::Value>,
}

/// Client for the public product catalog.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Http` if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("cartwheel-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
        })
    }

    /// List catalog products, optionally restricted to one category.
    ///
    /// Entries that fail product validation are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Timeout` if the catalog does not answer in time,
    /// or another `CatalogError` if the request or parsing fails.
    #[tracing::instrument(skip(self))]
    pub async fn list_products(
        &self,
        category: Option<&str>,
    ) -> Result<Arc<Vec<Product>>, CatalogError> {
        let category = category.map(str::trim).filter(|c| !c.is_empty());
        let key = CacheKey::Products {
            category: category.map(str::to_owned),
        };
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&key).await {
            tracing::debug!("Cache hit for catalog list");
            return Ok(products);
        }

        let mut url = match category {
            Some(slug) => self.endpoint(&["products", "category", slug])?,
            None => self.endpoint(&["products"])?,
        };
        url.query_pairs_mut().append_pair("limit", "0");

        let body = self.get_json(url, "products").await?;
        let page: ProductPage = serde_json::from_value(body)?;
        let products = Arc::new(collect_valid(page.products));

        self.inner
            .cache
            .insert(key, CacheValue::Products(Arc::clone(&products)))
            .await;
        Ok(products)
    }

    /// Get a single catalog product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the catalog has no such product.
    #[tracing::instrument(skip(self, id), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        let key = CacheKey::Product(id.clone());
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            tracing::debug!("Cache hit for catalog product");
            return Ok(*product);
        }

        let url = self.endpoint(&["products", id.as_str()])?;
        let body = self.get_json(url, id.as_str()).await?;
        let product: Product = serde_json::from_value(body)?;

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    /// Build a URL below the base by appending percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidBaseUrl(self.inner.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json(&self, url: Url, what: &str) -> Result<serde_json::Value, CatalogError> {
        let response = self
            .inner
            .client
            .get(url)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(what.to_owned()));
        }
        if !status.is_success() {
            tracing::error!(status = %status, "Catalog returned non-success status");
            return Err(CatalogError::Status(status));
        }

        response.json().await.map_err(classify)
    }
}

fn classify(err: reqwest::Error) -> CatalogError {
    if err.is_timeout() {
        CatalogError::Timeout
    } else {
        CatalogError::Http(err)
    }
}

fn collect_valid(values: Vec<serde_json::Value>) -> Vec<Product> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Product>(value) {
            Ok(product) => Some(product),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping invalid catalog product");
                None
            }
        })
        .collect()
}
