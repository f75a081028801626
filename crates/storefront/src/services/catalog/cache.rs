//! Cache types for catalog responses.

use std::sync::Arc;

use cartwheel_core::{Product, ProductId};

/// Cache key for catalog lookups.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    Products { category: Option<String> },
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Arc<Vec<Product>>),
}
