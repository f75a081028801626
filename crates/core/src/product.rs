//! Product schema.
//!
//! Products are validated when they are deserialized, so a [`Product`] value
//! always has a usable id, a non-empty title, a non-negative price, and a
//! rating inside `0..=5`. The same type is the snapshot stored in cart lines
//! and wishlist entries.
//!
//! Records from the public catalog use `id` instead of `product_id`; both
//! spellings are accepted.

use serde::{Deserialize, Serialize};

use crate::types::{Price, PriceError, ProductId};

/// Errors raised while validating product fields.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ProductError {
    /// Title is missing or blank.
    #[error("title cannot be empty")]
    EmptyTitle,
    /// Price is below zero.
    #[error(transparent)]
    Price(#[from] PriceError),
    /// Rating is outside `0..=5` or not a number.
    #[error("rating must be between 0 and 5 (got {0})")]
    RatingOutOfRange(f64),
    /// Stock is below zero or too large.
    #[error("stock must be between 0 and {max} (got {got})", max = u32::MAX)]
    InvalidStock {
        /// The rejected value.
        got: i64,
    },
}

/// Average review score between 0 and 5.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rating(f64);

impl Rating {
    /// Highest possible rating.
    pub const MAX: f64 = 5.0;

    /// Create a rating.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::RatingOutOfRange`] for values outside `0..=5`
    /// (including NaN).
    pub fn new(value: f64) -> Result<Self, ProductError> {
        if (0.0..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ProductError::RatingOutOfRange(value))
        }
    }

    /// The raw score.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Number of filled stars out of five (the score rounded down).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // bounded to 0..=5
    pub fn stars(self) -> u8 {
        self.0.floor() as u8
    }
}

impl TryFrom<f64> for Rating {
    type Error = ProductError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for f64 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// A product record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProductRecord")]
pub struct Product {
    /// Merchant-assigned identifier.
    pub product_id: ProductId,
    /// Display name.
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Thumbnail image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Average review score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    /// Units in stock.
    pub stock: u32,
    /// Long description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category slug, e.g. `groceries`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Brand name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Stock keeping unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

impl Product {
    /// Whether at least one unit is available.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Unvalidated wire shape of a [`Product`].
#[derive(Debug, Deserialize)]
struct ProductRecord {
    #[serde(alias = "id")]
    product_id: ProductId,
    title: String,
    price: Price,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    stock: Option<i64>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default)]
    sku: Option<String>,
}

impl TryFrom<ProductRecord> for Product {
    type Error = ProductError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            product_id: record.product_id,
            title: non_blank_title(record.title)?,
            price: record.price,
            thumbnail: record.thumbnail,
            rating: record.rating.map(Rating::new).transpose()?,
            stock: record.stock.map(stock_count).transpose()?.unwrap_or(0),
            description: record.description,
            category: record.category,
            brand: record.brand,
            sku: record.sku,
        })
    }
}

/// A partial update to a [`Product`].
///
/// Absent fields are left unchanged. The product id cannot be changed; an
/// id in the request body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProductPatchRecord")]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

impl ProductPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch to a product, returning the updated copy.
    #[must_use]
    pub fn apply_to(&self, product: &Product) -> Product {
        let mut updated = product.clone();
        if let Some(title) = &self.title {
            updated.title.clone_from(title);
        }
        if let Some(price) = self.price {
            updated.price = price;
        }
        if self.thumbnail.is_some() {
            updated.thumbnail.clone_from(&self.thumbnail);
        }
        if self.rating.is_some() {
            updated.rating = self.rating;
        }
        if let Some(stock) = self.stock {
            updated.stock = stock;
        }
        if self.description.is_some() {
            updated.description.clone_from(&self.description);
        }
        if self.category.is_some() {
            updated.category.clone_from(&self.category);
        }
        if self.brand.is_some() {
            updated.brand.clone_from(&self.brand);
        }
        if self.sku.is_some() {
            updated.sku.clone_from(&self.sku);
        }
        updated
    }
}

#[derive(Debug, Deserialize)]
struct ProductPatchRecord {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    price: Option<Price>,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    stock: Option<i64>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default)]
    sku: Option<String>,
}

impl TryFrom<ProductPatchRecord> for ProductPatch {
    type Error = ProductError;

    fn try_from(record: ProductPatchRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            title: record.title.map(non_blank_title).transpose()?,
            price: record.price,
            thumbnail: record.thumbnail,
            rating: record.rating.map(Rating::new).transpose()?,
            stock: record.stock.map(stock_count).transpose()?,
            description: record.description,
            category: record.category,
            brand: record.brand,
            sku: record.sku,
        })
    }
}

fn non_blank_title(title: String) -> Result<String, ProductError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ProductError::EmptyTitle);
    }
    if trimmed.len() == title.len() {
        Ok(title)
    } else {
        Ok(trimmed.to_owned())
    }
}

fn stock_count(value: i64) -> Result<u32, ProductError> {
    u32::try_from(value).map_err(|_| ProductError::InvalidStock { got: value })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_catalog_record() {
        let product: Product = serde_json::from_value(json!({
            "id": 1,
            "title": "Essence Mascara Lash Princess",
            "price": 9.99,
            "rating": 4.94,
            "stock": 5,
            "thumbnail": "https://cdn.dummyjson.com/thumb.png",
            "tags": ["beauty"],
            "dimensions": {"width": 1.0}
        }))
        .unwrap();

        assert_eq!(product.product_id, ProductId::from(1));
        assert_eq!(product.price.amount(), Decimal::new(999, 2));
        assert_eq!(product.rating.unwrap().stars(), 4);
        assert!(product.in_stock());
    }

    #[test]
    fn test_defaults_for_missing_optional_fields() {
        let product: Product =
            serde_json::from_value(json!({"product_id": "p-1", "title": "X", "price": 100}))
                .unwrap();
        assert_eq!(product.stock, 0);
        assert!(product.thumbnail.is_none());
        assert!(!product.in_stock());
    }

    #[test]
    fn test_rejects_invalid_fields() {
        let negative = json!({"id": 1, "title": "X", "price": -1});
        assert!(serde_json::from_value::<Product>(negative).is_err());

        let rating = json!({"id": 1, "title": "X", "price": 1, "rating": 5.5});
        assert!(serde_json::from_value::<Product>(rating).is_err());

        let title = json!({"id": 1, "title": "   ", "price": 1});
        assert!(serde_json::from_value::<Product>(title).is_err());

        let stock = json!({"id": 1, "title": "X", "price": 1, "stock": -2});
        assert!(serde_json::from_value::<Product>(stock).is_err());

        let missing = json!({"title": "X", "price": 1});
        assert!(serde_json::from_value::<Product>(missing).is_err());
    }

    #[test]
    fn test_serialize_uses_product_id() {
        let product: Product =
            serde_json::from_value(json!({"id": 3, "title": "X", "price": 2.5})).unwrap();
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["product_id"], json!("3"));
        assert_eq!(value["price"], json!("2.5"));
        assert!(value.get("thumbnail").is_none());
    }

    #[test]
    fn test_patch_applies_only_present_fields() {
        let product: Product = serde_json::from_value(
            json!({"id": 3, "title": "Old", "price": 2, "stock": 4, "brand": "Acme"}),
        )
        .unwrap();
        let patch: ProductPatch =
            serde_json::from_value(json!({"title": "New", "stock": 0, "product_id": "9"})).unwrap();

        let updated = patch.apply_to(&product);
        assert_eq!(updated.title, "New");
        assert_eq!(updated.stock, 0);
        assert_eq!(updated.price, product.price);
        assert_eq!(updated.brand.as_deref(), Some("Acme"));
        assert_eq!(updated.product_id, product.product_id);
    }

    #[test]
    fn test_patch_validation() {
        assert!(serde_json::from_value::<ProductPatch>(json!({"rating": -1})).is_err());
        assert!(serde_json::from_value::<ProductPatch>(json!({"title": ""})).is_err());
        assert!(
            serde_json::from_value::<ProductPatch>(json!({}))
                .unwrap()
                .is_empty()
        );
    }
}
