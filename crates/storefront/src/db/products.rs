//! Product repository for the local product store.
//!
//! Products are keyed by their merchant-assigned id. Rows are validated on
//! the way out so a hand-edited table cannot leak an invalid [`Product`].

use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use cartwheel_core::{Price, Product, ProductId, ProductPatch, Rating};

use super::RepositoryError;

const PRODUCT_COLUMNS: &str =
    "product_id, title, price, thumbnail, rating, stock, description, category, brand, sku";

/// Raw `storefront.product` row.
#[derive(Debug, FromRow)]
struct ProductRow {
    product_id: String,
    title: String,
    price: Decimal,
    thumbnail: Option<String>,
    rating: Option<f64>,
    stock: i64,
    description: Option<String>,
    category: Option<String>,
    brand: Option<String>,
    sku: Option<String>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let corrupt =
            |what: &str, e: &dyn std::fmt::Display| RepositoryError::DataCorruption(format!(
                "invalid {what} for product {}: {e}",
                row.product_id
            ));

        let product_id = ProductId::parse(&row.product_id).map_err(|e| corrupt("id", &e))?;
        let price = Price::new(row.price).map_err(|e| corrupt("price", &e))?;
        let rating = row
            .rating
            .map(Rating::new)
            .transpose()
            .map_err(|e| corrupt("rating", &e))?;
        let stock = u32::try_from(row.stock).map_err(|e| corrupt("stock", &e))?;

        Ok(Self {
            product_id,
            title: row.title,
            price,
            thumbnail: row.thumbnail,
            rating,
            stock,
            description: row.description,
            category: row.category,
            brand: row.brand,
            sku: row.sku,
        })
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the product id is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, product: &Product) -> Result<Product, RepositoryError> {
        let sql = format!(
            "INSERT INTO storefront.product \
                 (product_id, title, price, thumbnail, rating, stock, description, category, brand, sku) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {PRODUCT_COLUMNS}"
        );

        let row: ProductRow = sqlx::query_as(&sql)
            .bind(product.product_id.as_str())
            .bind(&product.title)
            .bind(product.price.amount())
            .bind(product.thumbnail.as_deref())
            .bind(product.rating.map(Rating::value))
            .bind(i64::from(product.stock))
            .bind(product.description.as_deref())
            .bind(product.category.as_deref())
            .bind(product.brand.as_deref())
            .bind(product.sku.as_deref())
            .fetch_one(self.pool)
            .await
            .map_err(|e| RepositoryError::from_insert(e, "product id already exists"))?;

        row.try_into()
    }

    /// List every product, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product ORDER BY created_at, product_id"
        );

        let rows: Vec<ProductRow> = sqlx::query_as(&sql).fetch_all(self.pool).await?;
        rows.into_iter().map(Product::try_from).collect()
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM storefront.product WHERE product_id = $1");

        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id.as_str())
            .fetch_optional(self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    /// Apply a partial update and return the stored product.
    ///
    /// The row is locked for the duration of the read-modify-write.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this id.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: &ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let current = lock_product(&mut tx, id)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        let updated = patch.apply_to(&current);

        let sql = format!(
            "UPDATE storefront.product SET \
                 title = $2, price = $3, thumbnail = $4, rating = $5, stock = $6, \
                 description = $7, category = $8, brand = $9, sku = $10, updated_at = now() \
             WHERE product_id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        );

        let row: ProductRow = sqlx::query_as(&sql)
            .bind(id.as_str())
            .bind(&updated.title)
            .bind(updated.price.amount())
            .bind(updated.thumbnail.as_deref())
            .bind(updated.rating.map(Rating::value))
            .bind(i64::from(updated.stock))
            .bind(updated.description.as_deref())
            .bind(updated.category.as_deref())
            .bind(updated.brand.as_deref())
            .bind(updated.sku.as_deref())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        row.try_into()
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this id.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: &ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM storefront.product WHERE product_id = $1")
            .bind(id.as_str())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

async fn lock_product(
    tx: &mut Transaction<'_, Postgres>,
    id: &ProductId,
) -> Result<Option<Product>, RepositoryError> {
    let sql = format!(
        "SELECT {PRODUCT_COLUMNS} FROM storefront.product WHERE product_id = $1 FOR UPDATE"
    );

    let row: Option<ProductRow> = sqlx::query_as(&sql)
        .bind(id.as_str())
        .fetch_optional(&mut **tx)
        .await?;

    row.map(Product::try_from).transpose()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row() -> ProductRow {
        ProductRow {
            product_id: "sku-1".to_string(),
            title: "Kettle".to_string(),
            price: Decimal::new(2499, 2),
            thumbnail: None,
            rating: Some(4.5),
            stock: 3,
            description: None,
            category: Some("kitchen".to_string()),
            brand: None,
            sku: None,
        }
    }

    #[test]
    fn test_row_converts_to_product() {
        let product = Product::try_from(row()).unwrap();
        assert_eq!(product.product_id.as_str(), "sku-1");
        assert_eq!(product.price.display(), "24.99");
        assert_eq!(product.stock, 3);
    }

    #[test]
    fn test_corrupt_rows_are_rejected() {
        let mut negative = row();
        negative.price = Decimal::new(-1, 0);
        assert!(matches!(
            Product::try_from(negative),
            Err(RepositoryError::DataCorruption(_))
        ));

        let mut rating = row();
        rating.rating = Some(7.0);
        assert!(matches!(
            Product::try_from(rating),
            Err(RepositoryError::DataCorruption(msg)) if msg.contains("sku-1")
        ));

        let mut stock = row();
        stock.stock = -2;
        assert!(Product::try_from(stock).is_err());
    }
}
