//! Seed the local product store from a YAML file.
//!
//! The file is a list of products in the same shape the API accepts. It is
//! parsed and validated in full before the database is touched; products
//! whose id is already taken are skipped, so seeding twice is harmless.
//!
//! ```bash
//! cw seed products crates/cli/fixtures/products.yaml
//! ```

use std::path::Path;

use thiserror::Error;

use cartwheel_core::Product;
use cartwheel_storefront::db::{ProductRepository, RepositoryError};

use super::{DatabaseError, connect, notify};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid seed file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Outcome of a seeding run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Parse a seed file's contents.
fn parse_products(content: &str) -> Result<Vec<Product>, SeedError> {
    Ok(serde_yaml::from_str(content)?)
}

/// Insert every product from `file_path` that is not already stored.
///
/// # Errors
///
/// Returns `SeedError` if the file cannot be read or parsed, or a database
/// operation other than a duplicate insert fails.
pub async fn products(file_path: &Path) -> Result<SeedSummary, SeedError> {
    let content = tokio::fs::read_to_string(file_path)
        .await
        .map_err(|source| SeedError::Read {
            path: file_path.display().to_string(),
            source,
        })?;
    let products = parse_products(&content)?;
    tracing::info!(count = products.len(), path = %file_path.display(), "Parsed seed file");

    let pool = connect().await?;
    let repo = ProductRepository::new(&pool);

    let mut summary = SeedSummary::default();
    for product in &products {
        match repo.create(product).await {
            Ok(_) => summary.inserted += 1,
            Err(RepositoryError::Conflict(_)) => {
                tracing::debug!(product_id = %product.product_id, "Already stored, skipping");
                summary.skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    notify(format_args!(
        "Seeding complete: {} inserted, {} skipped (already stored)",
        summary.inserted, summary.skipped
    ));
    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cartwheel_core::ProductId;

    use super::*;

    #[test]
    fn test_fixture_parses() {
        let products = parse_products(include_str!("../../fixtures/products.yaml")).unwrap();
        assert_eq!(products.len(), 4);

        let tea = &products[0];
        assert_eq!(tea.product_id, ProductId::parse("tea-earl-grey").unwrap());
        assert_eq!(tea.price.display(), "8.50");
        assert!(products.iter().any(|p| !p.in_stock()));
    }

    #[test]
    fn test_invalid_product_rejects_whole_file() {
        let yaml = "- product_id: 1\n  title: Ok\n  price: 1\n- product_id: 2\n  title: Bad\n  price: -3\n";
        assert!(matches!(parse_products(yaml), Err(SeedError::Parse(_))));
    }
}
