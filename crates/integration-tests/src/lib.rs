//! Integration tests for Cartwheel.
//!
//! # Running Tests
//!
//! ```bash
//! # Start Postgres, apply the schema and start the server
//! cw migrate
//! TRUST_PROXY_HEADERS=true cargo run -p cartwheel-storefront
//!
//! # Run the ignored tests against it
//! cargo test -p cartwheel-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `products_api` - Local product store CRUD
//! - `auth_api` - Registration, login, bearer tokens
//! - `cart_api` - Session cart and wishlist
//!
//! Set `STOREFRONT_URL` to test a server somewhere other than
//! `http://localhost:5000`.

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{Value, json};
use uuid::Uuid;

/// Read a price field, which the API sends as a decimal string.
#[must_use]
pub fn amount(value: &Value) -> Option<f64> {
    value.as_str().and_then(|s| s.parse().ok())
}

/// Base URL for the storefront API.
#[must_use]
pub fn storefront_url() -> String {
    std::env::var("STOREFRONT_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// HTTP client that keeps the session cookie between requests.
///
/// Each client claims its own forwarded address so the per-IP rate limits
/// on the auth routes apply per test rather than per machine. The server
/// must run with `TRUST_PROXY_HEADERS=true` for that to take effect.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn session_client() -> Client {
    let [a, b, c, ..] = *Uuid::new_v4().as_bytes();
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-forwarded-for",
        HeaderValue::from_str(&format!("10.{a}.{b}.{c}")).expect("Invalid forwarded address"),
    );

    Client::builder()
        .cookie_store(true)
        .default_headers(headers)
        .build()
        .expect("Failed to create HTTP client")
}

/// A product id no other test run will use.
#[must_use]
pub fn unique_product_id() -> String {
    format!("it-{}", Uuid::new_v4().simple())
}

/// A product body for `POST /api/products`.
#[must_use]
pub fn product_body(product_id: &str, title: &str, price: f64) -> Value {
    json!({
        "product_id": product_id,
        "title": title,
        "price": price,
        "stock": 10,
        "category": "integration-tests",
    })
}

/// Registration body with an email no other test run will use.
#[must_use]
pub fn unique_registration() -> Value {
    json!({
        "name": "Integration Shopper",
        "email": format!("shopper-{}@example.com", Uuid::new_v4().simple()),
        "phone": "555-0100",
        "password": "correct horse",
    })
}
