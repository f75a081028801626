//! Integration tests for the local product store.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied (`cw migrate`)
//! - The storefront server running (cargo run -p cartwheel-storefront)

use reqwest::StatusCode;
use serde_json::{Value, json};

use cartwheel_integration_tests::{
    amount, product_body, session_client, storefront_url, unique_product_id,
};

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_product_crud_lifecycle() {
    let client = session_client();
    let base_url = storefront_url();
    let id = unique_product_id();

    // Create
    let resp = client
        .post(format!("{base_url}/api/products"))
        .json(&product_body(&id, "Integration Kettle", 24.5))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = resp.json().await.expect("Failed to parse product");
    assert_eq!(created["product_id"], id.as_str());
    assert_eq!(amount(&created["price"]), Some(24.5));

    // Read
    let resp = client
        .get(format!("{base_url}/api/products/{id}"))
        .send()
        .await
        .expect("Failed to get product");
    assert_eq!(resp.status(), StatusCode::OK);

    // Listed
    let list: Vec<Value> = client
        .get(format!("{base_url}/api/products"))
        .send()
        .await
        .expect("Failed to list products")
        .json()
        .await
        .expect("Failed to parse list");
    assert!(list.iter().any(|p| p["product_id"] == id.as_str()));

    // Partial update keeps untouched fields
    let resp = client
        .put(format!("{base_url}/api/products/{id}"))
        .json(&json!({"price": 19.99}))
        .send()
        .await
        .expect("Failed to update product");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("Failed to parse product");
    assert_eq!(amount(&updated["price"]), Some(19.99));
    assert_eq!(updated["title"], "Integration Kettle");

    // Delete
    let resp = client
        .delete(format!("{base_url}/api/products/{id}"))
        .send()
        .await
        .expect("Failed to delete product");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["message"], "Product deleted");

    // Gone
    let resp = client
        .get(format!("{base_url}/api/products/{id}"))
        .send()
        .await
        .expect("Failed to get product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_duplicate_product_id_conflicts() {
    let client = session_client();
    let base_url = storefront_url();
    let id = unique_product_id();

    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        let resp = client
            .post(format!("{base_url}/api/products"))
            .json(&product_body(&id, "Twin", 1.0))
            .send()
            .await
            .expect("Failed to create product");
        assert_eq!(resp.status(), expected);
    }

    let _ = client
        .delete(format!("{base_url}/api/products/{id}"))
        .send()
        .await;
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_invalid_product_rejected() {
    let client = session_client();
    let base_url = storefront_url();

    let resp = client
        .post(format!("{base_url}/api/products"))
        .json(&json!({"product_id": unique_product_id(), "title": "Bad", "price": -1}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert!(body["message"].is_string());
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_missing_product_operations_are_not_found() {
    let client = session_client();
    let base_url = storefront_url();
    let id = unique_product_id();

    let resp = client
        .put(format!("{base_url}/api/products/{id}"))
        .json(&json!({"title": "Ghost"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client
        .delete(format!("{base_url}/api/products/{id}"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
