//! Integration tests for the session cart and wishlist.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied (`cw migrate`)
//! - The storefront server running (cargo run -p cartwheel-storefront)
//!
//! The cart lives in the session, so each test uses its own cookie jar.

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use cartwheel_integration_tests::{amount, session_client, storefront_url, unique_product_id};

async fn dispatch(client: &Client, action: Value) -> Value {
    let base_url = storefront_url();
    let resp = client
        .post(format!("{base_url}/api/cart/actions"))
        .json(&action)
        .send()
        .await
        .expect("Failed to dispatch action");
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.expect("Failed to parse cart")
}

fn product(id: &str, price: f64) -> Value {
    json!({"product_id": id, "title": "Cart Test Item", "price": price, "stock": 3})
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_cart_follows_session() {
    let client = session_client();
    let id = unique_product_id();

    let cart = dispatch(
        &client,
        json!({"type": "add_to_cart", "product": product(&id, 2.5), "quantity": 0}),
    )
    .await;
    assert_eq!(cart["lines"][0]["quantity"], 1);

    let cart = dispatch(&client, json!({"type": "increment_quantity", "product_id": id})).await;
    assert_eq!(cart["item_count"], 2);
    assert_eq!(amount(&cart["total"]), Some(5.0));

    let cart = dispatch(
        &client,
        json!({"type": "update_quantity", "product_id": id, "quantity": -5}),
    )
    .await;
    assert_eq!(cart["lines"][0]["quantity"], 1);

    // Same cookie jar, same cart
    let cart: Value = client
        .get(format!("{}/api/cart", storefront_url()))
        .send()
        .await
        .expect("Failed to get cart")
        .json()
        .await
        .expect("Failed to parse cart");
    assert_eq!(cart["item_count"], 1);

    // A fresh session starts empty
    let other: Value = session_client()
        .get(format!("{}/api/cart", storefront_url()))
        .send()
        .await
        .expect("Failed to get cart")
        .json()
        .await
        .expect("Failed to parse cart");
    assert_eq!(other["item_count"], 0);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_wishlist_toggle_round_trip() {
    let client = session_client();
    let base_url = storefront_url();
    let id = unique_product_id();

    for _ in 0..2 {
        dispatch(
            &client,
            json!({"type": "toggle_wishlist", "product": product(&id, 1.0)}),
        )
        .await;
    }

    let wishlist: Value = client
        .get(format!("{base_url}/api/wishlist"))
        .send()
        .await
        .expect("Failed to get wishlist")
        .json()
        .await
        .expect("Failed to parse wishlist");
    assert_eq!(wishlist["products"], json!([]));
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_malformed_action_rejected() {
    let client = session_client();
    let base_url = storefront_url();

    let resp = client
        .post(format!("{base_url}/api/cart/actions"))
        .json(&json!({"type": "empty_cart"}))
        .send()
        .await
        .expect("Failed to send action");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
