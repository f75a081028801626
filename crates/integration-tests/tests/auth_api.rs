//! Integration tests for registration, login and bearer tokens.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied (`cw migrate`)
//! - The storefront server running (cargo run -p cartwheel-storefront)

use reqwest::StatusCode;
use serde_json::{Value, json};

use cartwheel_integration_tests::{session_client, storefront_url, unique_registration};

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_register_login_me_logout() {
    let client = session_client();
    let base_url = storefront_url();
    let registration = unique_registration();

    let resp = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&registration)
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["msg"], "User registered successfully");

    let resp = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({
            "email": registration["email"],
            "password": registration["password"],
        }))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse body");
    let token = body["token"].as_str().expect("token missing").to_owned();
    assert_eq!(body["user"]["role"], "customer");
    assert_eq!(body["user"]["email"], registration["email"]);

    let resp = client
        .get(format!("{base_url}/api/auth/me"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to call me");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .post(format!("{base_url}/api/auth/logout"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to log out");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/api/auth/me"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to call me");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_duplicate_registration() {
    let client = session_client();
    let base_url = storefront_url();
    let registration = unique_registration();

    for expected in [StatusCode::CREATED, StatusCode::BAD_REQUEST] {
        let resp = client
            .post(format!("{base_url}/api/auth/register"))
            .json(&registration)
            .send()
            .await
            .expect("Failed to register");
        assert_eq!(resp.status(), expected);
        if expected == StatusCode::BAD_REQUEST {
            let body: Value = resp.json().await.expect("Failed to parse body");
            assert_eq!(body["msg"], "User already exists");
        }
    }
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_login_rejections_share_one_message() {
    let client = session_client();
    let base_url = storefront_url();
    let registration = unique_registration();

    client
        .post(format!("{base_url}/api/auth/register"))
        .json(&registration)
        .send()
        .await
        .expect("Failed to register");

    let attempts = [
        json!({"email": registration["email"], "password": "wrong password"}),
        json!({"email": "nobody-here@example.com", "password": "whatever1"}),
    ];
    for attempt in attempts {
        let resp = client
            .post(format!("{base_url}/api/auth/login"))
            .json(&attempt)
            .send()
            .await
            .expect("Failed to send login");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = resp.json().await.expect("Failed to parse body");
        assert_eq!(body["message"], "Invalid credentials");
    }
}
