//! Cartwheel Storefront library.
//!
//! The HTTP API as a library so the router can be tested without a socket
//! and the CLI can reuse the repositories and auth service.
//!
//! # Architecture
//!
//! - Axum web framework, JSON in and out
//! - `PostgreSQL` for accounts, bearer tokens, products and sessions
//! - Public catalog (dummyjson.com) proxied through a cached client
//! - Cart and wishlist held per session as a `cartwheel_core::ShopState`

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, body::Body, http::Request};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router with session, request-id and tracing layers.
///
/// Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.pool(), state.config());

    Router::new()
        .merge(routes::routes(state.config()))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                    user_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use axum::body::to_bytes;
    use axum::http::{Method, StatusCode, header};
    use secrecy::SecretString;
    use serde_json::{Value, json};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use url::Url;

    use super::*;
    use crate::config::{CatalogConfig, StorefrontConfig};

    /// State whose pool never connects; only routes that stay off the
    /// database can succeed.
    fn offline_state() -> AppState {
        let config = StorefrontConfig {
            database_url: SecretString::from("postgres://cartwheel@127.0.0.1:1/cartwheel"),
            host: "127.0.0.1".parse().unwrap(),
            port: 5000,
            base_url: "http://localhost:5000".to_string(),
            catalog: CatalogConfig {
                base_url: Url::parse("http://127.0.0.1:9").unwrap(),
                timeout: Duration::from_secs(1),
            },
            token_ttl: chrono::Duration::hours(168),
            trust_proxy_headers: true,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(500))
            .connect_lazy("postgres://cartwheel@127.0.0.1:1/cartwheel")
            .unwrap();
        AppState::new(config, pool).unwrap()
    }

    async fn send(method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-forwarded-for", "198.51.100.1");
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app(offline_state())
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(offline_state())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_readiness_reports_unreachable_database() {
        let (status, _) = send(Method::GET, "/health/ready", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_malformed_product_is_bad_request() {
        let (status, body) = send(
            Method::POST,
            "/api/products",
            Some(json!({"id": 1, "title": "Lamp", "price": -4})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_blank_product_id_is_bad_request() {
        let (status, _) = send(Method::GET, "/api/products/%20", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_with_malformed_email() {
        let (status, body) = send(
            Method::POST,
            "/api/auth/login",
            Some(json!({"email": "abc", "password": "secret1"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Email is invalid");
    }

    #[tokio::test]
    async fn test_register_validation_uses_msg_body() {
        let (status, body) = send(
            Method::POST,
            "/api/auth/register",
            Some(json!({"name": "", "email": "a@b.co", "phone": "555", "password": "123456"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["msg"], "Name is required");
        assert!(body.get("message").is_none());
    }

    #[tokio::test]
    async fn test_me_requires_bearer() {
        let (status, body) = send(Method::GET, "/api/auth/me", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Not authenticated");
    }

    #[tokio::test]
    async fn test_fresh_session_has_empty_cart() {
        let (status, body) = send(Method::GET, "/api/cart", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["lines"], json!([]));
        assert_eq!(body["item_count"], 0);
        assert_eq!(body["total"], json!("0"));

        let (status, body) = send(Method::GET, "/api/wishlist", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["products"], json!([]));
    }

    #[tokio::test]
    async fn test_unknown_cart_action_is_bad_request() {
        let (status, _) = send(
            Method::POST,
            "/api/cart/actions",
            Some(json!({"type": "empty_cart"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let (status, body) = send(Method::GET, "/api/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Route not found");
    }
}
