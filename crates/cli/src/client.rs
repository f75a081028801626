//! HTTP client for the storefront API.
//!
//! Form input is validated locally before anything is sent; a failing form
//! never reaches the network. Every request is bounded by the configured
//! timeout and is not retried.

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use cartwheel_core::api::{AuthResponse, LoginRequest, MsgBody, RegisterRequest, UserProfile};
use cartwheel_core::{FieldErrors, LoginForm, Product, ProductId, RegistrationForm};

use crate::config::ClientConfig;

/// Failures surfaced to the user as a single notification line.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Form input failed local validation.
    #[error("{0}")]
    Validation(FieldErrors),

    /// The requested resource does not exist.
    #[error("Not found")]
    NotFound,

    /// The server rejected the request.
    #[error("{message} (HTTP {status})")]
    Server { status: StatusCode, message: String },

    /// The server could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The server did not answer in time.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a body we could not read.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Error body shapes used by the storefront.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
}

/// Client for the storefront API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Network` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("cw/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
        })
    }

    /// Log in and receive a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` without sending anything if the form
    /// is invalid, or `ClientError::Server` carrying the server's message.
    pub async fn login(&self, form: &LoginForm) -> Result<AuthResponse, ClientError> {
        form.validate().map_err(ClientError::Validation)?;

        let body = LoginRequest {
            email: form.email.trim().to_owned(),
            password: form.password.clone(),
        };
        let url = self.endpoint(&["api", "auth", "login"])?;
        self.send(self.client.post(url).json(&body)).await
    }

    /// Register a new account. Returns the server's confirmation message.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` without sending anything if the form
    /// is invalid, or `ClientError::Server` carrying the server's message.
    pub async fn register(&self, form: &RegistrationForm) -> Result<String, ClientError> {
        form.validate().map_err(ClientError::Validation)?;

        let body = RegisterRequest {
            name: form.name.trim().to_owned(),
            email: form.email.trim().to_owned(),
            phone: form.phone.trim().to_owned(),
            password: form.password.clone(),
        };
        let url = self.endpoint(&["api", "auth", "register"])?;
        let created: MsgBody = self.send(self.client.post(url).json(&body)).await?;
        Ok(created.msg)
    }

    /// Resolve the current token to its account.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Server` with status 401 if the token is not active.
    pub async fn me(&self, token: &str) -> Result<UserProfile, ClientError> {
        let url = self.endpoint(&["api", "auth", "me"])?;
        self.send(self.client.get(url).bearer_auth(token)).await
    }

    /// Revoke the current token.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Server` with status 401 if the token is not active.
    pub async fn logout(&self, token: &str) -> Result<(), ClientError> {
        let url = self.endpoint(&["api", "auth", "logout"])?;
        let _: serde_json::Value = self.send(self.client.post(url).bearer_auth(token)).await?;
        Ok(())
    }

    /// List catalog products, optionally for one category.
    ///
    /// # Errors
    ///
    /// Returns a `ClientError` if the request fails.
    pub async fn catalog_products(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<Product>, ClientError> {
        let mut url = self.endpoint(&["api", "catalog", "products"])?;
        if let Some(category) = category {
            url.query_pairs_mut().append_pair("category", category);
        }
        self.send(self.client.get(url)).await
    }

    /// Get one catalog product.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the catalog has no such product.
    pub async fn catalog_product(&self, id: &ProductId) -> Result<Product, ClientError> {
        let url = self.endpoint(&["api", "catalog", "products", id.as_str()])?;
        self.send(self.client.get(url)).await
    }

    /// List the local product store.
    ///
    /// # Errors
    ///
    /// Returns a `ClientError` if the request fails.
    pub async fn store_products(&self) -> Result<Vec<Product>, ClientError> {
        let url = self.endpoint(&["api", "products"])?;
        self.send(self.client.get(url)).await
    }

    /// Get one product from the local store.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the store has no such product.
    pub async fn store_product(&self, id: &ProductId) -> Result<Product, ClientError> {
        let url = self.endpoint(&["api", "products", id.as_str()])?;
        self.send(self.client.get(url)).await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::Network(format!("invalid API URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::Server {
                status,
                message: error_message(status, &text),
            });
        }

        Ok(response.json().await?)
    }
}

/// Pick the human-readable message out of an error response.
fn error_message(status: StatusCode, text: &str) -> String {
    let body: ErrorBody = serde_json::from_str(text).unwrap_or_default();
    body.message
        .or(body.msg)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_owned()
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use cartwheel_core::Field;

    use super::*;

    /// Points at a port nothing listens on; any request would be a network error.
    fn offline_client() -> ApiClient {
        ApiClient::new(&ClientConfig {
            api_url: Url::parse("http://127.0.0.1:9").unwrap(),
            state_path: PathBuf::from("unused.json"),
            timeout: Duration::from_secs(1),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_invalid_login_never_hits_network() {
        let form = LoginForm {
            email: "abc".to_owned(),
            password: "secret123".to_owned(),
        };
        match offline_client().login(&form).await {
            Err(ClientError::Validation(errors)) => {
                assert_eq!(errors.get(Field::Email), Some("Email is invalid"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_registration_never_hits_network() {
        let result = offline_client()
            .register(&RegistrationForm::default())
            .await;
        assert!(matches!(result, Err(ClientError::Validation(e)) if e.iter().count() == 4));
    }

    #[tokio::test]
    async fn test_valid_login_reaches_network() {
        let form = LoginForm {
            email: "shopper@example.com".to_owned(),
            password: "123456".to_owned(),
        };
        assert!(matches!(
            offline_client().login(&form).await,
            Err(ClientError::Network(_) | ClientError::Timeout)
        ));
    }

    #[test]
    fn test_endpoint_encodes_ids() {
        let client = offline_client();
        let url = client
            .endpoint(&["api", "products", "sku 1/2"])
            .unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9/api/products/sku%201%2F2");
    }

    #[test]
    fn test_error_message_prefers_server_text() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"message":"Invalid credentials"}"#),
            "Invalid credentials"
        );
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"msg":"User already exists"}"#),
            "User already exists"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "<html>"),
            "Bad Gateway"
        );
    }
}
