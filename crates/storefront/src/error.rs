//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Server-side failures are
//! captured to Sentry before responding; clients only ever see a JSON
//! `{ "message": ... }` body with a safe message.

use axum::{
    Json,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use cartwheel_core::api::MessageBody;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::catalog::CatalogError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Catalog request failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Catalog(CatalogError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Catalog(CatalogError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            Self::Catalog(_) => StatusCode::BAD_GATEWAY,
            Self::Auth(AuthError::InvalidToken) => StatusCode::UNAUTHORIZED,
            Self::Auth(AuthError::Repository(_) | AuthError::PasswordHash) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Auth(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to show the client.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Database(RepositoryError::NotFound) => "Not found".to_string(),
            Self::Database(RepositoryError::Conflict(detail)) => detail.clone(),
            Self::Catalog(CatalogError::NotFound(_)) => "Product not found".to_string(),
            Self::Catalog(CatalogError::Timeout) => "Catalog timed out".to_string(),
            Self::Catalog(_) => "External service error".to_string(),
            Self::Auth(err) => err
                .client_message()
                .unwrap_or_else(|| "Internal server error".to_string()),
            Self::NotFound(message) | Self::BadRequest(message) => message.clone(),
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }

    /// Capture server-side failures to Sentry.
    pub(crate) fn report(&self) {
        let status = self.status();
        if status.is_server_error() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                status = status.as_u16(),
                sentry_event_id = %event_id,
                "Request error"
            );
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.report();
        (self.status(), Json(MessageBody::new(self.client_message()))).into_response()
    }
}

/// JSON body extractor whose rejections use the storefront error body.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context after a successful login.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context on logout.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_message(err: AppError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: MessageBody = serde_json::from_slice(&bytes).unwrap();
        (status, body.message)
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Product not found".to_string());
        assert_eq!(err.to_string(), "Not found: Product not found");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::Database(RepositoryError::Conflict("dup".into())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Auth(AuthError::InvalidToken).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Auth(AuthError::InvalidCredentials).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Catalog(CatalogError::Timeout).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            AppError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let (status, message) =
            body_message(AppError::NotFound("Product not found".to_string())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "Product not found");
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let (status, message) = body_message(AppError::Database(
            RepositoryError::DataCorruption("row 7 is bad".into()),
        ))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Internal server error");
    }
}
