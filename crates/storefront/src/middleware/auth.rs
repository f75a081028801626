//! Bearer token extractors.
//!
//! Clients send `Authorization: Bearer <token>` as returned by login. The
//! token is opaque; only the server can resolve it to a user.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::AppError;
use crate::models::User;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// The raw bearer token from the `Authorization` header.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl BearerToken {
    /// Parse an `Authorization` header value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let (scheme, token) = value.trim().split_once(' ')?;
        let token = token.trim();
        (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty())
            .then(|| Self(token.to_owned()))
    }
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(Self::parse)
            .ok_or(AppError::Auth(AuthError::InvalidToken))
    }
}

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireUser { user, .. }: RequireUser) -> String {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireUser {
    pub user: User,
    pub token: String,
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;

        let user = AuthService::new(state.pool(), state.config().token_ttl)
            .authenticate(&token)
            .await?;

        tracing::Span::current().record("user_id", user.id.as_i32());
        Ok(Self { user, token })
    }
}
