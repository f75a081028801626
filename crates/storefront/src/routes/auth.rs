//! Account handlers: login, registration, token introspection and logout.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use cartwheel_core::api::{
    AuthResponse, LoginRequest, MessageBody, MsgBody, RegisterRequest, UserProfile,
};

use crate::error::{ApiJson, AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::RequireUser;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// `POST /api/auth/login`
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let (user, token) = AuthService::new(state.pool(), state.config().token_ttl)
        .login(&request)
        .await?;

    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

    Ok(Json(AuthResponse {
        token,
        user: user.profile(),
    }))
}

/// Registration failures answer with `{ "msg": ... }` instead of `{ "message": ... }`.
#[derive(Debug)]
pub struct RegisterError(AppError);

impl From<AppError> for RegisterError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for RegisterError {
    fn into_response(self) -> Response {
        let Self(err) = self;
        if err.status().is_client_error() {
            (StatusCode::BAD_REQUEST, Json(MsgBody::new(err.client_message()))).into_response()
        } else {
            err.into_response()
        }
    }
}

/// `POST /api/auth/register`
#[instrument(skip(state, body))]
pub async fn register(
    State(state): State<AppState>,
    body: std::result::Result<ApiJson<RegisterRequest>, AppError>,
) -> std::result::Result<(StatusCode, Json<MsgBody>), RegisterError> {
    let ApiJson(request) = body?;

    AuthService::new(state.pool(), state.config().token_ttl)
        .register(&request)
        .await
        .map_err(AppError::from)?;

    Ok((
        StatusCode::CREATED,
        Json(MsgBody::new("User registered successfully")),
    ))
}

/// `GET /api/auth/me`
#[instrument(skip_all)]
pub async fn me(RequireUser { user, .. }: RequireUser) -> Json<UserProfile> {
    Json(user.profile())
}

/// `POST /api/auth/logout`
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    RequireUser { user, token }: RequireUser,
) -> Result<Json<MessageBody>> {
    AuthService::new(state.pool(), state.config().token_ttl)
        .logout(&token)
        .await?;

    clear_sentry_user();
    tracing::info!(user_id = %user.id, "User logged out");
    Ok(Json(MessageBody::new("Logged out")))
}
