//! Authentication service.
//!
//! Email/password accounts with Argon2 hashes, and opaque bearer tokens
//! stored server-side with an expiry.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use rand::RngCore as _;
use sqlx::PgPool;

use cartwheel_core::api::{LoginRequest, RegisterRequest};
use cartwheel_core::{Email, RegistrationForm, Role};

use crate::db::RepositoryError;
use crate::db::tokens::AuthTokenRepository;
use crate::db::users::{NewUser, UserRepository};
use crate::models::user::User;

/// Random bytes per bearer token.
const TOKEN_BYTES: usize = 32;

/// Authentication service.
///
/// Handles registration, login, and bearer token lifecycle.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tokens: AuthTokenRepository<'a>,
    token_ttl: chrono::Duration,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, token_ttl: chrono::Duration) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens: AuthTokenRepository::new(pool),
            token_ttl,
        }
    }

    /// Register a new customer account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if any field fails the form checks.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, AuthError> {
        self.create_account(request, Role::Customer).await
    }

    /// Create an account with an explicit role.
    ///
    /// # Errors
    ///
    /// Same as [`AuthService::register`].
    pub async fn create_account(
        &self,
        request: &RegisterRequest,
        role: Role,
    ) -> Result<User, AuthError> {
        let form = RegistrationForm {
            name: request.name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            password: request.password.clone(),
        };
        form.validate().map_err(AuthError::Validation)?;

        let email = Email::parse(&request.email)?;
        let password_hash = hash_password(&request.password)?;

        let user = self
            .users
            .create(NewUser {
                name: &request.name,
                email: &email,
                phone: &request.phone,
                password_hash: &password_hash,
                role,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, role = %user.role, "Account created");
        Ok(user)
    }

    /// Login with email and password, issuing a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email is malformed.
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or the
    /// password is wrong.
    pub async fn login(&self, request: &LoginRequest) -> Result<(User, String), AuthError> {
        let email = Email::parse(request.email.trim())?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(&request.password, &password_hash)?;

        let token = self.issue_token(&user).await?;
        Ok((user, token))
    }

    /// Issue a new bearer token for a user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the token cannot be stored.
    pub async fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        match self.tokens.purge_expired().await {
            Ok(0) => {}
            Ok(purged) => tracing::debug!(purged, "Purged expired tokens"),
            Err(e) => tracing::warn!(error = %e, "Failed to purge expired tokens"),
        }

        let token = generate_token();
        let expires_at = Utc::now() + self.token_ttl;
        self.tokens.insert(user.id, &token, expires_at).await?;
        Ok(token)
    }

    /// Resolve a bearer token to its user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token is unknown or expired.
    pub async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        self.tokens
            .find_user(token)
            .await?
            .ok_or(AuthError::InvalidToken)
    }

    /// Revoke a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token was not active.
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        if self.tokens.revoke(token).await? {
            Ok(())
        } else {
            Err(AuthError::InvalidToken)
        }
    }
}

/// Generate an opaque bearer token: random bytes, base64url without padding.
#[must_use]
pub fn generate_token() -> String {
    let mut bytes = [0_u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Hash a password using Argon2.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
