//! Authentication error types.

use thiserror::Error;

use cartwheel_core::{EmailError, FieldErrors};

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Registration form failed validation.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Bearer token missing, unknown or expired.
    #[error("invalid or expired token")]
    InvalidToken,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// Message safe to show the client, if this is a client-side failure.
    #[must_use]
    pub fn client_message(&self) -> Option<String> {
        match self {
            Self::Validation(errors) => errors
                .iter()
                .next()
                .map(|(_, message)| message.to_string()),
            Self::InvalidEmail(EmailError::Empty) => Some("Email is required".to_string()),
            Self::InvalidEmail(_) => Some("Email is invalid".to_string()),
            Self::InvalidCredentials => Some("Invalid credentials".to_string()),
            Self::UserAlreadyExists => Some("User already exists".to_string()),
            Self::InvalidToken => Some("Not authenticated".to_string()),
            Self::Repository(_) | Self::PasswordHash => None,
        }
    }
}
