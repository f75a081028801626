//! Bearer token repository.
//!
//! Tokens are opaque random strings. A token resolves to its user only while
//! unexpired; expired rows are purged opportunistically on login.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use cartwheel_core::UserId;

use super::RepositoryError;
use super::users::{USER_COLUMNS, UserRow};
use crate::models::user::User;

/// Repository for auth token database operations.
pub struct AuthTokenRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AuthTokenRepository<'a> {
    /// Create a new token repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a freshly issued token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(
        &self,
        user_id: UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO storefront.auth_token (token, user_id, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Resolve an unexpired token to its user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_user(&self, token: &str) -> Result<Option<User>, RepositoryError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM storefront.auth_token t \
             JOIN storefront.user u ON u.id = t.user_id \
             WHERE t.token = $1 AND t.expires_at > now()"
        );

        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(token)
            .fetch_optional(self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    /// Revoke a token. Returns whether a token was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn revoke(&self, token: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM storefront.auth_token WHERE token = $1")
            .bind(token)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every expired token. Returns the number removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn purge_expired(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM storefront.auth_token WHERE expires_at <= now()")
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
