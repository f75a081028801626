//! User repository for database operations.
//!
//! Emails are matched case-insensitively; the stored spelling is the one
//! given at registration.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use cartwheel_core::{Email, Role, UserId};

use super::RepositoryError;
use crate::models::user::User;

pub(super) const USER_COLUMNS: &str = "u.id, u.name, u.email, u.phone, u.role, u.created_at, u.updated_at";

/// Raw `storefront.user` row.
#[derive(Debug, FromRow)]
pub(super) struct UserRow {
    id: UserId,
    name: String,
    email: String,
    phone: String,
    role: Role,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            email,
            phone: row.phone,
            role: row.role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct UserWithHashRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

/// Fields for a new account.
#[derive(Debug, Clone, Copy)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a Email,
    pub phone: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_user: NewUser<'_>) -> Result<User, RepositoryError> {
        let sql = format!(
            "INSERT INTO storefront.user AS u (name, email, phone, password_hash, role) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {USER_COLUMNS}"
        );

        let row: UserRow = sqlx::query_as(&sql)
            .bind(new_user.name.trim())
            .bind(new_user.email.as_str())
            .bind(new_user.phone.trim())
            .bind(new_user.password_hash)
            .bind(new_user.role)
            .fetch_one(self.pool)
            .await
            .map_err(|e| RepositoryError::from_insert(e, "email already exists"))?;

        row.try_into()
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the email in the database is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM storefront.user u WHERE lower(u.email) = lower($1)"
        );

        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(email.as_str())
            .fetch_optional(self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    /// Get a user together with their password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let sql = format!(
            "SELECT {USER_COLUMNS}, u.password_hash \
             FROM storefront.user u WHERE lower(u.email) = lower($1)"
        );

        let row: Option<UserWithHashRow> = sqlx::query_as(&sql)
            .bind(email.as_str())
            .fetch_optional(self.pool)
            .await?;

        row.map(|r| Ok((User::try_from(r.user)?, r.password_hash)))
            .transpose()
    }

    /// List all users, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM storefront.user u ORDER BY u.id");

        let rows: Vec<UserRow> = sqlx::query_as(&sql).fetch_all(self.pool).await?;
        rows.into_iter().map(User::try_from).collect()
    }

    /// Change a user's role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has this email.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_role(&self, email: &Email, role: Role) -> Result<User, RepositoryError> {
        let sql = format!(
            "UPDATE storefront.user AS u SET role = $2, updated_at = now() \
             WHERE lower(u.email) = lower($1) \
             RETURNING {USER_COLUMNS}"
        );

        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(email.as_str())
            .bind(role)
            .fetch_optional(self.pool)
            .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }
}
