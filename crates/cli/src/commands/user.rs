//! Account management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create an account (admins are created here, never through the API)
//! cw user create -n "Ada Lovelace" -e ada@example.com -p 555-0100 --password s3cret! -r admin
//!
//! # List accounts
//! cw user list
//!
//! # Show one account
//! cw user show ada@example.com
//!
//! # Change a role
//! cw user set-role ada@example.com customer
//! ```

use thiserror::Error;

use cartwheel_core::api::RegisterRequest;
use cartwheel_core::{Email, EmailError, Role};
use cartwheel_storefront::db::{RepositoryError, UserRepository};
use cartwheel_storefront::models::User;
use cartwheel_storefront::services::auth::{AuthError, AuthService};

use super::{DatabaseError, connect, notify};

/// Errors that can occur during account management.
#[derive(Debug, Error)]
pub enum UserError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Invalid role: {0}. Valid roles: admin, customer")]
    InvalidRole(String),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("No account with email: {0}")]
    NotFound(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

fn parse_role(role: &str) -> Result<Role, UserError> {
    role.parse()
        .map_err(|_| UserError::InvalidRole(role.to_owned()))
}

fn describe(user: &User) -> String {
    format!(
        "{id:>5}  {email:<32}  {role:<8}  {name}",
        id = user.id.as_i32(),
        email = user.email.as_str(),
        role = user.role.to_string(),
        name = user.name,
    )
}

/// Create an account with the given role.
///
/// # Errors
///
/// Returns `UserError` if the role is unknown, a field fails validation, the
/// email is taken, or the database is unreachable.
pub async fn create(request: &RegisterRequest, role: &str) -> Result<User, UserError> {
    let role = parse_role(role)?;
    let pool = connect().await?;

    // No tokens are issued from the CLI.
    let service = AuthService::new(&pool, chrono::Duration::zero());
    let user = service.create_account(request, role).await?;

    notify(format_args!(
        "Created {role} account {} (id {})",
        user.email, user.id
    ));
    Ok(user)
}

/// Print every account.
///
/// # Errors
///
/// Returns `UserError` if the database is unreachable.
pub async fn list() -> Result<(), UserError> {
    let pool = connect().await?;
    let users = UserRepository::new(&pool).list().await?;

    if users.is_empty() {
        notify("No accounts");
        return Ok(());
    }
    for user in &users {
        notify(describe(user));
    }
    Ok(())
}

/// Print one account.
///
/// # Errors
///
/// Returns `UserError::NotFound` if no account has this email.
pub async fn show(email: &str) -> Result<(), UserError> {
    let email = Email::parse(email.trim())?;
    let pool = connect().await?;

    let user = UserRepository::new(&pool)
        .get_by_email(&email)
        .await?
        .ok_or_else(|| UserError::NotFound(email.to_string()))?;

    notify(describe(&user));
    notify(format_args!("       phone: {}", user.phone));
    notify(format_args!("       since: {}", user.created_at.format("%Y-%m-%d")));
    Ok(())
}

/// Change an account's role.
///
/// # Errors
///
/// Returns `UserError::NotFound` if no account has this email.
pub async fn set_role(email: &str, role: &str) -> Result<(), UserError> {
    let role = parse_role(role)?;
    let email = Email::parse(email.trim())?;
    let pool = connect().await?;

    let user = UserRepository::new(&pool)
        .set_role(&email, role)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => UserError::NotFound(email.to_string()),
            other => UserError::Repository(other),
        })?;

    tracing::info!(user_id = %user.id, %role, "Role changed");
    notify(format_args!("{} is now {}", user.email, user.role));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert!(matches!(parse_role("admin"), Ok(Role::Admin)));
        assert!(matches!(
            parse_role("super_admin"),
            Err(UserError::InvalidRole(r)) if r == "super_admin"
        ));
    }
}
