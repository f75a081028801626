//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};

use cartwheel_core::api::UserProfile;
use cartwheel_core::{Email, Role, UserId};

/// A registered storefront account.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email, unique across accounts.
    pub email: Email,
    /// Contact phone number.
    pub phone: String,
    /// Access level.
    pub role: Role,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Public view returned by the auth endpoints.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            role: self.role,
            created_at: self.created_at,
        }
    }
}
