//! Form checks run before any request is sent.
//!
//! Each form reports every failing field at once, with the message to show
//! next to it. A form that passes still goes through server-side checks.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::types::{Email, EmailError};

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// A form field that can carry an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Email,
    Phone,
    Password,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Password => "password",
        })
    }
}

/// Field-level validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, &'static str>);

impl FieldErrors {
    fn insert(&mut self, field: Field, message: &'static str) {
        self.0.insert(field, message);
    }

    /// Message for a field, if it failed.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    /// Whether every field passed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Failing fields with their messages, in field order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Check an email field.
fn check_email(errors: &mut FieldErrors, email: &str) {
    match Email::parse(email) {
        Ok(_) => {}
        Err(EmailError::Empty) => errors.insert(Field::Email, "Email is required"),
        Err(_) => errors.insert(Field::Email, "Email is invalid"),
    }
}

/// Check a password field.
fn check_password(errors: &mut FieldErrors, password: &str) {
    if password.is_empty() {
        errors.insert(Field::Password, "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.insert(Field::Password, "Password must be at least 6 characters");
    }
}

/// Login form input.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns the failing fields and their messages.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        check_email(&mut errors, &self.email);
        check_password(&mut errors, &self.password);
        errors.into_result()
    }
}

/// Registration form input.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl RegistrationForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns the failing fields and their messages.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if self.name.trim().is_empty() {
            errors.insert(Field::Name, "Name is required");
        }
        check_email(&mut errors, &self.email);
        if self.phone.trim().is_empty() {
            errors.insert(Field::Phone, "Phone is required");
        }
        check_password(&mut errors, &self.password);
        errors.into_result()
    }
}
