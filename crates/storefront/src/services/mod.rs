//! Business services for the storefront.

pub mod auth;
pub mod catalog;
