//! Cartwheel Core - Shared types and storefront state.
//!
//! This crate provides the types shared by every Cartwheel component:
//! - `storefront` - HTTP API for products, auth, and session carts
//! - `cli` - Storefront client, migrations, and user management
//!
//! # Architecture
//!
//! The core crate contains only types, validation, and pure state transitions.
//! No I/O, no database access, no HTTP clients. The cart and wishlist can be
//! exercised without a server or a UI.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, and roles
//! - [`product`] - Product schema validated at deserialization
//! - [`cart`] / [`wishlist`] - Keyed line and membership maps
//! - [`store`] - The [`ShopState`] container and its [`Action`] reducer
//! - [`validation`] - Login and registration form checks
//! - [`api`] - Request and response bodies shared by server and client

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod product;
pub mod store;
pub mod types;
pub mod validation;
pub mod wishlist;

pub use cart::{CartLine, CartState, DELIVERY_CHARGE};
pub use product::{Product, ProductError, ProductPatch, Rating};
pub use store::{Action, ShopState};
pub use types::*;
pub use validation::{Field, FieldErrors, LoginForm, RegistrationForm};
pub use wishlist::{WishlistEntry, WishlistState};
