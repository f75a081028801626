//! Identifier types.
//!
//! Database-assigned ids use the `define_id!` macro so ids from different
//! tables cannot be mixed up. Products are keyed by a merchant-assigned
//! [`ProductId`] instead, which arrives as either a JSON string or a JSON
//! integer depending on the source.

use core::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_i32()`
/// - `From<i32>` and `Into<i32>` implementations
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use cartwheel_core::define_id;
/// define_id!(UserId);
/// define_id!(TokenId);
///
/// let user_id = UserId::new(1);
/// let token_id = TokenId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: UserId = token_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <i32 as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <i32 as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

define_id!(UserId);

/// Errors that can occur when parsing a [`ProductId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductIdError {
    /// The input is empty or only whitespace.
    #[error("product id cannot be empty")]
    Empty,
    /// The input is longer than [`ProductId::MAX_LENGTH`].
    #[error("product id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// Merchant-assigned product identifier.
///
/// Unique per product and stable across edits. Numeric ids from the public
/// catalog are normalized to their decimal string form, so `1` and `"1"`
/// name the same product.
///
/// ```
/// use cartwheel_core::ProductId;
///
/// let from_number: ProductId = serde_json::from_str("7").unwrap();
/// let from_string: ProductId = serde_json::from_str("\"7\"").unwrap();
/// assert_eq!(from_number, from_string);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductId(String);

impl ProductId {
    /// Maximum length of a product id.
    pub const MAX_LENGTH: usize = 128;

    /// Parse a `ProductId`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty or too long.
    pub fn parse(s: &str) -> Result<Self, ProductIdError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ProductIdError::Empty);
        }
        if trimmed.len() > Self::MAX_LENGTH {
            return Err(ProductIdError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ProductId {
    type Err = ProductIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for ProductId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

struct ProductIdVisitor;

impl Visitor<'_> for ProductIdVisitor {
    type Value = ProductId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a product id string or integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        ProductId::parse(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(ProductId::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u64::try_from(v)
            .map(ProductId::from)
            .map_err(|_| E::custom("product id cannot be negative"))
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ProductIdVisitor)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for ProductId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for ProductId {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for ProductId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_number_and_string_are_same_id() {
        let a: ProductId = serde_json::from_str("42").unwrap();
        let b: ProductId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "42");
    }

    #[test]
    fn test_serializes_as_string() {
        let id = ProductId::from(5);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"5\"");
    }

    #[test]
    fn test_rejects_blank_and_negative() {
        assert!(serde_json::from_str::<ProductId>("\"  \"").is_err());
        assert!(serde_json::from_str::<ProductId>("-3").is_err());
        assert!(serde_json::from_str::<ProductId>("1.5").is_err());
    }

    #[test]
    fn test_parse_trims() {
        let id = ProductId::parse("  sku-9 ").unwrap();
        assert_eq!(id.to_string(), "sku-9");
    }

    #[test]
    fn test_parse_too_long() {
        let long = "x".repeat(ProductId::MAX_LENGTH + 1);
        assert_eq!(
            ProductId::parse(&long),
            Err(ProductIdError::TooLong {
                max: ProductId::MAX_LENGTH
            })
        );
    }

    #[test]
    fn test_usable_as_map_key() {
        let mut map = BTreeMap::new();
        map.insert(ProductId::from(1), 10);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"1":10}"#);

        let back: BTreeMap<ProductId, i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_user_id_roundtrip() {
        let id = UserId::new(3);
        assert_eq!(i32::from(id), 3);
        assert_eq!(id.to_string(), "3");
    }
}
