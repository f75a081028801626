//! Non-negative decimal prices.
//!
//! Amounts keep full precision; rounding to cents happens only in
//! [`Price::display`].

use core::fmt;
use core::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative price in the store currency.
///
/// Serialized as a decimal string so no digits are lost. Deserialization
/// accepts numbers or numeric strings and rejects negative amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// The unrounded amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a quantity, saturating at the largest representable amount.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Format rounded to two decimal places, midpoints away from zero.
    ///
    /// ```
    /// use cartwheel_core::Price;
    /// use rust_decimal::Decimal;
    ///
    /// let price = Price::new(Decimal::new(2005, 3)).unwrap();
    /// assert_eq!(price.display(), "2.01");
    /// assert_eq!(price.amount(), Decimal::new(2005, 3));
    /// ```
    #[must_use]
    pub fn display(&self) -> String {
        let mut rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(2);
        rounded.to_string()
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative() {
        assert!(matches!(
            Price::new(Decimal::new(-1, 2)),
            Err(PriceError::Negative(_))
        ));
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_display_pads_and_rounds() {
        assert_eq!(Price::from_cents(2500).display(), "25.00");
        assert_eq!(Price::new(Decimal::new(1, 0)).unwrap().display(), "1.00");
        assert_eq!(Price::new(Decimal::new(12_344, 3)).unwrap().display(), "12.34");
        assert_eq!(Price::new(Decimal::new(12_345, 3)).unwrap().display(), "12.35");
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [Price::from_cents(1000).times(2), Price::from_cents(500)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(2500));
    }

    #[test]
    fn test_deserialize_number_and_string() {
        let a: Price = serde_json::from_str("9.99").unwrap();
        let b: Price = serde_json::from_str("\"9.99\"").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.amount(), Decimal::new(999, 2));
        assert!(serde_json::from_str::<Price>("-4").is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Price::from_cents(1999)).unwrap();
        assert_eq!(json, "\"19.99\"");
    }

    #[test]
    fn test_json_keeps_full_precision() {
        let amount: Decimal = "12345678901234.123456789".parse().unwrap();
        let price = Price::new(amount).unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"12345678901234.123456789\"");
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
        assert_eq!(back.amount().scale(), 9);

        let wide = Price::new("1234567890.123456789012345678".parse().unwrap()).unwrap();
        let value = serde_json::to_value(wide).unwrap();
        let back: Price = serde_json::from_value(value).unwrap();
        assert_eq!(back.amount(), wide.amount());
    }
}
