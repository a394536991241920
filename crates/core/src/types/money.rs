//! Decimal money and quantity types.
//!
//! Prices are typed in by hand while standing in a shop aisle, so parsing is
//! forgiving about currency symbols and decimal commas. Storage is
//! `NUMERIC(12,2)` for money and `NUMERIC(10,3)` for quantities.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors produced when parsing a [`Money`] or [`Quantity`] from user input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// Nothing was entered.
    #[error("amount cannot be empty")]
    Empty,
    /// The input is not a number.
    #[error("'{0}' is not a number")]
    NotANumber(String),
    /// Money cannot be negative.
    #[error("amount cannot be negative")]
    Negative,
    /// Quantities must be greater than zero.
    #[error("quantity must be greater than zero")]
    NotPositive,
    /// The value does not fit the database column.
    #[error("amount is too large")]
    TooLarge,
}

/// A non-negative amount of money with two decimal places.
///
/// ```
/// use basket_core::Money;
///
/// assert_eq!(Money::parse_input("$2,49").unwrap().to_string(), "$2.49");
/// assert_eq!(Money::parse_input("1,234.5").unwrap().to_string(), "$1234.50");
/// assert!(Money::parse_input("-1").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest value a `NUMERIC(12,2)` column holds.
    const MAX: Decimal = Decimal::from_parts(0xd4a50fff, 0xe8, 0, false, 2); // 999_999_999_999 scale 2

    /// Build from a decimal, rounding half away from zero to cents.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::Negative`] or [`AmountError::TooLarge`].
    pub fn new(amount: Decimal) -> Result<Self, AmountError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(AmountError::Negative);
        }
        let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if rounded > Self::MAX {
            return Err(AmountError::TooLarge);
        }
        rounded.rescale(2);
        Ok(Self(rounded))
    }

    /// Build from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// Parse a price typed by a user.
    ///
    /// Accepts an optional leading `$`, `€` or `£`, and either `.` or `,` as the
    /// decimal separator. When both appear, `,` is treated as a thousands
    /// separator.
    ///
    /// # Errors
    ///
    /// Returns an [`AmountError`] if the input is empty, not a number, negative,
    /// or out of range.
    pub fn parse_input(input: &str) -> Result<Self, AmountError> {
        let decimal = parse_decimal(input.trim().trim_start_matches(['$', '€', '£']))?;
        Self::new(decimal)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Whether this amount is exactly zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Add two amounts, failing if the sum leaves the storable range.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::TooLarge`].
    pub fn checked_add(self, rhs: Self) -> Result<Self, AmountError> {
        self.0
            .checked_add(rhs.0)
            .ok_or(AmountError::TooLarge)
            .and_then(Self::new)
    }

    /// Replace `old` with `new` inside this running total.
    ///
    /// A stale total smaller than `old` is treated as zero before adding.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::TooLarge`] if the result leaves the storable range.
    pub fn replace_part(self, old: Self, new: Self) -> Result<Self, AmountError> {
        Self::new((self.0 - old.0).max(Decimal::ZERO) + new.0)
    }

    /// Plain two-decimal rendering without a currency symbol, for form inputs.
    #[must_use]
    pub fn plain(self) -> String {
        format!("{:.2}", self.0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Money {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// A strictly positive quantity with up to three decimal places (e.g. 1.5 kg).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(Decimal);

impl Quantity {
    /// One unit, the default for a newly added item.
    pub const ONE: Self = Self(Decimal::ONE);

    /// Largest value a `NUMERIC(10,3)` column holds.
    const MAX: Decimal = Decimal::from_parts(0x540be3ff, 0x2, 0, false, 3); // 9_999_999_999 scale 3

    /// Build from a decimal, rounding to three places.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::NotPositive`] or [`AmountError::TooLarge`].
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        let rounded = value.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero);
        if rounded <= Decimal::ZERO {
            return Err(AmountError::NotPositive);
        }
        if rounded > Self::MAX {
            return Err(AmountError::TooLarge);
        }
        Ok(Self(rounded.normalize()))
    }

    /// Parse a quantity typed by a user. Empty input means one unit.
    ///
    /// # Errors
    ///
    /// Returns an [`AmountError`] if the input is not a positive number in range.
    pub fn parse_input(input: &str) -> Result<Self, AmountError> {
        if input.trim().is_empty() {
            return Ok(Self::ONE);
        }
        Self::new(parse_decimal(input.trim())?)
    }

    /// The underlying decimal value.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

/// Total price of a line: `quantity × unit_price`, rounded to cents.
///
/// A line without a unit price has not been priced yet and costs nothing.
///
/// # Errors
///
/// Returns [`AmountError::TooLarge`] when the product does not fit in
/// `NUMERIC(12,2)`, even though each factor does.
pub fn line_total(quantity: Quantity, unit_price: Option<Money>) -> Result<Money, AmountError> {
    let Some(price) = unit_price else {
        return Ok(Money::ZERO);
    };
    let product = quantity.0.checked_mul(price.0).ok_or(AmountError::TooLarge)?;
    Money::new(product)
}

fn parse_decimal(input: &str) -> Result<Decimal, AmountError> {
    if input.is_empty() {
        return Err(AmountError::Empty);
    }
    let normalized = if input.contains(',') && input.contains('.') {
        input.replace(',', "")
    } else {
        input.replace(',', ".")
    };
    Decimal::from_str(&normalized).map_err(|_| AmountError::NotANumber(input.to_owned()))
}

macro_rules! decimal_sqlx {
    ($name:ident) => {
        #[cfg(feature = "postgres")]
        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                Ok(Self(<Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?))
            }
        }

        #[cfg(feature = "postgres")]
        impl sqlx::Encode<'_, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

decimal_sqlx!(Money);
decimal_sqlx!(Quantity);
