//! Type-safe price representation using decimal arithmetic.
//!
//! Prices travel as plain JSON numbers (both from the remote API and in the
//! local snapshot), so [`Price`] serializes through `rust_decimal`'s float
//! adapter while doing all formatting on the exact decimal value. Amounts
//! are kept at the precision that adapter can carry, so a stored price reads
//! back unchanged.

use core::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
    /// The input is not a decimal number.
    #[error("price is not a number: {0}")]
    NotANumber(String),
}

/// A non-negative price in the catalog's display currency (BRL).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// Digits beyond what a JSON float can hold are dropped, so
    /// `19.999999999999999999` becomes `20`.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(float_precision(amount)?.normalize()))
    }

    /// Create a price from a floating point amount as received over JSON.
    ///
    /// The shortest decimal representation of `amount` is used, so `9.99`
    /// becomes exactly `9.99` rather than its binary approximation.
    ///
    /// # Errors
    ///
    /// Returns an error if `amount` is negative, not finite, or out of the
    /// decimal range.
    pub fn from_f64(amount: f64) -> Result<Self, PriceError> {
        if !amount.is_finite() {
            return Err(PriceError::NotANumber(amount.to_string()));
        }
        let decimal = Decimal::from_str(&amount.to_string())
            .map_err(|_| PriceError::NotANumber(amount.to_string()))?;
        Self::new(decimal)
    }

    /// Parse a price from user input such as `"19.90"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is not a decimal number or is
    /// negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        let decimal =
            Decimal::from_str(trimmed).map_err(|_| PriceError::NotANumber(trimmed.to_owned()))?;
        Self::new(decimal)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display in Brazilian Portuguese, e.g. `R$ 1.234,56`.
    #[must_use]
    pub fn display_brl(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let plain = format!("{rounded:.2}");
        let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

        let digits: Vec<char> = int_part.chars().collect();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, digit) in digits.iter().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(*digit);
        }

        format!("R$ {grouped},{frac_part}")
    }
}

/// The decimal a float-serialized `amount` reads back as.
fn float_precision(amount: Decimal) -> Result<Decimal, PriceError> {
    amount
        .to_f64()
        .and_then(|float| Decimal::from_str(&float.to_string()).ok())
        .ok_or_else(|| PriceError::NotANumber(amount.to_string()))
}

impl Default for Price {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
