//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64 minor units, fen for CNY) to avoid
//! floating-point precision issues. Provides safe arithmetic operations and
//! formatting.
//!
//! Single amounts are limited to `Money::MAX_AMOUNT` so that sums over a
//! store stay far from the `i64` range. Arithmetic saturates rather than
//! wrapping.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Symbol used by `Display`
pub const DEFAULT_CURRENCY_SYMBOL: &str = "¥";

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Largest magnitude a single amount may carry: one trillion currency units
    pub const MAX_AMOUNT: Money = Money(100_000_000_000_000);

    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use budgetmill::models::Money;
    /// let amount = Money::from_cents(1050); // ¥10.50
    /// assert_eq!(amount.to_string(), "¥10.50");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole currency units
    pub const fn from_major(units: i64) -> Self {
        Self(units * 100)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Whether the magnitude is within `MAX_AMOUNT`
    pub const fn is_within_limit(&self) -> bool {
        self.0.saturating_abs() <= Self::MAX_AMOUNT.0
    }

    /// Clamp negative amounts to zero
    pub fn floor_zero(self) -> Self {
        Self(self.0.max(0))
    }

    /// `self / denominator` as a display ratio; zero when the denominator is not positive
    pub fn ratio(&self, denominator: Money) -> f64 {
        if denominator.0 <= 0 {
            return 0.0;
        }
        self.0 as f64 / denominator.0 as f64
    }

    /// Evenly divide over `parts`, truncating toward zero
    pub fn average_over(&self, parts: i64) -> Self {
        if parts <= 0 {
            return Self::zero();
        }
        Self(self.0 / parts)
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "¥10.50", "$10.50", "10", "10.5".
    /// More than two fractional digits, or a magnitude above `MAX_AMOUNT`, is
    /// rejected.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let input = s.trim();

        let (negative, rest) = match input.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, input),
        };

        let rest = rest
            .strip_prefix(DEFAULT_CURRENCY_SYMBOL)
            .or_else(|| rest.strip_prefix('$'))
            .unwrap_or(rest)
            .trim();

        let invalid = || MoneyParseError::InvalidFormat(input.to_string());
        let too_large = || MoneyParseError::TooLarge(input.to_string());

        let (whole, fraction) = match rest.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (rest, ""),
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.len() > 2 {
            return Err(MoneyParseError::TooPrecise(input.to_string()));
        }

        let units: i64 = whole.parse().map_err(|_| too_large())?;
        let cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(too_large)?;
        if total > Self::MAX_AMOUNT.0 {
            return Err(too_large());
        }

        Ok(Self(if negative { -total } else { total }))
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!("-{}{}.{:02}", symbol, self.major().abs(), self.cents_part())
        } else {
            format!("{}{}.{:02}", symbol, self.major(), self.cents_part())
        }
    }

    /// Plain decimal rendering without a symbol ("-12.50")
    pub fn to_decimal_string(&self) -> String {
        self.format_with_symbol("")
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol(DEFAULT_CURRENCY_SYMBOL))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    TooPrecise(String),
    TooLarge(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::TooPrecise(s) => {
                write!(f, "Amount has more than two decimal places: {}", s)
            }
            MoneyParseError::TooLarge(s) => write!(
                f,
                "Amount exceeds the maximum of {}: {}",
                Money::MAX_AMOUNT.to_decimal_string(),
                s
            ),
        }
    }
}

impl std::error::Error for MoneyParseError {}
