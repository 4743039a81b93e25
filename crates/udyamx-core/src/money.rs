//! # Money Module
//!
//! Provides the `Money` type for handling rupee amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │    2 × 24.00 + 5 × 7.50 = 85.5 then toFixed(2) to hide the noise        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    2 × 2400 + 5 × 750 = 8550 paise = ₹85.50, exactly                   │
//! │    An invoice total never needs rounding after the fact                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use udyamx_core::money::Money;
//!
//! // Create from paise (preferred)
//! let price = Money::from_paise(750); // ₹7.50
//!
//! // Arithmetic operations
//! let line = price * 5;               // ₹37.50
//! let total = line + Money::from_paise(4800); // ₹85.50
//! assert_eq!(total.to_string(), "₹85.50");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in paise (1/100 of a rupee).
///
/// ## Design Decisions
/// - **i64 (signed)**: Arithmetic stays closed under subtraction
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serialized as a bare integer**: storage records hold paise
/// - **Saturating arithmetic**: an absurd quantity or price pins the
///   amount at `i64::MIN`/`i64::MAX` instead of overflowing
///
/// ## Where Money is Used
/// ```text
/// Product.price ──┬──► InvoiceItem.price ──► line total ──► Invoice.total
///                 │
///                 └──► Displayed as "₹28.00" in lists and print output
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use udyamx_core::money::Money;
    ///
    /// let price = Money::from_paise(2800); // ₹28.00
    /// assert_eq!(price.paise(), 2800);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from rupees and paise.
    ///
    /// ## Example
    /// ```rust
    /// use udyamx_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupees_paise(12, 50).paise(), 1250);
    /// assert_eq!(Money::from_rupees_paise(-5, 50).paise(), -550);
    /// ```
    ///
    /// ## Note
    /// For negative amounts only the rupee part carries the sign.
    #[inline]
    pub const fn from_rupees_paise(rupees: i64, paise: i64) -> Self {
        if rupees < 0 {
            Money(rupees.saturating_mul(100).saturating_sub(paise))
        } else {
            Money(rupees.saturating_mul(100).saturating_add(paise))
        }
    }

    /// Parses a decimal amount as typed by a user ("7.5", "12.50", "28").
    ///
    /// ## Rules
    /// - Optional leading `₹`, surrounding whitespace ignored
    /// - At most two fractional digits (no silent rounding)
    /// - A leading `-` is accepted; range checks belong to validation
    ///
    /// ## Example
    /// ```rust
    /// use udyamx_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("7.5").unwrap().paise(), 750);
    /// assert_eq!(Money::parse_decimal("₹12.05").unwrap().paise(), 1205);
    /// assert!(Money::parse_decimal("1.999").is_err());
    /// ```
    pub fn parse_decimal(input: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim().trim_start_matches('₹').trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("must be a number"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("must be a number"));
        }
        if frac.len() > 2 {
            return Err(invalid("at most two decimal places"));
        }

        let rupees: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("amount too large"))?
        };
        let paise: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid("must be a number"))? * 10,
            _ => frac.parse().map_err(|_| invalid("must be a number"))?,
        };

        let total = rupees
            .checked_mul(100)
            .and_then(|r| r.checked_add(paise))
            .ok_or_else(|| invalid("amount too large"))?;

        Ok(Money(if negative { -total } else { total }))
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use udyamx_core::money::Money;
    ///
    /// let unit_price = Money::from_paise(2400); // ₹24.00
    /// assert_eq!(unit_price.multiply_quantity(2).paise(), 4800);
    /// assert_eq!(unit_price.multiply_quantity(i64::MAX).paise(), i64::MAX);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Formats the amount as a plain decimal without the currency sign
    /// ("85.50"), the form used inside tables and the print document.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the amount with the rupee sign: `₹85.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise() {
        let money = Money::from_paise(1099);
        assert_eq!(money.paise(), 1099);
        assert_eq!(money.rupees(), 10);
        assert_eq!(money.paise_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_paise(1099).to_string(), "₹10.99");
        assert_eq!(Money::from_paise(500).to_string(), "₹5.00");
        assert_eq!(Money::from_paise(-550).to_string(), "-₹5.50");
        assert_eq!(Money::zero().to_string(), "₹0.00");
        assert_eq!(Money::from_paise(8550).to_decimal_string(), "85.50");
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(Money::parse_decimal("28").unwrap().paise(), 2800);
        assert_eq!(Money::parse_decimal("7.5").unwrap().paise(), 750);
        assert_eq!(Money::parse_decimal(" 12.05 ").unwrap().paise(), 1205);
        assert_eq!(Money::parse_decimal(".5").unwrap().paise(), 50);
        assert_eq!(Money::parse_decimal("-3.25").unwrap().paise(), -325);

        assert!(Money::parse_decimal("").is_err());
        assert!(Money::parse_decimal("abc").is_err());
        assert!(Money::parse_decimal("1.234").is_err());
        assert!(Money::parse_decimal("1,000").is_err());
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_paise(1000);
        let b = Money::from_paise(500);

        assert_eq!((a + b).paise(), 1500);
        assert_eq!((a - b).paise(), 500);
        assert_eq!((a * 3).paise(), 3000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.paise(), 2000);
    }

    #[test]
    fn test_oversized_amounts_saturate() {
        let biggest = Money::parse_decimal("92233720368547758.07").unwrap();
        assert_eq!(biggest.paise(), i64::MAX);

        assert_eq!((biggest * 2).paise(), i64::MAX);
        assert_eq!(Money::from_paise(1).multiply_quantity(i64::MAX).paise(), i64::MAX);
        assert_eq!((biggest + Money::from_paise(1)).paise(), i64::MAX);
        assert_eq!((Money::from_paise(i64::MIN) - Money::from_paise(1)).paise(), i64::MIN);

        let total: Money = vec![biggest, biggest, Money::from_paise(-5)].into_iter().sum();
        assert_eq!(total.paise(), i64::MAX - 5);
    }

    /// The float version of this invoice needed toFixed(2); integer paise do not.
    #[test]
    fn test_invoice_total_is_exact() {
        let croissants = Money::from_paise(2400).multiply_quantity(2);
        let loaves = Money::from_paise(750).multiply_quantity(5);
        assert_eq!((croissants + loaves).to_string(), "₹85.50");

        let dimes: Money = (0..3).map(|_| Money::from_paise(10)).sum();
        assert_eq!(dimes.paise(), 30);
    }

    #[test]
    fn test_serializes_as_bare_integer() {
        let json = serde_json::to_string(&Money::from_paise(2800)).unwrap();
        assert_eq!(json, "2800");
    }
}
