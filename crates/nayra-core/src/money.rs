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
//! │                                                                         │
//! │  A day of counter sales adds up hundreds of small amounts; float        │
//! │  drift would show up in the daily summary totals.                       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    ₹48.50 is stored as 4850 paise                                       │
//! │    Sums and quantity multiplication are exact                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use nayra_core::money::Money;
//!
//! let price = Money::from_rupees(60);       // ₹60.00
//! let amount = price.checked_multiply_quantity(4).unwrap();  // ₹240.00
//! assert_eq!(amount, Money::from_rupees(240));
//! assert_eq!(amount.to_string(), "₹240.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A rupee amount in the smallest currency unit (paise).
///
/// ## Design Decisions
/// - **i64 (signed)**: Sums of sale amounts never overflow in practice and
///   subtraction stays total
/// - **Single field tuple struct**: Serializes as a plain integer
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.price ──► Sale.amount (price × qty, frozen at record time)    │
/// │                          │                                              │
/// │                          ▼                                              │
/// │  DailySummary.counter_sales / supply_sales / total_sales               │
/// │                          │                                              │
/// │                          ▼                                              │
/// │  Spreadsheet export ("₹250.00")                                        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    ///
    /// ## Example
    /// ```rust
    /// use nayra_core::money::Money;
    ///
    /// let price = Money::from_paise(4850); // ₹48.50
    /// assert_eq!(price.paise(), 4850);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Creates a Money value from rupees and paise.
    ///
    /// ## Example
    /// ```rust
    /// use nayra_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(48, 50).paise(), 4850);
    /// assert_eq!(Money::from_major_minor(-5, 50).paise(), -550);
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
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

    /// Multiplies a unit price by a quantity, `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use nayra_core::money::Money;
    ///
    /// let unit_price = Money::from_rupees(60);
    /// assert_eq!(unit_price.checked_multiply_quantity(4), Some(Money::from_rupees(240)));
    /// assert_eq!(unit_price.checked_multiply_quantity(i64::MAX / 100), None);
    /// ```
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Converts a rupee number such as `60` or `48.5` to paise, rounding to
    /// the nearest paisa. `None` for NaN, infinities and out-of-range values.
    ///
    /// ```rust
    /// use nayra_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupees_f64(60.5), Some(Money::from_paise(6050)));
    /// assert_eq!(Money::from_rupees_f64(0.1), Some(Money::from_paise(10)));
    /// assert_eq!(Money::from_rupees_f64(f64::NAN), None);
    /// ```
    pub fn from_rupees_f64(rupees: f64) -> Option<Money> {
        let paise = (rupees * 100.0).round();
        if paise.is_finite() && paise >= i64::MIN as f64 && paise < i64::MAX as f64 {
            Some(Money(paise as i64))
        } else {
            None
        }
    }

    /// The amount as a rupee number, e.g. `48.5`.
    #[inline]
    pub fn to_rupees_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Parses a user-entered rupee amount such as `"60"`, `"48.5"` or `"48.50"`.
    ///
    /// Returns `None` for anything that is not a plain decimal with at most
    /// two fractional digits.
    pub fn parse_rupees(input: &str) -> Option<Money> {
        let input = input.trim();
        let (negative, digits) = match input.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, input),
        };

        let (major, minor) = match digits.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (digits, ""),
        };

        if major.is_empty() || !major.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        if minor.len() > 2 || !minor.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let major: i64 = major.parse().ok()?;
        let minor: i64 = match minor.len() {
            0 => 0,
            1 => minor.parse::<i64>().ok()? * 10,
            _ => minor.parse().ok()?,
        };

        let paise = major.checked_mul(100)?.checked_add(minor)?;
        Some(Money(if negative { -paise } else { paise }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Displays the amount the way the reports print it: `₹250.00`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}₹{}.{:02}",
            sign,
            self.rupees().abs(),
            self.paise_part()
        )
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
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
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
        let money = Money::from_paise(4850);
        assert_eq!(money.paise(), 4850);
        assert_eq!(money.rupees(), 48);
        assert_eq!(money.paise_part(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_rupees(250).to_string(), "₹250.00");
        assert_eq!(Money::from_paise(4850).to_string(), "₹48.50");
        assert_eq!(Money::from_paise(-550).to_string(), "-₹5.50");
        assert_eq!(Money::zero().to_string(), "₹0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_rupees(10);
        let b = Money::from_rupees(5);

        assert_eq!((a + b).paise(), 1500);
        assert_eq!((a - b).paise(), 500);
    }

    #[test]
    fn test_checked_multiply_quantity() {
        let price = Money::from_rupees(60);
        assert_eq!(price.checked_multiply_quantity(4), Some(Money::from_rupees(240)));
        assert_eq!(price.checked_multiply_quantity(i64::MAX / 100), None);
        assert_eq!(Money::zero().checked_multiply_quantity(i64::MAX), Some(Money::zero()));
    }

    #[test]
    fn test_sum() {
        let amounts = [Money::from_rupees(100), Money::from_rupees(150)];
        let total: Money = amounts.iter().sum();
        assert_eq!(total, Money::from_rupees(250));
    }

    #[test]
    fn test_parse_rupees() {
        assert_eq!(Money::parse_rupees("60"), Some(Money::from_rupees(60)));
        assert_eq!(Money::parse_rupees("48.5"), Some(Money::from_paise(4850)));
        assert_eq!(Money::parse_rupees(" 48.05 "), Some(Money::from_paise(4805)));
        assert_eq!(Money::parse_rupees("-2"), Some(Money::from_rupees(-2)));
        assert_eq!(Money::parse_rupees("4.555"), None);
        assert_eq!(Money::parse_rupees("abc"), None);
        assert_eq!(Money::parse_rupees(""), None);
        assert_eq!(Money::parse_rupees(".5"), None);
    }

    #[test]
    fn test_serializes_as_integer_paise() {
        let json = serde_json::to_string(&Money::from_rupees(60)).unwrap();
        assert_eq!(json, "6000");
    }
}
