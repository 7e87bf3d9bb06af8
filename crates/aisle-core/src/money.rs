//! # Money Module
//!
//! Monetary values as integer cents.
//!
//! Floating-point arithmetic drifts (`0.1 + 0.2 != 0.3`), which is
//! unacceptable for order totals. Every amount in the system is therefore an
//! `i64` count of the smallest currency unit, and percentages (coupon
//! percent values, tax rates) are basis points (1 bps = 0.01%).
//!
//! ## Usage
//! ```rust
//! use aisle_core::money::Money;
//!
//! let price = Money::from_cents(1099); // 10.99
//! let line = price.multiply_quantity(3);
//! assert_eq!(line.cents(), 3297);
//!
//! // 8.25% of 10.00, rounded to the nearest cent
//! let tax = Money::from_cents(1000).percent_of(825);
//! assert_eq!(tax.cents(), 83);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// - `i64` (signed) so discounts and refunds can be represented
/// - single-field tuple struct: zero-cost abstraction over the raw count
/// - ordered, so `min`/`max` clamp discounts against subtotals directly
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies the amount by a line quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Computes a basis-point fraction of the amount, rounded to the
    /// nearest cent.
    ///
    /// `bps` is basis points: 825 = 8.25%, 1000 = 10%. Intermediate math is
    /// `i128` so large carts cannot overflow; the `+ 5000` term rounds the
    /// ten-thousandth to the nearest whole cent.
    ///
    /// ## Example
    /// ```rust
    /// use aisle_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(50_000);
    /// assert_eq!(subtotal.percent_of(1_000).cents(), 5_000); // 10%
    /// ```
    pub fn percent_of(&self, bps: u32) -> Money {
        let part = (self.0 as i128 * bps as i128 + 5000) / 10_000;
        Money::from_cents(part as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly display in major.minor form. UI formatting and
/// localization happen at the presentation layer, not here.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
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

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert!(!money.is_zero());
        assert!(!money.is_negative());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);

        let mut c = a;
        c += b;
        assert_eq!(c.cents(), 1500);
        c -= b;
        assert_eq!(c.cents(), 1000);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(299);
        assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    }

    #[test]
    fn test_percent_of_basic() {
        // 10.00 at 10% = 1.00
        assert_eq!(Money::from_cents(1000).percent_of(1000).cents(), 100);
    }

    #[test]
    fn test_percent_of_rounds_to_nearest_cent() {
        // 10.00 at 8.25% = 0.825 -> 0.83
        assert_eq!(Money::from_cents(1000).percent_of(825).cents(), 83);
    }

    #[test]
    fn test_ordering_supports_clamping() {
        let subtotal = Money::from_cents(800);
        let coupon_value = Money::from_cents(1000);
        assert_eq!(coupon_value.min(subtotal), subtotal);
    }
}
