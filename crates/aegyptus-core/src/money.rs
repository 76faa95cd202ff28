//! # Money Module
//!
//! Provides the `Money` type for every price, line total and order total
//! in the Bazaar.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  A cart summed in floats:                                               │
//! │    3 × $19.99 + $0.10 = 60.06999999999999  ❌                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    3 × 1999 + 10 = 6007 cents = $60.07  ✅                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use aegyptus_core::money::Money;
//!
//! let price = Money::from_cents(2500); // $25.00
//! let line = price.multiply_quantity(3);
//! assert_eq!(line.cents(), 7500);
//! assert_eq!(line.to_string(), "$75.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD).
///
/// ## Where Money is Used
/// ```text
/// CatalogSnapshot.unit_price ──► LineItem.unit_price ──► LineItem.line_total
///                                                               │
///                                         Cart.subtotal ◄───────┘
///                                               │
///                         OrderSummary { subtotal + shipping + tax = total }
/// ```
///
/// Serializes as a bare integer, which is also what the persisted cart
/// stores in its `unitPrice` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use aegyptus_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-dollar portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Calculates tax on this amount, rounding half up to the nearest cent.
    ///
    /// ## Implementation
    /// Integer math on basis points: `(amount * bps + 5000) / 10000`.
    ///
    /// ```rust
    /// use aegyptus_core::money::Money;
    /// use aegyptus_core::types::TaxRate;
    ///
    /// // $25.50 at 7% = $1.785 → $1.79
    /// let tax = Money::from_cents(2550).calculate_tax(TaxRate::from_bps(700));
    /// assert_eq!(tax.cents(), 179);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 so large subtotals cannot overflow the intermediate product
        let tax_cents = (i128::from(self.0) * i128::from(rate.bps()) + 5000) / 10000;
        Money(i64::try_from(tax_cents).unwrap_or(i64::MAX))
    }

    /// Multiplies a unit price by a line quantity, saturating at the
    /// representable bounds.
    ///
    /// ```rust
    /// use aegyptus_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1000).multiply_quantity(2).cents(), 2000);
    /// assert_eq!(Money::from_cents(i64::MAX).multiply_quantity(2).cents(), i64::MAX);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug/log formatting. The storefront does its own localized display.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Saturates at the `i64` bounds.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

/// Summing line totals into a subtotal. Saturates like [`Add`].
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
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(2500).to_string(), "$25.00");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_sum_of_line_totals() {
        let lines = [
            Money::from_cents(1000).multiply_quantity(2),
            Money::from_cents(500) * 1,
        ];
        let subtotal: Money = lines.iter().sum();
        assert_eq!(subtotal.cents(), 2500);

        let empty: Money = Vec::<Money>::new().into_iter().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // $10.00 at 7% = $0.70 exactly
        assert_eq!(
            Money::from_cents(1000).calculate_tax(TaxRate::from_bps(700)).cents(),
            70
        );
        // $0.50 at 7% = 3.5 cents → 4
        assert_eq!(
            Money::from_cents(50).calculate_tax(TaxRate::from_bps(700)).cents(),
            4
        );
        assert!(Money::from_cents(9999)
            .calculate_tax(TaxRate::zero())
            .is_zero());
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Money::from_cents(i64::MAX);
        assert_eq!(max.multiply_quantity(u32::MAX), max);
        assert_eq!(max + Money::from_cents(1), max);
        assert_eq!(max * 3, max);

        let total: Money = [max, max, Money::from_cents(10)].iter().sum();
        assert_eq!(total, max);

        // 100% of the largest amount still fits
        assert_eq!(max.calculate_tax(TaxRate::from_bps(10_000)), max);
        assert_eq!(max.calculate_tax(TaxRate::from_bps(u32::MAX)), max);
    }

    #[test]
    fn test_serializes_as_integer_cents() {
        let json = serde_json::to_string(&Money::from_cents(2500)).unwrap();
        assert_eq!(json, "2500");
        let back: Money = serde_json::from_str("1999").unwrap();
        assert_eq!(back, Money::from_cents(1999));
    }
}
