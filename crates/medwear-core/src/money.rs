//! # Money Module
//!
//! Provides the `Money` type for monetary values in the storefront.
//!
//! ## Rounding Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WHERE ROUNDING HAPPENS                                                 │
//! │                                                                         │
//! │  Catalog price ──► line total ──► cart total ──► discount/tax/total    │
//! │        (full precision all the way through the pipeline)               │
//! │                                                                         │
//! │  Only the final display step rounds to two decimal places:             │
//! │    Money(7.199999999999999).to_string() == "$7.20"                     │
//! │                                                                         │
//! │  A 10% discount on $29.99 is $2.999; tax is charged on $26.991,        │
//! │  not on a pre-rounded $26.99.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use medwear_core::money::Money;
//!
//! let price = Money::from_dollars(39.99);
//! let line_total = price.multiply_quantity(2);
//! assert_eq!(line_total.to_string(), "$79.98");
//! assert_eq!(line_total.rounded_cents(), 7998);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in major currency units (dollars for USD).
///
/// ## Design Decisions
/// - **f64 dollars**: catalog prices, persisted cart records and the views
///   all speak plain decimal numbers; the value is carried unrounded
/// - **Single field tuple struct**: serializes as a bare JSON number, so the
///   persisted `price` field stays a number
/// - **No Eq/Hash**: floating point values are compared through
///   [`Money::rounded_cents`] when an exact comparison is needed
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  Product.price ──┬──► CartLine.line_total ──► Cart.cart_total          │
/// │                  │                                                      │
/// │                  └──► Displayed as "$39.99" on the product card         │
/// │                                                                         │
/// │  Cart.cart_total ──► PricingPolicy::calculate ──► OrderTotals.total    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(f64);

impl Money {
    /// Creates a Money value from a dollar amount.
    ///
    /// ## Example
    /// ```rust
    /// use medwear_core::money::Money;
    ///
    /// let price = Money::from_dollars(42.99);
    /// assert_eq!(price.dollars(), 42.99);
    /// ```
    #[inline]
    pub const fn from_dollars(amount: f64) -> Self {
        Money(amount)
    }

    /// Returns the unrounded amount in dollars.
    #[inline]
    pub const fn dollars(&self) -> f64 {
        self.0
    }

    /// Returns the amount rounded to whole cents (half away from zero).
    ///
    /// ## Example
    /// ```rust
    /// use medwear_core::money::Money;
    ///
    /// assert_eq!(Money::from_dollars(2.999).rounded_cents(), 300);
    /// assert_eq!(Money::from_dollars(-5.5).rounded_cents(), -550);
    /// ```
    pub fn rounded_cents(&self) -> i64 {
        (self.0 * 100.0).round() as i64
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0.0)
    }

    /// Checks if the value is exactly zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > 0.0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < 0.0
    }

    /// Checks that the value is a real number (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Calculates tax on this amount at the given rate, unrounded.
    ///
    /// ## Example
    /// ```rust
    /// use medwear_core::money::Money;
    /// use medwear_core::types::TaxRate;
    ///
    /// let taxable = Money::from_dollars(90.0);
    /// let tax = taxable.calculate_tax(TaxRate::from_bps(800)); // 8%
    /// assert_eq!(tax.to_string(), "$7.20");
    /// ```
    ///
    /// ## User Workflow
    /// ```text
    /// Subtotal $100.00, promo WELCOME10
    ///      │
    ///      ▼
    /// Taxable: $100.00 - $10.00 = $90.00
    ///      │
    ///      ▼
    /// calculate_tax(8%) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Tax: $7.20
    /// ```
    #[inline]
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        Money(self.0 * rate.fraction())
    }

    /// Returns the given share of this amount, in basis points (1000 = 10%).
    ///
    /// ## Example
    /// ```rust
    /// use medwear_core::money::Money;
    ///
    /// let subtotal = Money::from_dollars(100.0);
    /// assert_eq!(subtotal.portion_bps(1000).to_string(), "$10.00");
    /// ```
    #[inline]
    pub fn portion_bps(&self, bps: u32) -> Money {
        Money(self.0 * (f64::from(bps) / 10_000.0))
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use medwear_core::money::Money;
    ///
    /// let unit_price = Money::from_dollars(34.99);
    /// assert_eq!(unit_price.multiply_quantity(3).to_string(), "$104.97");
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0 * f64::from(qty))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display rounds to two decimals: the only place rounding is applied.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cents = self.rounded_cents();
        let sign = if cents < 0 { "-" } else { "" };
        let cents = cents.abs();
        write!(f, "{}${}.{:02}", sign, cents / 100, cents % 100)
    }
}

/// Default money is zero.
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

/// Multiplication by a line quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_dollars(10.99)), "$10.99");
        assert_eq!(format!("{}", Money::from_dollars(5.0)), "$5.00");
        assert_eq!(format!("{}", Money::from_dollars(-5.5)), "-$5.50");
        assert_eq!(format!("{}", Money::zero()), "$0.00");
    }

    #[test]
    fn test_display_rounds_only_at_the_end() {
        // 10% of 29.99 keeps its third decimal internally
        let discount = Money::from_dollars(29.99).portion_bps(1000);
        assert!((discount.dollars() - 2.999).abs() < 1e-9);
        assert_eq!(discount.to_string(), "$3.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_dollars(10.0);
        let b = Money::from_dollars(5.0);

        assert_eq!((a + b).rounded_cents(), 1500);
        assert_eq!((a - b).rounded_cents(), 500);
        assert_eq!((a * 3).rounded_cents(), 3000);
    }

    #[test]
    fn test_sum() {
        let total: Money = [39.99, 42.99, 59.99]
            .into_iter()
            .map(Money::from_dollars)
            .sum();
        assert_eq!(total.rounded_cents(), 14297);
    }

    #[test]
    fn test_tax_calculation() {
        let amount = Money::from_dollars(50.0);
        let tax = amount.calculate_tax(TaxRate::from_bps(800));
        assert_eq!(tax.rounded_cents(), 400);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_dollars(-1.0);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().rounded_cents(), 100);
    }

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&Money::from_dollars(39.99)).unwrap();
        assert_eq!(json, "39.99");

        let back: Money = serde_json::from_str("42.99").unwrap();
        assert_eq!(back, Money::from_dollars(42.99));
    }
}
