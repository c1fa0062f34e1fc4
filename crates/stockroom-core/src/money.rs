//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌                                  │
//! │                                                                         │
//! │  The ledger accumulates every restock and every sale for the whole     │
//! │  life of the shop. Float drift there never goes away.                  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Prices, costs, subtotals and ledger totals are all i64 cents.       │
//! │    Derived values (tax, margin cost, average cost) round once,         │
//! │    half-up, at the point they are derived.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::money::Money;
//!
//! let price = Money::from_cents(500); // $5.00
//! let line = price.checked_mul(3);    // Some($15.00)
//! assert_eq!(line.map(|m| m.cents()), Some(1500));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

use crate::types::{Percentage, TaxRate};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Where Money flows
/// ```text
/// Product.price ──► BasketLine.unit_price ──► BasketLine.subtotal
///                                                   │
///                                   Σ subtotal ─────┴──► tax ──► total
///                                        │
///                                        └──► Totals.revenue
///
/// Product.cost × restock qty ──────────────────────────► Totals.cost
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(17, 85).cents(), 1785);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax on this amount, rounding half-up to the cent.
    ///
    /// ## Implementation
    /// Integer math on basis points: `(amount * bps + 5000) / 10000`.
    ///
    /// ```rust
    /// use stockroom_core::money::Money;
    /// use stockroom_core::types::TaxRate;
    ///
    /// // $15.00 at 19% = $2.85
    /// let tax = Money::from_cents(1500).calculate_tax(TaxRate::from_bps(1900));
    /// assert_eq!(tax.cents(), 285);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 so that large ledgers cannot overflow mid-multiplication
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }

    /// Amount plus tax at `rate`.
    pub fn with_tax(&self, rate: TaxRate) -> Money {
        *self + self.calculate_tax(rate)
    }

    /// Removes a markup from a sale price: `price / (1 + margin)`.
    ///
    /// Used to derive unit cost when a restock supplies a margin instead
    /// of a cost. Rounds half-up to the cent.
    ///
    /// ```rust
    /// use stockroom_core::money::Money;
    /// use stockroom_core::types::Percentage;
    ///
    /// // $5.00 sold at a 25% markup cost $4.00
    /// let cost = Money::from_cents(500).remove_markup(Percentage::from_bps(2500));
    /// assert_eq!(cost.cents(), 400);
    /// ```
    pub fn remove_markup(&self, margin: Percentage) -> Money {
        let denominator = 10_000i128 + margin.bps() as i128;
        let scaled = self.0 as i128 * 10_000;
        Money::from_cents(((scaled + denominator / 2) / denominator) as i64)
    }

    /// `self * qty`, clamped to the i64 range.
    #[inline]
    pub const fn saturating_mul(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// `self * qty`, or `None` if the product leaves the i64 range.
    ///
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(500).checked_mul(3), Some(Money::from_cents(1500)));
    /// assert_eq!(Money::from_cents(500).checked_mul(i64::MAX / 2), None);
    /// ```
    #[inline]
    pub const fn checked_mul(&self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// `self + other`, or `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// `self + other`, clamped to the i64 range.
    #[inline]
    pub const fn saturating_add(&self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-style rendering. Presentation belongs to the caller.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.dollars().abs(), self.cents_part())
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
        assert_eq!(format!("{}", Money::from_cents(1785)), "$17.85");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
    }

    #[test]
    fn test_tax_at_nineteen_percent() {
        let rate = TaxRate::from_bps(1900);
        assert_eq!(Money::from_cents(10_000).with_tax(rate).cents(), 11_900);
        assert_eq!(Money::from_cents(1500).calculate_tax(rate).cents(), 285);
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // $0.50 at 19% = 9.5 cents -> 10
        let tax = Money::from_cents(50).calculate_tax(TaxRate::from_bps(1900));
        assert_eq!(tax.cents(), 10);
    }

    #[test]
    fn test_remove_markup() {
        // 5.00 / 1.3 = 3.846 -> 3.85
        let cost = Money::from_cents(500).remove_markup(Percentage::from_bps(3000));
        assert_eq!(cost.cents(), 385);

        let no_markup = Money::from_cents(500).remove_markup(Percentage::from_bps(0));
        assert_eq!(no_markup.cents(), 500);
    }

    #[test]
    fn test_sum() {
        let lines = [Money::from_cents(1500), Money::from_cents(250)];
        let total: Money = lines.iter().sum();
        assert_eq!(total.cents(), 1750);
    }

    #[test]
    fn test_checked_arithmetic() {
        let price = Money::from_cents(500);
        assert_eq!(price.checked_mul(4), Some(Money::from_cents(2000)));
        assert_eq!(price.checked_mul(i64::MAX / 2), None);

        let big = Money::from_cents(i64::MAX - 10);
        assert_eq!(big.checked_add(Money::from_cents(10)), Some(Money::from_cents(i64::MAX)));
        assert_eq!(big.checked_add(Money::from_cents(11)), None);
        assert_eq!(big.saturating_add(big).cents(), i64::MAX);
        assert_eq!(price.saturating_mul(i64::MAX).cents(), i64::MAX);
    }
}
