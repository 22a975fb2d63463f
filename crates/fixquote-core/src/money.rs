//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    34000 × (1 − 0.05) = 32299.999999999996  ❌ WRONG!                   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents + Basis Points                             │
//! │    (34000 × 9500 + 5000) / 10000 = 32300    ✅                          │
//! │                                                                         │
//! │  Every derived amount is rounded half-up to the cent, exactly once      │
//! │  per pipeline step.                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fixquote_core::money::Money;
//!
//! let cost = Money::from_cents(10000); // R$ 100,00
//! let sale = cost.mark_up(40);         // 40% margin
//! assert_eq!(sale.cents(), 14000);
//!
//! let pix = Money::from_cents(34000).less_bps(500); // 5% off
//! assert_eq!(pix.cents(), 32300);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

/// Basis points in one whole (100%).
pub const BPS_SCALE: i64 = 10_000;

// =============================================================================
// Rounding
// =============================================================================

/// Divides `numerator / denominator` rounding half-up (towards +∞ on ties).
///
/// `denominator` must be positive. Works for negative numerators too:
/// `-2.5 → -2`, `2.5 → 3`.
#[inline]
pub(crate) fn div_round_half_up(numerator: i128, denominator: i128) -> i128 {
    (2 * numerator + denominator).div_euclid(2 * denominator)
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents of Brazilian real.
///
/// ## Design Decisions
/// - **i64 (signed)**: real profit may go negative; prices never do
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **No float constructor** except [`Money::from_currency_units`], which is
///   only used to read configuration parameters
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  ServiceLabor ──┐                                                       │
/// │  PartSale ──────┼──► Card ──► Pix                                       │
/// │  Logistics ─────┘      │                                                │
/// │                        └──► NetCard ──► RealProfit                      │
/// │                                            ▲                            │
/// │  PartCost, Logistics, FixedCost ───────────┘                            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use fixquote_core::money::Money;
    ///
    /// let price = Money::from_cents(6530); // R$ 65,30
    /// assert_eq!(price.cents(), 6530);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a configuration value expressed in currency units
    /// (e.g. `65.3`) to cents, rounding to the nearest cent.
    ///
    /// Returns `None` for non-finite input.
    ///
    /// ```rust
    /// use fixquote_core::money::Money;
    ///
    /// assert_eq!(Money::from_currency_units(65.3).unwrap().cents(), 6530);
    /// assert!(Money::from_currency_units(f64::NAN).is_none());
    /// ```
    pub fn from_currency_units(units: f64) -> Option<Self> {
        if !units.is_finite() {
            return None;
        }
        Some(Money((units * 100.0).round() as i64))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole reais portion.
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavos portion (always 0-99).
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

    /// Clamps negative values to zero.
    #[inline]
    pub fn non_negative(self) -> Self {
        Money(self.0.max(0))
    }

    /// Applies a percentage margin on top of a cost:
    /// `round(cost × (1 + percent/100))`, half-up.
    ///
    /// ```rust
    /// use fixquote_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(10000).mark_up(40).cents(), 14000);
    /// assert_eq!(Money::from_cents(105).mark_up(30).cents(), 137); // 136.5
    /// ```
    pub fn mark_up(&self, percent: u32) -> Money {
        let scaled = self.0 as i128 * (100 + percent as i128);
        Money(div_round_half_up(scaled, 100) as i64)
    }

    /// Returns `round(amount × bps / 10000)`, half-up.
    pub fn scale_bps(&self, bps: u32) -> Money {
        let scaled = self.0 as i128 * bps as i128;
        Money(div_round_half_up(scaled, BPS_SCALE as i128) as i64)
    }

    /// Returns `round(amount × (1 − bps / 10000))`, half-up.
    ///
    /// This is how both the Pix price and the net-after-fee card price are
    /// derived from the card price.
    ///
    /// ```rust
    /// use fixquote_core::money::Money;
    ///
    /// let card = Money::from_cents(34000);
    /// assert_eq!(card.less_bps(500).cents(), 32300);
    /// assert_eq!(card.less_bps(1000).cents(), 30600);
    /// ```
    pub fn less_bps(&self, bps: u32) -> Money {
        let keep = BPS_SCALE as i128 - bps as i128;
        let scaled = self.0 as i128 * keep;
        Money(div_round_half_up(scaled, BPS_SCALE as i128) as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Formats as Brazilian real: `R$ 1.234,56`, `-R$ 5,50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let whole = self.reais().unsigned_abs().to_string();

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        write!(f, "{}R$ {},{:02}", sign, grouped, self.cents_part())
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
