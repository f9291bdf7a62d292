//! # Percentages and Money
//!
//! `Percentage` is a validated share in [0, 100]. Monetary amounts are plain
//! `rust_decimal::Decimal` values: exact base-10 arithmetic, so splitting an
//! invoice by percentages reconciles to the cent instead of drifting the
//! way binary floats do.
//!
//! Rounding only happens at presentation or invoicing time through
//! [`round_money()`]; allocation math itself never rounds.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A percentage share in the closed range [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Percentage(Decimal);

impl Percentage {
    /// 0%.
    pub const ZERO: Percentage = Percentage(Decimal::ZERO);
    /// 100%.
    pub const HUNDRED: Percentage = Percentage(Decimal::ONE_HUNDRED);

    /// Create a percentage, rejecting values outside [0, 100].
    pub fn new(value: Decimal) -> Result<Self, CoreError> {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(CoreError::PercentageOutOfRange {
                value: value.to_string(),
            });
        }
        Ok(Self(value))
    }

    /// The remainder left after `allocated` percentage points are handed
    /// out, floored at 0%.
    ///
    /// `allocated` is a raw sum and may exceed 100; the result is then 0%.
    pub fn remainder_after(allocated: Decimal) -> Self {
        let rest = Decimal::ONE_HUNDRED - allocated;
        Self(rest.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED))
    }

    /// The raw decimal value (e.g. `40` for 40%).
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// `amount × self / 100`, unrounded.
    pub fn of(&self, amount: Decimal) -> Decimal {
        amount * self.0 / Decimal::ONE_HUNDRED
    }

    /// Whether this is exactly 0%.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl TryFrom<Decimal> for Percentage {
    type Error = CoreError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percentage> for Decimal {
    fn from(p: Percentage) -> Decimal {
        p.0
    }
}

impl std::fmt::Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_percentage(self.0))
    }
}

/// Round a monetary amount to `scale` decimal places, midpoint away from zero.
pub fn round_money(amount: Decimal, scale: u32) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(scale);
    rounded
}

/// Render an amount with exactly `scale` decimals followed by the currency
/// label, e.g. `1234.50 RON`.
pub fn format_money(amount: Decimal, scale: u32, currency: &str) -> String {
    format!("{} {currency}", round_money(amount, scale))
}

/// Render a percentage value with two decimals, e.g. `33.33%`.
pub fn format_percentage(value: Decimal) -> String {
    format!("{}%", round_money(value, 2))
}
