//! Decimal rounding rules for payroll amounts.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every monetary figure is a `rust_decimal::Decimal` rounded with banker's
//! rounding (round half to even) so repeated recomputation cannot drift.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept for monetary amounts.
pub const MONEY_SCALE: u32 = 2;

/// Decimal places kept for hour quantities.
pub const HOURS_SCALE: u32 = 2;

/// Decimal places kept for rates and multipliers.
pub const RATE_SCALE: u32 = 4;

/// Rounds a monetary amount to the cent.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Rounds an hour quantity to two places.
#[must_use]
pub fn round_hours(hours: Decimal) -> Decimal {
    hours.round_dp_with_strategy(HOURS_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Rounds a rate or multiplier to four places.
#[must_use]
pub fn round_rate(rate: Decimal) -> Decimal {
    rate.round_dp_with_strategy(RATE_SCALE, RoundingStrategy::MidpointNearestEven)
}
