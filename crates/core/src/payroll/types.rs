//! Payroll record domain types.

use chrono::{DateTime, Utc};
use payday_shared::round_money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::deduction::{DeductionType, LedgerTotals};
use crate::employee::EmployeeRates;
use crate::error::PayrollError;

/// Payment status of a payroll record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentStatus {
    /// Nothing paid yet.
    Unpaid,
    /// Net pay fully paid. The record is immutable.
    Paid,
    /// Some, but not all, of net pay has been paid.
    PartiallyPaid,
    /// Set outside the engine. Cannot be paid.
    Cancelled,
}

impl PaymentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
            Self::PartiallyPaid => "partially-paid",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Earnings not derived from attendance or overtime.
///
/// Supplied by an external collaborator through `update_earnings`; compute
/// keeps whatever is stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplementaryEarnings {
    /// Holiday premium.
    #[serde(default)]
    pub holiday_pay: Decimal,
    /// Night differential.
    #[serde(default)]
    pub night_diff_pay: Decimal,
    /// Allowances.
    #[serde(default)]
    pub allowance: Decimal,
    /// Bonus.
    #[serde(default)]
    pub bonus: Decimal,
}

impl SupplementaryEarnings {
    /// Rejects negative components and rounds each to cents.
    pub fn validate(self) -> Result<Self, PayrollError> {
        let checks = [
            (self.holiday_pay, "Holiday pay"),
            (self.night_diff_pay, "Night differential pay"),
            (self.allowance, "Allowance"),
            (self.bonus, "Bonus"),
        ];
        if let Some(&(_, field)) = checks.iter().find(|(value, _)| *value < Decimal::ZERO) {
            return Err(PayrollError::NegativeAmount(field));
        }

        Ok(Self {
            holiday_pay: round_money(self.holiday_pay),
            night_diff_pay: round_money(self.night_diff_pay),
            allowance: round_money(self.allowance),
            bonus: round_money(self.bonus),
        })
    }

    /// Sum of the four components.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.holiday_pay + self.night_diff_pay + self.allowance + self.bonus
    }
}

/// Earnings breakdown of one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Earnings {
    /// Pay for present and half days.
    pub basic_pay: Decimal,
    /// Claimed overtime hours.
    pub overtime_hours: Decimal,
    /// Claimed overtime pay.
    pub overtime_pay: Decimal,
    /// Holiday, night differential, allowance, bonus.
    pub supplementary: SupplementaryEarnings,
    /// `basic_pay + overtime_pay + supplementary.total()`.
    pub gross_pay: Decimal,
}

impl Earnings {
    /// Assembles earnings and derives gross pay.
    #[must_use]
    pub fn new(
        basic_pay: Decimal,
        overtime_hours: Decimal,
        overtime_pay: Decimal,
        supplementary: SupplementaryEarnings,
    ) -> Self {
        let basic_pay = round_money(basic_pay);
        let overtime_pay = round_money(overtime_pay);
        Self {
            basic_pay,
            overtime_hours,
            overtime_pay,
            supplementary,
            gross_pay: round_money(basic_pay + overtime_pay + supplementary.total()),
        }
    }
}

/// Output of one payroll computation, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComputedPayroll {
    /// Rates the record was computed with.
    pub rates: EmployeeRates,
    /// Earnings breakdown.
    pub earnings: Earnings,
    /// Policy deduction rows replacing the record's previous policy rows.
    pub policy_deductions: Vec<(DeductionType, Decimal)>,
    /// Category totals, deductions total, and net pay over all rows.
    pub totals: LedgerTotals,
}

/// Payment request for `mark_as_paid`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PaymentInfo {
    /// Amount paid now. Defaults to the outstanding balance.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Payment timestamp. Defaults to now.
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    /// Bank or voucher reference.
    #[serde(default)]
    pub reference: Option<String>,
}

/// Record state after applying a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentOutcome {
    /// Cumulative amount paid.
    pub amount_paid: Decimal,
    /// New payment status.
    pub status: PaymentStatus,
    /// Set once the record is fully paid.
    pub paid_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_earnings_gross() {
        let supplementary = SupplementaryEarnings {
            holiday_pay: dec!(500),
            night_diff_pay: dec!(120.50),
            allowance: dec!(1000),
            bonus: dec!(0),
        };
        let earnings = Earnings::new(dec!(8500), dec!(2), dec!(500), supplementary);
        assert_eq!(earnings.gross_pay, dec!(10620.50));
    }

    #[test]
    fn test_supplementary_rejects_negative() {
        let input = SupplementaryEarnings {
            allowance: dec!(-1),
            ..SupplementaryEarnings::default()
        };
        assert_eq!(
            input.validate().unwrap_err().to_string(),
            "Allowance cannot be negative"
        );
    }

    #[test]
    fn test_supplementary_rounds() {
        let input = SupplementaryEarnings {
            bonus: dec!(99.995),
            ..SupplementaryEarnings::default()
        };
        assert_eq!(input.validate().unwrap().bonus, dec!(100.00));
    }

    #[test]
    fn test_payment_status_names() {
        assert_eq!(PaymentStatus::PartiallyPaid.as_str(), "partially-paid");
        assert_eq!(PaymentStatus::Cancelled.as_str(), "cancelled");
    }
}
