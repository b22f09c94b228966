//! Turns attendance, overtime, and deductions into a payroll record.

use payday_shared::round_money;
use rust_decimal::Decimal;

use super::policy::DeductionPolicy;
use super::types::{ComputedPayroll, Earnings, SupplementaryEarnings};
use crate::attendance::AttendanceSummary;
use crate::deduction::{DeductionLedger, DeductionType};
use crate::employee::EmployeeRates;
use crate::error::PayrollError;
use crate::overtime::OvertimeClaim;

/// Everything one computation needs, already loaded.
#[derive(Debug, Clone, Copy)]
pub struct ComputeInput<'a> {
    /// Rates snapshotted onto the record.
    pub rates: EmployeeRates,
    /// Attendance summary over the period range.
    pub attendance: &'a AttendanceSummary,
    /// Claimable overtime over the period range.
    pub overtime: &'a OvertimeClaim,
    /// Stored supplementary earnings.
    pub supplementary: SupplementaryEarnings,
    /// Manual deduction rows already on the record.
    pub manual_deductions: &'a [(DeductionType, Decimal)],
}

/// Stateless payroll computation service.
pub struct PayrollComputer;

impl PayrollComputer {
    /// `(days_present + 0.5 × days_half_day) × daily_rate`.
    #[must_use]
    pub fn basic_pay(attendance: &AttendanceSummary, daily_rate: Decimal) -> Decimal {
        round_money(attendance.payable_days() * daily_rate)
    }

    /// Computes earnings, policy deductions, and the ledger totals.
    pub fn compute(
        input: &ComputeInput<'_>,
        policy: &dyn DeductionPolicy,
    ) -> Result<ComputedPayroll, PayrollError> {
        let supplementary = input.supplementary.validate()?;
        let earnings = Earnings::new(
            Self::basic_pay(input.attendance, input.rates.daily_rate),
            input.overtime.total_hours,
            input.overtime.total_pay,
            supplementary,
        );

        Ok(Self::price(
            input.rates,
            earnings,
            input.manual_deductions,
            policy,
        ))
    }

    /// Applies the policy to `earnings` and settles all deduction rows.
    ///
    /// Used by compute and whenever supplementary earnings change.
    #[must_use]
    pub fn price(
        rates: EmployeeRates,
        earnings: Earnings,
        manual_deductions: &[(DeductionType, Decimal)],
        policy: &dyn DeductionPolicy,
    ) -> ComputedPayroll {
        let policy_deductions =
            DeductionLedger::policy_lines(&policy.deductions(earnings.gross_pay));
        let breakdown = DeductionLedger::rollup(
            policy_deductions
                .iter()
                .chain(manual_deductions.iter())
                .copied(),
        );

        ComputedPayroll {
            rates,
            earnings,
            policy_deductions,
            totals: DeductionLedger::settle(earnings.gross_pay, breakdown),
        }
    }
}
