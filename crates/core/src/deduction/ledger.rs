//! Deduction rollups and the derived total/net invariant.

use std::collections::BTreeMap;

use payday_shared::round_money;
use rust_decimal::Decimal;
use serde::Serialize;

use super::types::{DeductionBreakdown, DeductionType};

/// Result of settling a record's deductions against its gross pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LedgerTotals {
    /// Per-category totals.
    pub breakdown: DeductionBreakdown,
    /// Sum of every category.
    pub deductions_total: Decimal,
    /// `gross_pay - deductions_total`.
    pub net_pay: Decimal,
}

/// Stateless deduction ledger service.
pub struct DeductionLedger;

impl DeductionLedger {
    /// Sums every deduction row of a record grouped by category.
    pub fn rollup<I>(lines: I) -> DeductionBreakdown
    where
        I: IntoIterator<Item = (DeductionType, Decimal)>,
    {
        let mut breakdown = DeductionBreakdown::default();
        for (deduction_type, amount) in lines {
            breakdown.add(deduction_type, amount);
        }
        breakdown
    }

    /// Derives `deductions_total` and `net_pay` from a breakdown.
    #[must_use]
    pub fn settle(gross_pay: Decimal, breakdown: DeductionBreakdown) -> LedgerTotals {
        let deductions_total = round_money(breakdown.total());
        LedgerTotals {
            breakdown,
            deductions_total,
            net_pay: round_money(gross_pay - deductions_total),
        }
    }

    /// Turns a policy result into deduction rows, dropping empty categories.
    #[must_use]
    pub fn policy_lines(
        amounts: &BTreeMap<DeductionType, Decimal>,
    ) -> Vec<(DeductionType, Decimal)> {
        amounts
            .iter()
            .map(|(deduction_type, amount)| (*deduction_type, round_money(*amount)))
            .filter(|(_, amount)| *amount > Decimal::ZERO)
            .collect()
    }
}
