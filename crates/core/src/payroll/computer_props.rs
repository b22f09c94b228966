//! Property-based tests for `PayrollComputer` and `DeductionLedger`.

use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::attendance::AttendanceSummary;
use crate::deduction::{DeductionLedger, DeductionType};
use crate::employee::EmployeeRates;
use crate::overtime::OvertimeClaim;
use crate::payroll::computer::{ComputeInput, PayrollComputer};
use crate::payroll::policy::{ContributionRule, FlatRatePolicy, StatutoryPolicy};
use crate::payroll::types::SupplementaryEarnings;

fn arb_money() -> impl Strategy<Value = Decimal> {
    (0i64..5_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn arb_rate() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|n| Decimal::new(n, 4))
}

fn arb_deduction_type() -> impl Strategy<Value = DeductionType> {
    prop::sample::select(DeductionType::ALL.to_vec())
}

fn arb_supplementary() -> impl Strategy<Value = SupplementaryEarnings> {
    (arb_money(), arb_money(), arb_money(), arb_money()).prop_map(
        |(holiday_pay, night_diff_pay, allowance, bonus)| SupplementaryEarnings {
            holiday_pay,
            night_diff_pay,
            allowance,
            bonus,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// gross = sum of earnings parts, total = sum of categories, net = gross - total.
    #[test]
    fn prop_gross_net_arithmetic(
        present in 0i32..31,
        half_day in 0i32..31,
        daily_rate in arb_money(),
        overtime_pay in arb_money(),
        supplementary in arb_supplementary(),
        rate in arb_rate(),
        manual in prop::collection::vec((arb_deduction_type(), arb_money()), 0..5),
    ) {
        let attendance = AttendanceSummary {
            days_present: present,
            days_half_day: half_day,
            ..AttendanceSummary::default()
        };
        let overtime = OvertimeClaim {
            fact_ids: Vec::new(),
            total_hours: Decimal::ONE,
            total_pay: overtime_pay,
        };
        let input = ComputeInput {
            rates: EmployeeRates {
                daily_rate,
                hourly_rate: Decimal::ZERO,
                overtime_multiplier: Decimal::ONE,
            },
            attendance: &attendance,
            overtime: &overtime,
            supplementary,
            manual_deductions: &manual,
        };
        let policy = FlatRatePolicy::new(DeductionType::Tax, rate).unwrap();

        let computed = PayrollComputer::compute(&input, &policy).unwrap();
        let earnings = computed.earnings;
        let totals = computed.totals;

        prop_assert_eq!(
            earnings.gross_pay,
            earnings.basic_pay
                + earnings.overtime_pay
                + earnings.supplementary.holiday_pay
                + earnings.supplementary.night_diff_pay
                + earnings.supplementary.allowance
                + earnings.supplementary.bonus
        );
        prop_assert_eq!(totals.deductions_total, totals.breakdown.total());
        prop_assert_eq!(totals.net_pay, earnings.gross_pay - totals.deductions_total);
        prop_assert!(totals.net_pay.scale() <= 2);
    }

    /// Computing twice from the same inputs gives the same record.
    #[test]
    fn prop_compute_is_deterministic(
        present in 0i32..31,
        daily_rate in arb_money(),
        rate in arb_rate(),
    ) {
        let attendance = AttendanceSummary {
            days_present: present,
            ..AttendanceSummary::default()
        };
        let overtime = OvertimeClaim::default();
        let input = ComputeInput {
            rates: EmployeeRates {
                daily_rate,
                hourly_rate: Decimal::ZERO,
                overtime_multiplier: Decimal::ONE,
            },
            attendance: &attendance,
            overtime: &overtime,
            supplementary: SupplementaryEarnings::default(),
            manual_deductions: &[],
        };
        let policy = FlatRatePolicy::new(DeductionType::Other, rate).unwrap();

        let first = PayrollComputer::compute(&input, &policy).unwrap();
        let second = PayrollComputer::compute(&input, &policy).unwrap();
        prop_assert_eq!(first, second);
    }

    /// A capped contribution never exceeds its cap.
    #[test]
    fn prop_contribution_respects_cap(
        gross in arb_money(),
        rate in arb_rate(),
        cap in arb_money(),
    ) {
        let rule = ContributionRule {
            category: DeductionType::Sss,
            rate,
            cap: Some(cap),
        };
        let policy = StatutoryPolicy::new(vec![rule]).unwrap();
        let amount =
            crate::payroll::DeductionPolicy::deductions(&policy, gross)[&DeductionType::Sss];

        prop_assert!(amount <= cap);
        prop_assert!(amount >= Decimal::ZERO);
    }

    /// Rollup order does not matter.
    #[test]
    fn prop_rollup_is_order_independent(
        lines in prop::collection::vec((arb_deduction_type(), arb_money()), 0..10),
    ) {
        let forward = DeductionLedger::rollup(lines.iter().copied());
        let backward = DeductionLedger::rollup(lines.iter().rev().copied());
        prop_assert_eq!(forward, backward);
    }
}
