//! Property-based tests for `PeriodLifecycle`.

use chrono::Utc;
use proptest::prelude::*;

use crate::error::PayrollError;
use crate::payroll::PaymentStatus;
use crate::period::{PayrollPeriodStatus, PeriodLifecycle, RecordOperation};
use crate::totals::PeriodTotals;

fn arb_status() -> impl Strategy<Value = PayrollPeriodStatus> {
    prop_oneof![
        Just(PayrollPeriodStatus::Open),
        Just(PayrollPeriodStatus::Processing),
        Just(PayrollPeriodStatus::Locked),
        Just(PayrollPeriodStatus::Closed),
    ]
}

fn arb_payment_status() -> impl Strategy<Value = Option<PaymentStatus>> {
    prop_oneof![
        Just(None),
        Just(Some(PaymentStatus::Unpaid)),
        Just(Some(PaymentStatus::PartiallyPaid)),
        Just(Some(PaymentStatus::Paid)),
        Just(Some(PaymentStatus::Cancelled)),
    ]
}

fn arb_operation() -> impl Strategy<Value = RecordOperation> {
    prop_oneof![
        Just(RecordOperation::Create),
        Just(RecordOperation::Compute),
        Just(RecordOperation::UpdateEarnings),
        Just(RecordOperation::AddDeduction),
        Just(RecordOperation::RemoveDeduction),
        Just(RecordOperation::MarkPaid),
        Just(RecordOperation::Delete),
    ]
}

/// Record count with a computed/paid split no larger than it.
fn arb_counts() -> impl Strategy<Value = (i32, i32, i32)> {
    (0i32..50).prop_flat_map(|records| (Just(records), 0..=records, 0..=records))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Lock fails with NotAllComputed iff some record is uncomputed.
    #[test]
    fn prop_lock_guard(
        status in prop_oneof![
            Just(PayrollPeriodStatus::Open),
            Just(PayrollPeriodStatus::Processing),
        ],
        (records, uncomputed, _) in arb_counts(),
    ) {
        let totals = PeriodTotals {
            record_count: records,
            uncomputed_count: uncomputed,
            ..PeriodTotals::default()
        };
        let result = PeriodLifecycle::lock(status, &totals, Utc::now());

        if records == 0 {
            prop_assert!(matches!(result, Err(PayrollError::NoRecords)));
        } else if uncomputed > 0 {
            prop_assert!(
                matches!(
                    result,
                    Err(PayrollError::NotAllComputed { count }) if count == uncomputed
                ),
                "expected NotAllComputed for {} uncomputed records",
                uncomputed
            );
        } else {
            let transition = result.unwrap();
            prop_assert_eq!(transition.new_status, PayrollPeriodStatus::Locked);
            prop_assert!(transition.locked_at.is_some());
        }
    }

    /// Close fails with UnpaidRecordsExist iff some record is not paid.
    #[test]
    fn prop_close_guard((records, _, paid) in arb_counts()) {
        let totals = PeriodTotals {
            record_count: records,
            paid_count: paid,
            ..PeriodTotals::default()
        };
        let result = PeriodLifecycle::close(PayrollPeriodStatus::Locked, &totals, None, Utc::now());

        if paid < records {
            prop_assert!(
                matches!(
                    result,
                    Err(PayrollError::UnpaidRecordsExist { count }) if count == records - paid
                ),
                "expected UnpaidRecordsExist for {} unpaid records",
                records - paid
            );
        } else {
            prop_assert_eq!(result.unwrap().new_status, PayrollPeriodStatus::Closed);
        }
    }

    /// Nothing under a closed period is mutable, and closed never reopens.
    #[test]
    fn prop_closed_is_terminal(
        payment in arb_payment_status(),
        op in arb_operation(),
    ) {
        prop_assert!(matches!(
            PeriodLifecycle::ensure_record_mutable(PayrollPeriodStatus::Closed, payment, op),
            Err(PayrollError::PeriodClosed)
        ));
        prop_assert!(matches!(
            PeriodLifecycle::reopen(PayrollPeriodStatus::Closed),
            Err(PayrollError::AlreadyClosed)
        ));
    }

    /// A paid record rejects every operation.
    #[test]
    fn prop_paid_record_is_immutable(status in arb_status(), op in arb_operation()) {
        let result = PeriodLifecycle::ensure_record_mutable(status, Some(PaymentStatus::Paid), op);
        prop_assert!(result.is_err());
    }

    /// Locked periods accept payments on unpaid records and nothing else.
    #[test]
    fn prop_locked_only_accepts_payments(op in arb_operation()) {
        let result = PeriodLifecycle::ensure_record_mutable(
            PayrollPeriodStatus::Locked,
            Some(PaymentStatus::Unpaid),
            op,
        );
        prop_assert_eq!(result.is_ok(), op == RecordOperation::MarkPaid);
    }
}
