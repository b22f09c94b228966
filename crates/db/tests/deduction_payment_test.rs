//! Manual deductions, payments, and record immutability once paid.

mod common;

use common::{
    TestContext, create_employee, create_period, first_half_march, log_standard_fortnight, setup,
};
use chrono::{TimeZone, Utc};
use payday_core::PayrollError;
use payday_core::deduction::{DeductionInput, DeductionType};
use payday_core::payroll::{PaymentInfo, SupplementaryEarnings};
use payday_db::RepositoryError;
use payday_db::entities::{
    attendance_logs,
    sea_orm_active_enums::{DeductionSource, PaymentStatus},
};
use payday_shared::types::{DeductionId, EmployeeId, PayrollPeriodId, PayrollRecordId};
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

async fn computed_record(ctx: &TestContext) -> (EmployeeId, PayrollPeriodId, PayrollRecordId) {
    let employee = create_employee(&ctx.db, "EMP-001").await;
    let period = create_period(ctx, first_half_march()).await;
    log_standard_fortnight(&ctx.db, employee).await;
    let record = ctx.engine.compute_payroll(employee, period).await.unwrap();
    (employee, period, PayrollRecordId::from_uuid(record.id))
}

fn loan(amount: Decimal) -> DeductionInput {
    DeductionInput {
        deduction_type: DeductionType::Loan,
        amount,
        is_recurring: true,
        note: Some("Salary loan".to_string()),
    }
}

fn payroll_error(err: RepositoryError) -> PayrollError {
    match err {
        RepositoryError::Payroll(err) => err,
        RepositoryError::Database(err) => panic!("unexpected database error: {err}"),
    }
}

#[tokio::test]
async fn test_add_and_remove_manual_deduction() {
    let ctx = setup().await;
    let (_, period, record) = computed_record(&ctx).await;

    let updated = ctx
        .engine
        .add_deduction(record, loan(dec!(500)))
        .await
        .unwrap();
    assert_eq!(updated.loan, dec!(500));
    assert_eq!(updated.tax, dec!(850));
    assert_eq!(updated.deductions_total, dec!(1350));
    assert_eq!(updated.net_pay, dec!(7150));

    let period_row = ctx.engine.find_period(period).await.unwrap().unwrap();
    assert_eq!(period_row.total_deductions, dec!(1350));
    assert_eq!(period_row.total_net_pay, dec!(7150));

    let rows = ctx.engine.list_deductions(record).await.unwrap();
    let manual = rows
        .iter()
        .find(|d| d.source == DeductionSource::Manual)
        .unwrap();
    assert_eq!(manual.note.as_deref(), Some("Salary loan"));

    let restored = ctx
        .engine
        .remove_deduction(DeductionId::from_uuid(manual.id))
        .await
        .unwrap();
    assert_eq!(restored.loan, dec!(0));
    assert_eq!(restored.deductions_total, dec!(850));
    assert_eq!(restored.net_pay, dec!(7650));
}

#[tokio::test]
async fn test_concurrent_removes_delete_once() {
    let ctx = setup().await;
    let (_, _, record) = computed_record(&ctx).await;
    let added = ctx
        .engine
        .add_deduction(record, loan(dec!(500)))
        .await
        .unwrap();
    assert_eq!(added.net_pay, dec!(7150));

    let rows = ctx.engine.list_deductions(record).await.unwrap();
    let manual = rows
        .iter()
        .find(|d| d.source == DeductionSource::Manual)
        .unwrap();
    let deduction = DeductionId::from_uuid(manual.id);

    let results = futures::future::join_all(
        (0..2).map(|_| ctx.engine.remove_deduction(deduction)),
    )
    .await;

    let removed: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].net_pay, dec!(7650));

    let err = results.into_iter().find_map(Result::err).unwrap();
    assert!(matches!(payroll_error(err), PayrollError::DeductionNotFound(_)));

    let current = ctx.engine.find_record(record).await.unwrap().unwrap();
    assert_eq!(current.deductions_total, dec!(850));
    assert_eq!(current.net_pay, dec!(7650));
}

#[tokio::test]
async fn test_manual_deductions_survive_recompute() {
    let ctx = setup().await;
    let (employee, period, record) = computed_record(&ctx).await;
    ctx.engine
        .add_deduction(record, loan(dec!(500)))
        .await
        .unwrap();

    let recomputed = ctx.engine.compute_payroll(employee, period).await.unwrap();
    assert_eq!(recomputed.loan, dec!(500));
    assert_eq!(recomputed.tax, dec!(850));
    assert_eq!(recomputed.net_pay, dec!(7150));

    let rows = ctx.engine.list_deductions(record).await.unwrap();
    assert_eq!(rows.len(), 2);
}

#[rstest]
#[case::zero(dec!(0))]
#[case::negative(dec!(-50))]
#[tokio::test]
async fn test_add_deduction_rejects_non_positive_amount(#[case] amount: Decimal) {
    let ctx = setup().await;
    let (_, _, record) = computed_record(&ctx).await;

    let err = ctx
        .engine
        .add_deduction(record, loan(amount))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), payday_core::ErrorKind::Validation);

    let unchanged = ctx.engine.find_record(record).await.unwrap().unwrap();
    assert_eq!(unchanged.deductions_total, dec!(850));
}

#[tokio::test]
async fn test_missing_record_and_deduction() {
    let ctx = setup().await;

    let err = payroll_error(
        ctx.engine
            .add_deduction(PayrollRecordId::from_uuid(Uuid::new_v4()), loan(dec!(1)))
            .await
            .unwrap_err(),
    );
    assert!(matches!(err, PayrollError::RecordNotFound(_)));

    let err = payroll_error(
        ctx.engine
            .remove_deduction(DeductionId::from_uuid(Uuid::new_v4()))
            .await
            .unwrap_err(),
    );
    assert!(matches!(err, PayrollError::DeductionNotFound(_)));
}

#[tokio::test]
async fn test_full_payment_marks_paid() {
    let ctx = setup().await;
    let (_, period, record) = computed_record(&ctx).await;
    let paid_at = Utc.with_ymd_and_hms(2026, 3, 20, 9, 0, 0).unwrap();

    let paid = ctx
        .engine
        .mark_as_paid(
            record,
            PaymentInfo {
                amount: None,
                paid_at: Some(paid_at),
                reference: Some("BANK-0001".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(paid.payment_status, PaymentStatus::Paid);
    assert_eq!(paid.amount_paid, dec!(7650));
    assert_eq!(paid.payment_reference.as_deref(), Some("BANK-0001"));
    assert_eq!(
        paid.paid_at.map(|t| t.with_timezone(&Utc)),
        Some(paid_at)
    );

    let period_row = ctx.engine.find_period(period).await.unwrap().unwrap();
    assert_eq!(period_row.paid_employees, 1);

    let err = payroll_error(
        ctx.engine
            .mark_as_paid(record, PaymentInfo::default())
            .await
            .unwrap_err(),
    );
    assert!(matches!(err, PayrollError::AlreadyPaid));
}

#[tokio::test]
async fn test_partial_payments_accumulate() {
    let ctx = setup().await;
    let (_, _, record) = computed_record(&ctx).await;

    let partial = ctx
        .engine
        .mark_as_paid(
            record,
            PaymentInfo {
                amount: Some(dec!(5000)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(partial.payment_status, PaymentStatus::PartiallyPaid);
    assert_eq!(partial.amount_paid, dec!(5000));
    assert!(partial.paid_at.is_none());

    let err = payroll_error(
        ctx.engine
            .mark_as_paid(
                record,
                PaymentInfo {
                    amount: Some(dec!(3000)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err(),
    );
    assert!(matches!(err, PayrollError::Overpayment { .. }));

    let rest = ctx
        .engine
        .mark_as_paid(record, PaymentInfo::default())
        .await
        .unwrap();
    assert_eq!(rest.payment_status, PaymentStatus::Paid);
    assert_eq!(rest.amount_paid, dec!(7650));
    assert!(rest.paid_at.is_some());
}

#[tokio::test]
async fn test_paid_record_is_immutable() {
    let ctx = setup().await;
    let (employee, period, record) = computed_record(&ctx).await;
    ctx.engine.add_deduction(record, loan(dec!(100))).await.unwrap();
    let manual = ctx
        .engine
        .list_deductions(record)
        .await
        .unwrap()
        .into_iter()
        .find(|d| d.source == DeductionSource::Manual)
        .unwrap();
    ctx.engine
        .mark_as_paid(record, PaymentInfo::default())
        .await
        .unwrap();

    let err = payroll_error(ctx.engine.compute_payroll(employee, period).await.unwrap_err());
    assert!(matches!(err, PayrollError::RecordPaid));

    let err = payroll_error(
        ctx.engine
            .add_deduction(record, loan(dec!(100)))
            .await
            .unwrap_err(),
    );
    assert!(matches!(err, PayrollError::RecordPaid));

    let err = payroll_error(
        ctx.engine
            .remove_deduction(DeductionId::from_uuid(manual.id))
            .await
            .unwrap_err(),
    );
    assert!(matches!(err, PayrollError::RecordPaid));

    let err = payroll_error(
        ctx.engine
            .update_earnings(record, SupplementaryEarnings::default())
            .await
            .unwrap_err(),
    );
    assert!(matches!(err, PayrollError::RecordPaid));

    let err = payroll_error(ctx.engine.delete_record(record).await.unwrap_err());
    assert!(matches!(err, PayrollError::RecordPaid));
}

#[tokio::test]
async fn test_partially_paid_record_rejects_changes() {
    let ctx = setup().await;
    let (employee, period, record) = computed_record(&ctx).await;
    ctx.engine
        .mark_as_paid(
            record,
            PaymentInfo {
                amount: Some(dec!(100)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = payroll_error(ctx.engine.compute_payroll(employee, period).await.unwrap_err());
    assert!(matches!(err, PayrollError::RecordHasPayments));
}

#[tokio::test]
async fn test_delete_record_releases_claims() {
    let ctx = setup().await;
    let (employee, period, record) = computed_record(&ctx).await;
    ctx.engine.add_deduction(record, loan(dec!(100))).await.unwrap();

    ctx.engine.delete_record(record).await.unwrap();

    assert!(ctx.engine.find_record(record).await.unwrap().is_none());
    assert!(ctx.engine.list_deductions(record).await.unwrap().is_empty());
    let claimed = attendance_logs::Entity::find()
        .filter(attendance_logs::Column::PayrollRecordId.is_not_null())
        .count(&ctx.db)
        .await
        .unwrap();
    assert_eq!(claimed, 0);

    let period_row = ctx.engine.find_period(period).await.unwrap().unwrap();
    assert_eq!(period_row.total_employees, 0);
    assert_eq!(period_row.total_gross_pay, dec!(0));

    // Released facts are claimable again.
    let recomputed = ctx.engine.compute_payroll(employee, period).await.unwrap();
    assert_eq!(recomputed.days_present, 8);
    assert_eq!(recomputed.net_pay, dec!(7650));
}
