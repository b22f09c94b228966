//! Payroll record repository: compute, earnings, payments, deletion.
//!
//! `compute` runs attendance aggregation and overtime selection over the
//! period range, prices the record with the injected deduction policy,
//! upserts the `(employee, period)` record, replaces its policy deduction
//! rows, and claims the consumed facts. All of it, plus the period totals
//! refresh, commits as one transaction under the period row lock.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use payday_core::PayrollError;
use payday_core::attendance::{AttendanceAggregator, AttendanceFact, AttendanceSummary};
use payday_core::deduction::DeductionType as CoreDeductionType;
use payday_core::overtime::{OvertimeClaimer, OvertimeFact};
use payday_core::payroll::{
    ComputeInput, ComputedPayroll, DeductionPolicy, Earnings, NoDeductions, PaymentCalculator,
    PaymentInfo, PayrollComputer, SupplementaryEarnings,
};
use payday_core::period::{PeriodLifecycle, RecordOperation};
use payday_shared::round_hours;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::Unchanged;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::deduction::set_ledger_totals;
use super::error::RepositoryError;
use super::facts;
use super::period::{lock_period, refresh_totals_in};
use crate::entities::{
    deductions, employees, payroll_periods, payroll_records,
    sea_orm_active_enums::{
        DeductionSource, DeductionType, EmployeeStatus, PaymentStatus, PayrollPeriodStatus,
    },
};

/// Loads a record and locks its period for the rest of the transaction.
///
/// The record is re-read after the lock is taken so callers always see the
/// state the lock protects.
pub(crate) async fn lock_record<C: ConnectionTrait>(
    conn: &C,
    record_id: Uuid,
) -> Result<(payroll_periods::Model, payroll_records::Model), RepositoryError> {
    let period_id = payroll_records::Entity::find_by_id(record_id)
        .one(conn)
        .await?
        .ok_or(PayrollError::RecordNotFound(record_id))?
        .payroll_period_id;

    let period = lock_period(conn, period_id).await?;

    let record = payroll_records::Entity::find_by_id(record_id)
        .one(conn)
        .await?
        .ok_or(PayrollError::RecordNotFound(record_id))?;

    Ok((period, record))
}

/// Manual deduction rows of a record as `(type, amount)` pairs.
async fn manual_lines<C: ConnectionTrait>(
    conn: &C,
    record_id: Uuid,
) -> Result<Vec<(CoreDeductionType, Decimal)>, RepositoryError> {
    let rows = deductions::Entity::find()
        .filter(deductions::Column::PayrollRecordId.eq(record_id))
        .filter(deductions::Column::Source.eq(DeductionSource::Manual))
        .all(conn)
        .await?;
    Ok(rows
        .iter()
        .map(|d| (CoreDeductionType::from(d.deduction_type), d.amount))
        .collect())
}

/// Replaces the policy deduction rows of a record. Manual rows are kept.
async fn replace_policy_rows<C: ConnectionTrait>(
    conn: &C,
    record_id: Uuid,
    lines: &[(CoreDeductionType, Decimal)],
    now: DateTime<Utc>,
) -> Result<(), RepositoryError> {
    deductions::Entity::delete_many()
        .filter(deductions::Column::PayrollRecordId.eq(record_id))
        .filter(deductions::Column::Source.eq(DeductionSource::Policy))
        .exec(conn)
        .await?;

    for (deduction_type, amount) in lines {
        deductions::ActiveModel {
            id: Set(Uuid::now_v7()),
            payroll_record_id: Set(record_id),
            deduction_type: Set(DeductionType::from(*deduction_type)),
            source: Set(DeductionSource::Policy),
            amount: Set(*amount),
            is_recurring: Set(true),
            note: Set(None),
            created_at: Set(now.into()),
        }
        .insert(conn)
        .await?;
    }
    Ok(())
}

/// An uncomputed record with zero amounts.
fn blank_record(
    id: Uuid,
    employee: &employees::Model,
    period_id: Uuid,
    now: DateTime<Utc>,
) -> payroll_records::ActiveModel {
    let now = now.into();
    payroll_records::ActiveModel {
        id: Set(id),
        employee_id: Set(employee.id),
        payroll_period_id: Set(period_id),
        daily_rate: Set(employee.daily_rate),
        hourly_rate: Set(employee.hourly_rate),
        overtime_multiplier: Set(employee.overtime_multiplier),
        days_present: Set(0),
        days_absent: Set(0),
        days_late: Set(0),
        days_half_day: Set(0),
        hours_worked: Set(Decimal::ZERO),
        late_minutes: Set(0),
        basic_pay: Set(Decimal::ZERO),
        overtime_hours: Set(Decimal::ZERO),
        overtime_pay: Set(Decimal::ZERO),
        holiday_pay: Set(Decimal::ZERO),
        night_diff_pay: Set(Decimal::ZERO),
        allowance: Set(Decimal::ZERO),
        bonus: Set(Decimal::ZERO),
        gross_pay: Set(Decimal::ZERO),
        sss: Set(Decimal::ZERO),
        philhealth: Set(Decimal::ZERO),
        pag_ibig: Set(Decimal::ZERO),
        tax: Set(Decimal::ZERO),
        loan: Set(Decimal::ZERO),
        advance: Set(Decimal::ZERO),
        other_deductions: Set(Decimal::ZERO),
        deductions_total: Set(Decimal::ZERO),
        net_pay: Set(Decimal::ZERO),
        amount_paid: Set(Decimal::ZERO),
        payment_status: Set(PaymentStatus::Unpaid),
        payment_reference: Set(None),
        computed_at: Set(None),
        paid_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

fn set_earnings(active: &mut payroll_records::ActiveModel, earnings: &Earnings) {
    active.basic_pay = Set(earnings.basic_pay);
    active.overtime_hours = Set(round_hours(earnings.overtime_hours));
    active.overtime_pay = Set(earnings.overtime_pay);
    active.holiday_pay = Set(earnings.supplementary.holiday_pay);
    active.night_diff_pay = Set(earnings.supplementary.night_diff_pay);
    active.allowance = Set(earnings.supplementary.allowance);
    active.bonus = Set(earnings.supplementary.bonus);
    active.gross_pay = Set(earnings.gross_pay);
}

fn set_computation(
    active: &mut payroll_records::ActiveModel,
    computed: &ComputedPayroll,
    attendance: &AttendanceSummary,
    now: DateTime<Utc>,
) {
    active.daily_rate = Set(computed.rates.daily_rate);
    active.hourly_rate = Set(computed.rates.hourly_rate);
    active.overtime_multiplier = Set(computed.rates.overtime_multiplier);
    active.days_present = Set(attendance.days_present);
    active.days_absent = Set(attendance.days_absent);
    active.days_late = Set(attendance.days_late);
    active.days_half_day = Set(attendance.days_half_day);
    active.hours_worked = Set(round_hours(attendance.hours_worked));
    active.late_minutes = Set(attendance.late_minutes);
    set_earnings(active, &computed.earnings);
    set_ledger_totals(active, &computed.totals);
    active.computed_at = Set(Some(now.into()));
    active.updated_at = Set(now.into());
}

/// Moves an open period to processing. No-op for any other status.
async fn start_processing<C: ConnectionTrait>(
    conn: &C,
    period: &payroll_periods::Model,
    now: DateTime<Utc>,
) -> Result<(), RepositoryError> {
    if PeriodLifecycle::begin_processing(period.status.into()).is_none() {
        return Ok(());
    }

    payroll_periods::ActiveModel {
        id: Unchanged(period.id),
        status: Set(PayrollPeriodStatus::Processing),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .update(conn)
    .await?;

    info!(period_id = %period.id, "payroll period processing");
    Ok(())
}

/// Computes one employee's record inside an open unit of work.
///
/// The caller holds the period lock and refreshes totals afterwards.
async fn compute_in<C: ConnectionTrait>(
    conn: &C,
    policy: &dyn DeductionPolicy,
    period: &payroll_periods::Model,
    employee_id: Uuid,
    now: DateTime<Utc>,
) -> Result<payroll_records::Model, RepositoryError> {
    let employee = employees::Entity::find_by_id(employee_id)
        .one(conn)
        .await?
        .ok_or(PayrollError::EmployeeNotFound(employee_id))?;

    let existing = payroll_records::Entity::find()
        .filter(payroll_records::Column::EmployeeId.eq(employee_id))
        .filter(payroll_records::Column::PayrollPeriodId.eq(period.id))
        .one(conn)
        .await?;

    PeriodLifecycle::ensure_record_mutable(
        period.status.into(),
        existing.as_ref().map(|r| r.payment_status.into()),
        RecordOperation::Compute,
    )?;

    // A new record gets its id up front so facts can be claimed by it.
    let record_id = existing.as_ref().map_or_else(Uuid::now_v7, |r| r.id);
    let range = period.range();
    let rates = employee.rates();

    let attendance_rows = facts::load_attendance(conn, employee_id, range, record_id).await?;
    let attendance_facts: Vec<AttendanceFact> =
        attendance_rows.iter().map(AttendanceFact::from).collect();
    let attendance =
        AttendanceAggregator::summarize(employee_id, range, &attendance_facts, record_id);

    let overtime_rows = facts::load_overtime(conn, employee_id, range, record_id).await?;
    let overtime_facts: Vec<OvertimeFact> = overtime_rows.iter().map(OvertimeFact::from).collect();
    let overtime = OvertimeClaimer::select(employee_id, range, &rates, &overtime_facts, record_id);

    let (manual, supplementary) = match &existing {
        Some(record) => (manual_lines(conn, record.id).await?, record.supplementary()),
        None => (Vec::new(), SupplementaryEarnings::default()),
    };

    let computed = PayrollComputer::compute(
        &ComputeInput {
            rates,
            attendance: &attendance,
            overtime: &overtime,
            supplementary,
            manual_deductions: &manual,
        },
        policy,
    )?;

    let is_new = existing.is_none();
    let mut active = match existing {
        Some(record) => record.into(),
        None => blank_record(record_id, &employee, period.id, now),
    };
    set_computation(&mut active, &computed, &attendance, now);
    let record = if is_new {
        active.insert(conn).await?
    } else {
        active.update(conn).await?
    };

    replace_policy_rows(conn, record_id, &computed.policy_deductions, now).await?;

    if !is_new {
        facts::release_stale(conn, record_id, &attendance.fact_ids, &overtime.fact_ids).await?;
    }

    let unclaimed_attendance: Vec<Uuid> = attendance_rows
        .iter()
        .filter(|f| f.payroll_record_id.is_none() && attendance.fact_ids.contains(&f.id))
        .map(|f| f.id)
        .collect();
    let unclaimed_overtime: Vec<Uuid> = overtime_rows
        .iter()
        .filter(|f| f.payroll_record_id.is_none() && overtime.fact_ids.contains(&f.id))
        .map(|f| f.id)
        .collect();
    facts::claim_attendance(conn, record_id, &unclaimed_attendance).await?;
    facts::claim_overtime(conn, record_id, &unclaimed_overtime).await?;

    debug!(
        %record_id,
        %employee_id,
        days_present = attendance.days_present,
        overtime_facts = overtime.fact_ids.len(),
        gross = %record.gross_pay,
        net = %record.net_pay,
        "payroll record computed"
    );
    Ok(record)
}

/// Re-prices a record after its supplementary earnings change.
///
/// Uncomputed records carry no policy deductions yet.
async fn reprice<C: ConnectionTrait>(
    conn: &C,
    policy: &dyn DeductionPolicy,
    record: payroll_records::Model,
    supplementary: SupplementaryEarnings,
    now: DateTime<Utc>,
) -> Result<payroll_records::Model, RepositoryError> {
    let earnings = Earnings::new(
        record.basic_pay,
        record.overtime_hours,
        record.overtime_pay,
        supplementary,
    );
    let manual = manual_lines(conn, record.id).await?;
    let policy: &dyn DeductionPolicy = if record.computed_at.is_some() {
        policy
    } else {
        &NoDeductions
    };

    let priced = PayrollComputer::price(record.rates(), earnings, &manual, policy);
    replace_policy_rows(conn, record.id, &priced.policy_deductions, now).await?;

    let mut active: payroll_records::ActiveModel = record.into();
    set_earnings(&mut active, &priced.earnings);
    set_ledger_totals(&mut active, &priced.totals);
    active.updated_at = Set(now.into());
    Ok(active.update(conn).await?)
}

/// One employee the batch could not compute.
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    /// Employee ID.
    pub employee_id: Uuid,
    /// Stable error code.
    pub error_code: &'static str,
    /// Human-readable reason.
    pub reason: String,
}

/// Outcome of computing every active employee of a period.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    /// Records computed.
    pub succeeded: Vec<payroll_records::Model>,
    /// Employees that failed, with the reason.
    pub failed: Vec<BatchFailure>,
    /// Period after the totals refresh.
    pub period: payroll_periods::Model,
}

/// Payroll record repository.
#[derive(Clone)]
pub struct PayrollRepository {
    db: DatabaseConnection,
    policy: Arc<dyn DeductionPolicy>,
}

impl fmt::Debug for PayrollRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayrollRepository")
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

impl PayrollRepository {
    /// Creates a new payroll repository with the given deduction policy.
    #[must_use]
    pub fn new(db: DatabaseConnection, policy: Arc<dyn DeductionPolicy>) -> Self {
        Self { db, policy }
    }

    /// Computes (or recomputes) the record of one employee for one period.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Employee or period not found
    /// - The period is locked or closed, or the record is paid or partially paid
    /// - A fact was claimed by another record meanwhile (`ConcurrencyConflict`)
    /// - Database operation fails
    #[instrument(skip(self))]
    pub async fn compute_payroll(
        &self,
        employee_id: Uuid,
        period_id: Uuid,
    ) -> Result<payroll_records::Model, RepositoryError> {
        let now = Utc::now();
        let txn = self.db.begin().await?;
        let period = lock_period(&txn, period_id).await?;

        let record = compute_in(&txn, &*self.policy, &period, employee_id, now).await?;
        start_processing(&txn, &period, now).await?;
        refresh_totals_in(&txn, period).await?;

        txn.commit().await?;

        info!(
            record_id = %record.id,
            gross = %record.gross_pay,
            net = %record.net_pay,
            "payroll computed"
        );
        Ok(record)
    }

    /// Computes every active employee of a period.
    ///
    /// Each employee runs in its own savepoint; failures are collected and
    /// the batch continues. Totals are refreshed once at the end.
    ///
    /// # Errors
    ///
    /// Returns an error if the period is missing, locked, or closed, or the
    /// database fails outside a single employee's computation.
    #[instrument(skip(self))]
    pub async fn compute_payroll_batch(
        &self,
        period_id: Uuid,
    ) -> Result<BatchOutcome, RepositoryError> {
        let now = Utc::now();
        let txn = self.db.begin().await?;
        let period = lock_period(&txn, period_id).await?;
        PeriodLifecycle::ensure_record_mutable(
            period.status.into(),
            None,
            RecordOperation::Compute,
        )?;
        start_processing(&txn, &period, now).await?;

        let employees = employees::Entity::find()
            .filter(employees::Column::Status.eq(EmployeeStatus::Active))
            .order_by_asc(employees::Column::EmployeeCode)
            .all(&txn)
            .await?;

        let mut succeeded = Vec::with_capacity(employees.len());
        let mut failed = Vec::new();

        for employee in employees {
            let savepoint = txn.begin().await?;
            match compute_in(&savepoint, &*self.policy, &period, employee.id, now).await {
                Ok(record) => {
                    savepoint.commit().await?;
                    succeeded.push(record);
                }
                Err(err) => {
                    savepoint.rollback().await?;
                    warn!(
                        employee_id = %employee.id,
                        code = err.error_code(),
                        error = %err,
                        "payroll computation failed"
                    );
                    failed.push(BatchFailure {
                        employee_id: employee.id,
                        error_code: err.error_code(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        let (period, totals) = refresh_totals_in(&txn, period).await?;
        txn.commit().await?;

        info!(
            %period_id,
            succeeded = succeeded.len(),
            failed = failed.len(),
            gross = %totals.total_gross_pay,
            "payroll batch computed"
        );
        Ok(BatchOutcome {
            succeeded,
            failed,
            period,
        })
    }

    /// Creates an uncomputed record, or updates the earnings of an existing one.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any supplementary earning is negative
    /// - Employee or period not found
    /// - The period is locked or closed, or the existing record has payments
    /// - Database operation fails
    #[instrument(skip(self, supplementary))]
    pub async fn create_record(
        &self,
        employee_id: Uuid,
        period_id: Uuid,
        supplementary: SupplementaryEarnings,
    ) -> Result<payroll_records::Model, RepositoryError> {
        let supplementary = supplementary.validate()?;
        let now = Utc::now();

        let txn = self.db.begin().await?;
        let period = lock_period(&txn, period_id).await?;

        let employee = employees::Entity::find_by_id(employee_id)
            .one(&txn)
            .await?
            .ok_or(PayrollError::EmployeeNotFound(employee_id))?;
        let existing = payroll_records::Entity::find()
            .filter(payroll_records::Column::EmployeeId.eq(employee_id))
            .filter(payroll_records::Column::PayrollPeriodId.eq(period_id))
            .one(&txn)
            .await?;

        PeriodLifecycle::ensure_record_mutable(
            period.status.into(),
            existing.as_ref().map(|r| r.payment_status.into()),
            RecordOperation::Create,
        )?;

        let record = match existing {
            Some(record) => reprice(&txn, &*self.policy, record, supplementary, now).await?,
            None => {
                let earnings =
                    Earnings::new(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, supplementary);
                let mut active = blank_record(Uuid::now_v7(), &employee, period_id, now);
                set_earnings(&mut active, &earnings);
                active.net_pay = Set(earnings.gross_pay);
                active.insert(&txn).await?
            }
        };

        refresh_totals_in(&txn, period).await?;
        txn.commit().await?;

        info!(record_id = %record.id, %employee_id, %period_id, "payroll record created");
        Ok(record)
    }

    /// Replaces the holiday, night differential, allowance, and bonus of a record.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any value is negative
    /// - Record not found
    /// - The period is locked or closed, or the record has payments
    /// - Database operation fails
    #[instrument(skip(self, supplementary))]
    pub async fn update_earnings(
        &self,
        record_id: Uuid,
        supplementary: SupplementaryEarnings,
    ) -> Result<payroll_records::Model, RepositoryError> {
        let supplementary = supplementary.validate()?;
        let now = Utc::now();

        let txn = self.db.begin().await?;
        let (period, record) = lock_record(&txn, record_id).await?;
        PeriodLifecycle::ensure_record_mutable(
            period.status.into(),
            Some(record.payment_status.into()),
            RecordOperation::UpdateEarnings,
        )?;

        let record = reprice(&txn, &*self.policy, record, supplementary, now).await?;
        refresh_totals_in(&txn, period).await?;
        txn.commit().await?;

        info!(
            %record_id,
            gross = %record.gross_pay,
            net = %record.net_pay,
            "payroll earnings updated"
        );
        Ok(record)
    }

    /// Records a payment. Locked periods still accept payments.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Record not found
    /// - The record is already paid or cancelled, or the period is closed
    /// - The amount is zero, negative, or above the outstanding balance
    /// - Database operation fails
    #[instrument(skip(self, info))]
    pub async fn mark_as_paid(
        &self,
        record_id: Uuid,
        info: PaymentInfo,
    ) -> Result<payroll_records::Model, RepositoryError> {
        let now = Utc::now();

        let txn = self.db.begin().await?;
        let (period, record) = lock_record(&txn, record_id).await?;
        PeriodLifecycle::ensure_record_mutable(
            period.status.into(),
            Some(record.payment_status.into()),
            RecordOperation::MarkPaid,
        )?;

        let outcome = PaymentCalculator::apply(record.net_pay, record.amount_paid, &info, now)?;

        let mut active: payroll_records::ActiveModel = record.into();
        active.amount_paid = Set(outcome.amount_paid);
        active.payment_status = Set(outcome.status.into());
        if let Some(paid_at) = outcome.paid_at {
            active.paid_at = Set(Some(paid_at.into()));
        }
        if let Some(reference) = info.reference {
            active.payment_reference = Set(Some(reference));
        }
        active.updated_at = Set(now.into());
        let record = active.update(&txn).await?;

        refresh_totals_in(&txn, period).await?;
        txn.commit().await?;

        info!(
            %record_id,
            paid = %record.amount_paid,
            status = outcome.status.as_str(),
            "payment recorded"
        );
        Ok(record)
    }

    /// Deletes a record, its deductions, and releases every fact it claimed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Record not found
    /// - The period is locked or closed, or the record has payments
    /// - Database operation fails
    #[instrument(skip(self))]
    pub async fn delete_record(&self, record_id: Uuid) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;
        let (period, record) = lock_record(&txn, record_id).await?;
        PeriodLifecycle::ensure_record_mutable(
            period.status.into(),
            Some(record.payment_status.into()),
            RecordOperation::Delete,
        )?;

        let released = facts::release_all(&txn, record_id).await?;
        deductions::Entity::delete_many()
            .filter(deductions::Column::PayrollRecordId.eq(record_id))
            .exec(&txn)
            .await?;
        record.delete(&txn).await?;

        refresh_totals_in(&txn, period).await?;
        txn.commit().await?;

        info!(%record_id, released, "payroll record deleted");
        Ok(())
    }

    /// Finds a record by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        record_id: Uuid,
    ) -> Result<Option<payroll_records::Model>, RepositoryError> {
        Ok(payroll_records::Entity::find_by_id(record_id)
            .one(&self.db)
            .await?)
    }

    /// Finds the record of one employee for one period.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_for_employee(
        &self,
        employee_id: Uuid,
        period_id: Uuid,
    ) -> Result<Option<payroll_records::Model>, RepositoryError> {
        Ok(payroll_records::Entity::find()
            .filter(payroll_records::Column::EmployeeId.eq(employee_id))
            .filter(payroll_records::Column::PayrollPeriodId.eq(period_id))
            .one(&self.db)
            .await?)
    }

    /// Lists the records of a period.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_period(
        &self,
        period_id: Uuid,
    ) -> Result<Vec<payroll_records::Model>, RepositoryError> {
        Ok(payroll_records::Entity::find()
            .filter(payroll_records::Column::PayrollPeriodId.eq(period_id))
            .order_by_asc(payroll_records::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }
}
