//! Deduction ledger repository.
//!
//! Adding or removing a deduction re-sums every deduction row of the owning
//! record and rewrites its category fields, `deductions_total`, and `net_pay`
//! in the same transaction.

use chrono::Utc;
use payday_core::PayrollError;
use payday_core::deduction::{
    DeductionInput, DeductionLedger, DeductionType as CoreDeductionType, LedgerTotals,
};
use payday_core::period::{PeriodLifecycle, RecordOperation};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::error::RepositoryError;
use super::payroll::lock_record;
use super::period::refresh_totals_in;
use crate::entities::{
    deductions, payroll_records,
    sea_orm_active_enums::{DeductionSource, DeductionType},
};

/// Writes ledger totals onto a record's category fields.
pub(crate) fn set_ledger_totals(active: &mut payroll_records::ActiveModel, totals: &LedgerTotals) {
    let b = totals.breakdown;
    active.sss = Set(b.sss);
    active.philhealth = Set(b.philhealth);
    active.pag_ibig = Set(b.pag_ibig);
    active.tax = Set(b.tax);
    active.loan = Set(b.loan);
    active.advance = Set(b.advance);
    active.other_deductions = Set(b.other);
    active.deductions_total = Set(totals.deductions_total);
    active.net_pay = Set(totals.net_pay);
}

/// Re-sums all deduction rows of the record and persists the result.
pub(crate) async fn resettle_record<C: ConnectionTrait>(
    conn: &C,
    record: payroll_records::Model,
) -> Result<payroll_records::Model, RepositoryError> {
    let rows = deductions::Entity::find()
        .filter(deductions::Column::PayrollRecordId.eq(record.id))
        .all(conn)
        .await?;

    let breakdown = DeductionLedger::rollup(
        rows.iter()
            .map(|d| (CoreDeductionType::from(d.deduction_type), d.amount)),
    );
    let totals = DeductionLedger::settle(record.gross_pay, breakdown);

    let mut active: payroll_records::ActiveModel = record.into();
    set_ledger_totals(&mut active, &totals);
    active.updated_at = Set(Utc::now().into());
    Ok(active.update(conn).await?)
}

/// Deduction ledger repository.
#[derive(Debug, Clone)]
pub struct DeductionRepository {
    db: DatabaseConnection,
}

impl DeductionRepository {
    /// Creates a new deduction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Adds a manual deduction and re-settles the owning record.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount is zero or negative
    /// - Record not found
    /// - The period is locked or closed, or the record has payments
    /// - Database operation fails
    #[instrument(skip(self, input), fields(deduction_type = %input.deduction_type))]
    pub async fn add_deduction(
        &self,
        record_id: Uuid,
        input: DeductionInput,
    ) -> Result<payroll_records::Model, RepositoryError> {
        let amount = input.validate()?;

        let txn = self.db.begin().await?;
        let (period, record) = lock_record(&txn, record_id).await?;
        PeriodLifecycle::ensure_record_mutable(
            period.status.into(),
            Some(record.payment_status.into()),
            RecordOperation::AddDeduction,
        )?;

        deductions::ActiveModel {
            id: Set(Uuid::now_v7()),
            payroll_record_id: Set(record_id),
            deduction_type: Set(DeductionType::from(input.deduction_type)),
            source: Set(DeductionSource::Manual),
            amount: Set(amount),
            is_recurring: Set(input.is_recurring),
            note: Set(input.note),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        let record = resettle_record(&txn, record).await?;
        refresh_totals_in(&txn, period).await?;
        txn.commit().await?;

        info!(%record_id, %amount, net = %record.net_pay, "deduction added");
        Ok(record)
    }

    /// Removes a deduction and re-settles the owning record.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Deduction or record not found
    /// - The period is locked or closed, or the record has payments
    /// - Database operation fails
    #[instrument(skip(self))]
    pub async fn remove_deduction(
        &self,
        deduction_id: Uuid,
    ) -> Result<payroll_records::Model, RepositoryError> {
        let txn = self.db.begin().await?;

        let deduction = deductions::Entity::find_by_id(deduction_id)
            .one(&txn)
            .await?
            .ok_or(PayrollError::DeductionNotFound(deduction_id))?;
        let record_id = deduction.payroll_record_id;

        let (period, record) = lock_record(&txn, record_id).await?;
        PeriodLifecycle::ensure_record_mutable(
            period.status.into(),
            Some(record.payment_status.into()),
            RecordOperation::RemoveDeduction,
        )?;

        // The row may be gone if another remove held the lock first.
        let deleted = deductions::Entity::delete_many()
            .filter(deductions::Column::Id.eq(deduction_id))
            .filter(deductions::Column::PayrollRecordId.eq(record_id))
            .exec(&txn)
            .await?;
        if deleted.rows_affected == 0 {
            return Err(PayrollError::DeductionNotFound(deduction_id).into());
        }

        let record = resettle_record(&txn, record).await?;
        refresh_totals_in(&txn, period).await?;
        txn.commit().await?;

        info!(%record_id, %deduction_id, net = %record.net_pay, "deduction removed");
        Ok(record)
    }

    /// Lists the deductions of a record, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_record(
        &self,
        record_id: Uuid,
    ) -> Result<Vec<deductions::Model>, RepositoryError> {
        Ok(deductions::Entity::find()
            .filter(deductions::Column::PayrollRecordId.eq(record_id))
            .order_by_asc(deductions::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }
}
