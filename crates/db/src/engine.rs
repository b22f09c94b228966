//! `PayrollEngine`: the operation surface over the repositories.
//!
//! Callers hold one engine per database connection and address entities by
//! typed IDs. Each method is a single transaction.

use std::sync::Arc;

use payday_core::PayrollError;
use payday_core::deduction::DeductionInput;
use payday_core::payroll::{DeductionPolicy, PaymentInfo, StatutoryPolicy, SupplementaryEarnings};
use payday_core::period::NewPeriod;
use payday_shared::config::PayrollConfig;
use payday_shared::types::{DeductionId, EmployeeId, PayrollPeriodId, PayrollRecordId};
use sea_orm::DatabaseConnection;

use crate::entities::{deductions, payroll_periods, payroll_records};
use crate::repositories::{
    BatchOutcome, DeductionRepository, PayrollRepository, PeriodRepository, RepositoryError,
};

/// Payroll computation and period lifecycle engine.
#[derive(Debug, Clone)]
pub struct PayrollEngine {
    periods: PeriodRepository,
    payroll: PayrollRepository,
    deductions: DeductionRepository,
}

impl PayrollEngine {
    /// Creates an engine that prices deductions with `policy`.
    #[must_use]
    pub fn new(db: DatabaseConnection, policy: Arc<dyn DeductionPolicy>) -> Self {
        Self {
            periods: PeriodRepository::new(db.clone()),
            payroll: PayrollRepository::new(db.clone(), policy),
            deductions: DeductionRepository::new(db),
        }
    }

    /// Creates an engine with the statutory policy from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a contribution names an unknown category or has a
    /// rate outside `0..=1`.
    pub fn from_config(
        db: DatabaseConnection,
        config: &PayrollConfig,
    ) -> Result<Self, PayrollError> {
        let policy = StatutoryPolicy::from_config(config)?;
        Ok(Self::new(db, Arc::new(policy)))
    }

    // ========== Periods ==========

    /// Creates an open period.
    ///
    /// # Errors
    ///
    /// See [`PeriodRepository::create_period`].
    pub async fn create_period(
        &self,
        input: NewPeriod,
    ) -> Result<payroll_periods::Model, RepositoryError> {
        self.periods.create_period(input).await
    }

    /// Deletes an open, empty period.
    ///
    /// # Errors
    ///
    /// See [`PeriodRepository::delete_period`].
    pub async fn delete_period(&self, period_id: PayrollPeriodId) -> Result<(), RepositoryError> {
        self.periods.delete_period(period_id.into_inner()).await
    }

    /// Finds a period.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_period(
        &self,
        period_id: PayrollPeriodId,
    ) -> Result<Option<payroll_periods::Model>, RepositoryError> {
        self.periods.find_by_id(period_id.into_inner()).await
    }

    /// Lists periods, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_periods(&self) -> Result<Vec<payroll_periods::Model>, RepositoryError> {
        self.periods.list().await
    }

    /// Locks a period.
    ///
    /// # Errors
    ///
    /// See [`PeriodRepository::lock_period`].
    pub async fn lock_period(
        &self,
        period_id: PayrollPeriodId,
    ) -> Result<payroll_periods::Model, RepositoryError> {
        self.periods.lock_period(period_id.into_inner()).await
    }

    /// Closes a locked, fully paid period.
    ///
    /// # Errors
    ///
    /// See [`PeriodRepository::close_period`].
    pub async fn close_period(
        &self,
        period_id: PayrollPeriodId,
    ) -> Result<payroll_periods::Model, RepositoryError> {
        self.periods.close_period(period_id.into_inner()).await
    }

    /// Reopens a processing or locked period.
    ///
    /// # Errors
    ///
    /// See [`PeriodRepository::reopen_period`].
    pub async fn reopen_period(
        &self,
        period_id: PayrollPeriodId,
    ) -> Result<payroll_periods::Model, RepositoryError> {
        self.periods.reopen_period(period_id.into_inner()).await
    }

    /// Recomputes stored period totals.
    ///
    /// # Errors
    ///
    /// See [`PeriodRepository::refresh_totals`].
    pub async fn refresh_period_totals(
        &self,
        period_id: PayrollPeriodId,
    ) -> Result<payroll_periods::Model, RepositoryError> {
        self.periods.refresh_totals(period_id.into_inner()).await
    }

    // ========== Records ==========

    /// Computes one employee's record for a period.
    ///
    /// # Errors
    ///
    /// See [`PayrollRepository::compute_payroll`].
    pub async fn compute_payroll(
        &self,
        employee_id: EmployeeId,
        period_id: PayrollPeriodId,
    ) -> Result<payroll_records::Model, RepositoryError> {
        self.payroll
            .compute_payroll(employee_id.into_inner(), period_id.into_inner())
            .await
    }

    /// Computes every active employee of a period.
    ///
    /// # Errors
    ///
    /// See [`PayrollRepository::compute_payroll_batch`].
    pub async fn compute_payroll_batch(
        &self,
        period_id: PayrollPeriodId,
    ) -> Result<BatchOutcome, RepositoryError> {
        self.payroll
            .compute_payroll_batch(period_id.into_inner())
            .await
    }

    /// Creates an uncomputed record carrying supplementary earnings.
    ///
    /// # Errors
    ///
    /// See [`PayrollRepository::create_record`].
    pub async fn create_record(
        &self,
        employee_id: EmployeeId,
        period_id: PayrollPeriodId,
        supplementary: SupplementaryEarnings,
    ) -> Result<payroll_records::Model, RepositoryError> {
        self.payroll
            .create_record(
                employee_id.into_inner(),
                period_id.into_inner(),
                supplementary,
            )
            .await
    }

    /// Replaces the supplementary earnings of a record.
    ///
    /// # Errors
    ///
    /// See [`PayrollRepository::update_earnings`].
    pub async fn update_earnings(
        &self,
        record_id: PayrollRecordId,
        supplementary: SupplementaryEarnings,
    ) -> Result<payroll_records::Model, RepositoryError> {
        self.payroll
            .update_earnings(record_id.into_inner(), supplementary)
            .await
    }

    /// Records a full or partial payment.
    ///
    /// # Errors
    ///
    /// See [`PayrollRepository::mark_as_paid`].
    pub async fn mark_as_paid(
        &self,
        record_id: PayrollRecordId,
        info: PaymentInfo,
    ) -> Result<payroll_records::Model, RepositoryError> {
        self.payroll.mark_as_paid(record_id.into_inner(), info).await
    }

    /// Deletes a record and releases its facts.
    ///
    /// # Errors
    ///
    /// See [`PayrollRepository::delete_record`].
    pub async fn delete_record(&self, record_id: PayrollRecordId) -> Result<(), RepositoryError> {
        self.payroll.delete_record(record_id.into_inner()).await
    }

    /// Finds a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_record(
        &self,
        record_id: PayrollRecordId,
    ) -> Result<Option<payroll_records::Model>, RepositoryError> {
        self.payroll.find_by_id(record_id.into_inner()).await
    }

    /// Finds the record of one employee for one period.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_record_for(
        &self,
        employee_id: EmployeeId,
        period_id: PayrollPeriodId,
    ) -> Result<Option<payroll_records::Model>, RepositoryError> {
        self.payroll
            .find_for_employee(employee_id.into_inner(), period_id.into_inner())
            .await
    }

    /// Lists the records of a period.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_records(
        &self,
        period_id: PayrollPeriodId,
    ) -> Result<Vec<payroll_records::Model>, RepositoryError> {
        self.payroll.list_for_period(period_id.into_inner()).await
    }

    // ========== Deductions ==========

    /// Adds a manual deduction.
    ///
    /// # Errors
    ///
    /// See [`DeductionRepository::add_deduction`].
    pub async fn add_deduction(
        &self,
        record_id: PayrollRecordId,
        input: DeductionInput,
    ) -> Result<payroll_records::Model, RepositoryError> {
        self.deductions
            .add_deduction(record_id.into_inner(), input)
            .await
    }

    /// Removes a deduction.
    ///
    /// # Errors
    ///
    /// See [`DeductionRepository::remove_deduction`].
    pub async fn remove_deduction(
        &self,
        deduction_id: DeductionId,
    ) -> Result<payroll_records::Model, RepositoryError> {
        self.deductions
            .remove_deduction(deduction_id.into_inner())
            .await
    }

    /// Lists the deductions of a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_deductions(
        &self,
        record_id: PayrollRecordId,
    ) -> Result<Vec<deductions::Model>, RepositoryError> {
        self.deductions.list_for_record(record_id.into_inner()).await
    }
}
