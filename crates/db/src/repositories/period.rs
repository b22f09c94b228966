//! Payroll period repository: creation, lifecycle transitions, totals.

use chrono::Utc;
use payday_core::PayrollError;
use payday_core::period::{
    NewPeriod, PayrollPeriodStatus as CorePeriodStatus, PeriodLifecycle, PeriodTransition,
};
use payday_core::totals::{PeriodTotals, PeriodTotalsAggregator};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::error::RepositoryError;
use crate::entities::payroll_periods;
use crate::entities::payroll_records;
use crate::entities::sea_orm_active_enums::PayrollPeriodStatus;

/// Loads a period and takes a row lock on it for the rest of the transaction.
///
/// Every write under a period goes through this lock, which serializes
/// record mutations, totals refreshes, and transitions of the same period.
pub(crate) async fn lock_period<C: ConnectionTrait>(
    conn: &C,
    period_id: Uuid,
) -> Result<payroll_periods::Model, RepositoryError> {
    payroll_periods::Entity::find_by_id(period_id)
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or_else(|| PayrollError::PeriodNotFound(period_id).into())
}

/// Blocks other period creators until the transaction ends.
///
/// The overlap check reads ranges before inserting, so two creators must not
/// interleave. `SHARE ROW EXCLUSIVE` conflicts with itself but not with the
/// row locks taken by `lock_period`. SQLite serializes writers on its own.
async fn lock_period_table<C: ConnectionTrait>(conn: &C) -> Result<(), RepositoryError> {
    if conn.get_database_backend() == DbBackend::Postgres {
        conn.execute_unprepared("LOCK TABLE payroll_periods IN SHARE ROW EXCLUSIVE MODE")
            .await?;
    }
    Ok(())
}

/// Re-reads every record of the period and writes the aggregate onto it.
pub(crate) async fn refresh_totals_in<C: ConnectionTrait>(
    conn: &C,
    period: payroll_periods::Model,
) -> Result<(payroll_periods::Model, PeriodTotals), RepositoryError> {
    let records = payroll_records::Entity::find()
        .filter(payroll_records::Column::PayrollPeriodId.eq(period.id))
        .all(conn)
        .await?;

    let totals = PeriodTotalsAggregator::aggregate(
        records.iter().map(payroll_records::Model::totals_input),
    );

    let mut active: payroll_periods::ActiveModel = period.into();
    active.total_employees = Set(totals.record_count);
    active.paid_employees = Set(totals.paid_count);
    active.total_gross_pay = Set(totals.total_gross_pay);
    active.total_deductions = Set(totals.total_deductions);
    active.total_net_pay = Set(totals.total_net_pay);
    active.updated_at = Set(Utc::now().into());
    let period = active.update(conn).await?;

    Ok((period, totals))
}

async fn apply_transition<C: ConnectionTrait>(
    conn: &C,
    period: payroll_periods::Model,
    transition: PeriodTransition,
) -> Result<payroll_periods::Model, RepositoryError> {
    let mut active: payroll_periods::ActiveModel = period.into();
    active.status = Set(transition.new_status.into());
    active.locked_at = Set(transition.locked_at.map(Into::into));
    active.closed_at = Set(transition.closed_at.map(Into::into));
    active.updated_at = Set(Utc::now().into());
    Ok(active.update(conn).await?)
}

/// Payroll period repository.
#[derive(Debug, Clone)]
pub struct PeriodRepository {
    db: DatabaseConnection,
}

impl PeriodRepository {
    /// Creates a new period repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an open period with zero totals.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name is blank, the dates are out of order, or working days are out of range
    /// - The range overlaps an existing period
    /// - Database operation fails
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_period(
        &self,
        input: NewPeriod,
    ) -> Result<payroll_periods::Model, RepositoryError> {
        PeriodLifecycle::validate_new_period(&input)?;
        let range = input.range();

        let txn = self.db.begin().await?;
        lock_period_table(&txn).await?;

        let overlapping = payroll_periods::Entity::find()
            .filter(payroll_periods::Column::StartDate.lte(range.end))
            .filter(payroll_periods::Column::EndDate.gte(range.start))
            .all(&txn)
            .await?;
        PeriodLifecycle::ensure_no_overlap(
            range,
            overlapping.iter().map(|p| (p.name.as_str(), p.range())),
        )?;

        let now = Utc::now().into();
        let period = payroll_periods::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name.trim().to_string()),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            pay_date: Set(input.pay_date),
            working_days: Set(input.working_days),
            status: Set(PayrollPeriodStatus::Open),
            locked_at: Set(None),
            closed_at: Set(None),
            total_employees: Set(0),
            paid_employees: Set(0),
            total_gross_pay: Set(Decimal::ZERO),
            total_deductions: Set(Decimal::ZERO),
            total_net_pay: Set(Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            period_id = %period.id,
            start = %period.start_date,
            end = %period.end_date,
            "payroll period created"
        );
        Ok(period)
    }

    /// Finds a period by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        period_id: Uuid,
    ) -> Result<Option<payroll_periods::Model>, RepositoryError> {
        Ok(payroll_periods::Entity::find_by_id(period_id).one(&self.db).await?)
    }

    /// Lists periods, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<payroll_periods::Model>, RepositoryError> {
        Ok(payroll_periods::Entity::find()
            .order_by_desc(payroll_periods::Column::StartDate)
            .all(&self.db)
            .await?)
    }

    /// Deletes an open period that owns no records.
    ///
    /// # Errors
    ///
    /// Returns an error if the period is missing, not open, or has records.
    #[instrument(skip(self))]
    pub async fn delete_period(&self, period_id: Uuid) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;
        let period = lock_period(&txn, period_id).await?;

        let record_count = payroll_records::Entity::find()
            .filter(payroll_records::Column::PayrollPeriodId.eq(period_id))
            .count(&txn)
            .await?;
        PeriodLifecycle::validate_delete(
            period.status.into(),
            i32::try_from(record_count).unwrap_or(i32::MAX),
        )?;

        payroll_periods::Entity::delete_by_id(period_id).exec(&txn).await?;
        txn.commit().await?;

        info!(%period_id, "payroll period deleted");
        Ok(())
    }

    /// Locks a period once every record is computed. Sets `locked_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Period not found
    /// - Period is already closed or already locked
    /// - Period has no records, or some records are not computed
    /// - Database operation fails
    #[instrument(skip(self))]
    pub async fn lock_period(
        &self,
        period_id: Uuid,
    ) -> Result<payroll_periods::Model, RepositoryError> {
        let txn = self.db.begin().await?;
        let period = lock_period(&txn, period_id).await?;
        let status: CorePeriodStatus = period.status.into();

        let (period, totals) = refresh_totals_in(&txn, period).await?;
        let transition = PeriodLifecycle::lock(status, &totals, Utc::now())?;
        let period = apply_transition(&txn, period, transition).await?;

        txn.commit().await?;

        info!(%period_id, records = totals.record_count, "payroll period locked");
        Ok(period)
    }

    /// Closes a locked period once every record is paid. Sets `closed_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Period not found
    /// - Period is already closed or not locked
    /// - Some records are not paid
    /// - Database operation fails
    #[instrument(skip(self))]
    pub async fn close_period(
        &self,
        period_id: Uuid,
    ) -> Result<payroll_periods::Model, RepositoryError> {
        let txn = self.db.begin().await?;
        let period = lock_period(&txn, period_id).await?;
        let status: CorePeriodStatus = period.status.into();
        let locked_at = period.locked_at.map(|t| t.with_timezone(&Utc));

        let (period, totals) = refresh_totals_in(&txn, period).await?;
        let transition = PeriodLifecycle::close(status, &totals, locked_at, Utc::now())?;
        let period = apply_transition(&txn, period, transition).await?;

        txn.commit().await?;

        info!(%period_id, net = %totals.total_net_pay, "payroll period closed");
        Ok(period)
    }

    /// Returns a processing or locked period to open. Clears `locked_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if the period is missing, closed, or already open.
    #[instrument(skip(self))]
    pub async fn reopen_period(
        &self,
        period_id: Uuid,
    ) -> Result<payroll_periods::Model, RepositoryError> {
        let txn = self.db.begin().await?;
        let period = lock_period(&txn, period_id).await?;

        let transition = PeriodLifecycle::reopen(period.status.into())?;
        let period = apply_transition(&txn, period, transition).await?;

        txn.commit().await?;

        info!(%period_id, "payroll period reopened");
        Ok(period)
    }

    /// Recomputes period totals from the current records.
    ///
    /// # Errors
    ///
    /// Returns an error if the period is missing or the database fails.
    #[instrument(skip(self))]
    pub async fn refresh_totals(
        &self,
        period_id: Uuid,
    ) -> Result<payroll_periods::Model, RepositoryError> {
        let txn = self.db.begin().await?;
        let period = lock_period(&txn, period_id).await?;
        let (period, totals) = refresh_totals_in(&txn, period).await?;
        txn.commit().await?;

        info!(
            %period_id,
            records = totals.record_count,
            paid = totals.paid_count,
            gross = %totals.total_gross_pay,
            "payroll period totals refreshed"
        );
        Ok(period)
    }
}
