//! Attendance and overtime fact queries with claim write-back.
//!
//! A fact is claimed by setting its `payroll_record_id`. Claim writes are
//! conditional on the fact still being unclaimed, and a short row count is
//! reported as a concurrency conflict.

use payday_core::PayrollError;
use payday_core::period::DateRange;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::debug;
use uuid::Uuid;

use super::error::RepositoryError;
use crate::entities::{attendance_logs, overtime_logs, sea_orm_active_enums::ApprovalStatus};

/// Attendance facts of one employee in range, unclaimed or claimed by `claimant`.
pub(crate) async fn load_attendance<C: ConnectionTrait>(
    conn: &C,
    employee_id: Uuid,
    range: DateRange,
    claimant: Uuid,
) -> Result<Vec<attendance_logs::Model>, RepositoryError> {
    let facts = attendance_logs::Entity::find()
        .filter(attendance_logs::Column::EmployeeId.eq(employee_id))
        .filter(attendance_logs::Column::WorkDate.between(range.start, range.end))
        .filter(
            Condition::any()
                .add(attendance_logs::Column::PayrollRecordId.is_null())
                .add(attendance_logs::Column::PayrollRecordId.eq(claimant)),
        )
        .order_by_asc(attendance_logs::Column::WorkDate)
        .all(conn)
        .await?;
    Ok(facts)
}

/// Approved overtime of one employee in range, unclaimed or claimed by `claimant`.
pub(crate) async fn load_overtime<C: ConnectionTrait>(
    conn: &C,
    employee_id: Uuid,
    range: DateRange,
    claimant: Uuid,
) -> Result<Vec<overtime_logs::Model>, RepositoryError> {
    let facts = overtime_logs::Entity::find()
        .filter(overtime_logs::Column::EmployeeId.eq(employee_id))
        .filter(overtime_logs::Column::ApprovalStatus.eq(ApprovalStatus::Approved))
        .filter(overtime_logs::Column::WorkDate.between(range.start, range.end))
        .filter(
            Condition::any()
                .add(overtime_logs::Column::PayrollRecordId.is_null())
                .add(overtime_logs::Column::PayrollRecordId.eq(claimant)),
        )
        .order_by_asc(overtime_logs::Column::WorkDate)
        .all(conn)
        .await?;
    Ok(facts)
}

fn conflict(kind: &str, expected: usize, claimed: u64) -> RepositoryError {
    PayrollError::ConcurrencyConflict(format!(
        "{kind} facts claimed elsewhere: expected {expected}, claimed {claimed}"
    ))
    .into()
}

/// Links every id in `ids` to `record_id`, failing if any was taken meanwhile.
pub(crate) async fn claim_attendance<C: ConnectionTrait>(
    conn: &C,
    record_id: Uuid,
    ids: &[Uuid],
) -> Result<(), RepositoryError> {
    if ids.is_empty() {
        return Ok(());
    }

    let result = attendance_logs::Entity::update_many()
        .col_expr(attendance_logs::Column::PayrollRecordId, Expr::value(record_id))
        .filter(attendance_logs::Column::Id.is_in(ids.iter().copied()))
        .filter(attendance_logs::Column::PayrollRecordId.is_null())
        .exec(conn)
        .await?;

    if result.rows_affected != ids.len() as u64 {
        return Err(conflict("attendance", ids.len(), result.rows_affected));
    }
    debug!(%record_id, claimed = ids.len(), "claimed attendance facts");
    Ok(())
}

/// Links every id in `ids` to `record_id`, failing if any was taken meanwhile.
pub(crate) async fn claim_overtime<C: ConnectionTrait>(
    conn: &C,
    record_id: Uuid,
    ids: &[Uuid],
) -> Result<(), RepositoryError> {
    if ids.is_empty() {
        return Ok(());
    }

    let result = overtime_logs::Entity::update_many()
        .col_expr(overtime_logs::Column::PayrollRecordId, Expr::value(record_id))
        .filter(overtime_logs::Column::Id.is_in(ids.iter().copied()))
        .filter(overtime_logs::Column::PayrollRecordId.is_null())
        .exec(conn)
        .await?;

    if result.rows_affected != ids.len() as u64 {
        return Err(conflict("overtime", ids.len(), result.rows_affected));
    }
    debug!(%record_id, claimed = ids.len(), "claimed overtime facts");
    Ok(())
}

/// Releases facts claimed by `record_id` that are not in `keep`.
///
/// An empty `keep` releases everything the record holds.
pub(crate) async fn release_stale<C: ConnectionTrait>(
    conn: &C,
    record_id: Uuid,
    keep_attendance: &[Uuid],
    keep_overtime: &[Uuid],
) -> Result<u64, RepositoryError> {
    let mut attendance = attendance_logs::Entity::update_many()
        .col_expr(
            attendance_logs::Column::PayrollRecordId,
            Expr::value(Option::<Uuid>::None),
        )
        .filter(attendance_logs::Column::PayrollRecordId.eq(record_id));
    if !keep_attendance.is_empty() {
        attendance = attendance
            .filter(attendance_logs::Column::Id.is_not_in(keep_attendance.iter().copied()));
    }
    let released_attendance = attendance.exec(conn).await?.rows_affected;

    let mut overtime = overtime_logs::Entity::update_many()
        .col_expr(
            overtime_logs::Column::PayrollRecordId,
            Expr::value(Option::<Uuid>::None),
        )
        .filter(overtime_logs::Column::PayrollRecordId.eq(record_id));
    if !keep_overtime.is_empty() {
        overtime =
            overtime.filter(overtime_logs::Column::Id.is_not_in(keep_overtime.iter().copied()));
    }
    let released_overtime = overtime.exec(conn).await?.rows_affected;

    let released = released_attendance + released_overtime;
    if released > 0 {
        debug!(%record_id, released, "released stale fact claims");
    }
    Ok(released)
}

/// Releases every fact claimed by `record_id`.
pub(crate) async fn release_all<C: ConnectionTrait>(
    conn: &C,
    record_id: Uuid,
) -> Result<u64, RepositoryError> {
    release_stale(conn, record_id, &[], &[]).await
}
