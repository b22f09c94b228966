//! Shared fixtures for repository integration tests.
//!
//! Each test gets its own in-memory SQLite database migrated with the real
//! `Migrator`.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use payday_core::deduction::DeductionType;
use payday_core::payroll::{DeductionPolicy, FlatRatePolicy};
use payday_core::period::NewPeriod;
use payday_db::PayrollEngine;
use payday_db::entities::{
    attendance_logs, employees, overtime_logs,
    sea_orm_active_enums::{ApprovalStatus, AttendanceStatus, EmployeeStatus},
};
use payday_db::migration::{Migrator, MigratorTrait};
use payday_shared::types::{EmployeeId, PayrollPeriodId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use uuid::Uuid;

pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

/// Flat 10% tax on gross.
pub fn ten_percent_tax() -> Arc<dyn DeductionPolicy> {
    Arc::new(FlatRatePolicy::new(DeductionType::Tax, dec!(0.10)).unwrap())
}

pub struct TestContext {
    pub db: DatabaseConnection,
    pub engine: PayrollEngine,
}

pub async fn setup() -> TestContext {
    let db = setup_db().await;
    let engine = PayrollEngine::new(db.clone(), ten_percent_tax());
    TestContext { db, engine }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// March 1-15 2026, paid on the 20th.
pub fn first_half_march() -> NewPeriod {
    NewPeriod {
        name: "March 2026 - 1st half".to_string(),
        start_date: date(2026, 3, 1),
        end_date: date(2026, 3, 15),
        pay_date: date(2026, 3, 20),
        working_days: 10,
    }
}

/// March 16-31 2026, paid on April 5th.
pub fn second_half_march() -> NewPeriod {
    NewPeriod {
        name: "March 2026 - 2nd half".to_string(),
        start_date: date(2026, 3, 16),
        end_date: date(2026, 3, 31),
        pay_date: date(2026, 4, 5),
        working_days: 11,
    }
}

pub async fn create_period(ctx: &TestContext, input: NewPeriod) -> PayrollPeriodId {
    let period = ctx.engine.create_period(input).await.unwrap();
    PayrollPeriodId::from_uuid(period.id)
}

/// Active employee at 1000/day, 125/hour, 1.25 overtime.
pub async fn create_employee(db: &DatabaseConnection, code: &str) -> EmployeeId {
    create_employee_with(db, code, EmployeeStatus::Active, dec!(1000)).await
}

pub async fn create_employee_with(
    db: &DatabaseConnection,
    code: &str,
    status: EmployeeStatus,
    daily_rate: Decimal,
) -> EmployeeId {
    let now = Utc::now();
    let id = Uuid::now_v7();
    employees::ActiveModel {
        id: Set(id),
        employee_code: Set(code.to_string()),
        full_name: Set(format!("Employee {code}")),
        status: Set(status),
        daily_rate: Set(daily_rate),
        hourly_rate: Set(dec!(125)),
        overtime_multiplier: Set(dec!(1.25)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await
    .unwrap();
    EmployeeId::from_uuid(id)
}

pub async fn log_attendance(
    db: &DatabaseConnection,
    employee_id: EmployeeId,
    work_date: NaiveDate,
    status: AttendanceStatus,
) -> Uuid {
    let hours = match status {
        AttendanceStatus::Present | AttendanceStatus::Late => dec!(8),
        AttendanceStatus::HalfDay => dec!(4),
        _ => Decimal::ZERO,
    };
    let id = Uuid::now_v7();
    attendance_logs::ActiveModel {
        id: Set(id),
        employee_id: Set(employee_id.into_inner()),
        work_date: Set(work_date),
        status: Set(status),
        hours_worked: Set(hours),
        overtime_hours: Set(Decimal::ZERO),
        late_minutes: Set(if status == AttendanceStatus::Late { 15 } else { 0 }),
        payroll_record_id: Set(None),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .unwrap();
    id
}

/// Eight present days (2nd-9th), a half day on the 10th, absent on the 11th.
pub async fn log_standard_fortnight(db: &DatabaseConnection, employee_id: EmployeeId) {
    for day in 2..=9 {
        log_attendance(db, employee_id, date(2026, 3, day), AttendanceStatus::Present).await;
    }
    log_attendance(db, employee_id, date(2026, 3, 10), AttendanceStatus::HalfDay).await;
    log_attendance(db, employee_id, date(2026, 3, 11), AttendanceStatus::Absent).await;
}

pub async fn log_overtime(
    db: &DatabaseConnection,
    employee_id: EmployeeId,
    work_date: NaiveDate,
    hours: Decimal,
    amount: Option<Decimal>,
    approval: ApprovalStatus,
) -> Uuid {
    let id = Uuid::now_v7();
    overtime_logs::ActiveModel {
        id: Set(id),
        employee_id: Set(employee_id.into_inner()),
        work_date: Set(work_date),
        hours: Set(hours),
        rate_multiplier: Set(None),
        amount: Set(amount),
        approval_status: Set(approval),
        payroll_record_id: Set(None),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .unwrap();
    id
}
