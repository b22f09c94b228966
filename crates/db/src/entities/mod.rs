//! `SeaORM` entity definitions.

pub mod attendance_logs;
pub mod deductions;
pub mod employees;
pub mod overtime_logs;
pub mod payroll_periods;
pub mod payroll_records;
pub mod sea_orm_active_enums;
