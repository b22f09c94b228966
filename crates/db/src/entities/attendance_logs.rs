//! `SeaORM` Entity for attendance_logs table.

use payday_core::attendance::AttendanceFact;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::AttendanceStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub employee_id: Uuid,
    pub work_date: Date,
    pub status: AttendanceStatus,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub hours_worked: Decimal,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub overtime_hours: Decimal,
    pub late_minutes: i32,
    pub payroll_record_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employees::Entity",
        from = "Column::EmployeeId",
        to = "super::employees::Column::Id"
    )]
    Employees,
    #[sea_orm(
        belongs_to = "super::payroll_records::Entity",
        from = "Column::PayrollRecordId",
        to = "super::payroll_records::Column::Id"
    )]
    PayrollRecords,
}

impl Related<super::employees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employees.def()
    }
}

impl Related<super::payroll_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Model> for AttendanceFact {
    fn from(model: &Model) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            work_date: model.work_date,
            status: model.status.into(),
            hours_worked: model.hours_worked,
            overtime_hours: model.overtime_hours,
            late_minutes: model.late_minutes,
            payroll_record_id: model.payroll_record_id,
        }
    }
}
