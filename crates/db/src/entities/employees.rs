//! `SeaORM` Entity for employees table.

use payday_core::employee::{EmployeeRates, EmployeeSnapshot};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::EmployeeStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub employee_code: String,
    pub full_name: String,
    pub status: EmployeeStatus,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub daily_rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub hourly_rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((8, 4)))")]
    pub overtime_multiplier: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payroll_records::Entity")]
    PayrollRecords,
    #[sea_orm(has_many = "super::attendance_logs::Entity")]
    AttendanceLogs,
    #[sea_orm(has_many = "super::overtime_logs::Entity")]
    OvertimeLogs,
}

impl Related<super::payroll_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollRecords.def()
    }
}

impl Related<super::attendance_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttendanceLogs.def()
    }
}

impl Related<super::overtime_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OvertimeLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Current rates.
    #[must_use]
    pub const fn rates(&self) -> EmployeeRates {
        EmployeeRates {
            daily_rate: self.daily_rate,
            hourly_rate: self.hourly_rate,
            overtime_multiplier: self.overtime_multiplier,
        }
    }

    /// Engine view of the employee.
    #[must_use]
    pub fn snapshot(&self) -> EmployeeSnapshot {
        EmployeeSnapshot {
            id: self.id,
            status: self.status.into(),
            rates: self.rates(),
        }
    }
}
