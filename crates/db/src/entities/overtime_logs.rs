//! `SeaORM` Entity for overtime_logs table.

use payday_core::overtime::OvertimeFact;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ApprovalStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "overtime_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub employee_id: Uuid,
    pub work_date: Date,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub hours: Decimal,
    #[sea_orm(column_type = "Decimal(Some((8, 4)))", nullable)]
    pub rate_multiplier: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))", nullable)]
    pub amount: Option<Decimal>,
    pub approval_status: ApprovalStatus,
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

impl From<&Model> for OvertimeFact {
    fn from(model: &Model) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            work_date: model.work_date,
            hours: model.hours,
            rate_multiplier: model.rate_multiplier,
            amount: model.amount,
            approval: model.approval_status.into(),
            payroll_record_id: model.payroll_record_id,
        }
    }
}
