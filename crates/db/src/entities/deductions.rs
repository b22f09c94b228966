//! `SeaORM` Entity for deductions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{DeductionSource, DeductionType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "deductions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub payroll_record_id: Uuid,
    pub deduction_type: DeductionType,
    pub source: DeductionSource,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub amount: Decimal,
    pub is_recurring: bool,
    pub note: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::payroll_records::Entity",
        from = "Column::PayrollRecordId",
        to = "super::payroll_records::Column::Id",
        on_delete = "Cascade"
    )]
    PayrollRecords,
}

impl Related<super::payroll_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
