//! `SeaORM` Entity for payroll_periods table.

use payday_core::period::DateRange;
use payday_core::totals::PeriodTotals;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PayrollPeriodStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payroll_periods")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
    pub pay_date: Date,
    pub working_days: i32,
    pub status: PayrollPeriodStatus,
    pub locked_at: Option<DateTimeWithTimeZone>,
    pub closed_at: Option<DateTimeWithTimeZone>,
    pub total_employees: i32,
    pub paid_employees: i32,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub total_gross_pay: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub total_deductions: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub total_net_pay: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payroll_records::Entity")]
    PayrollRecords,
}

impl Related<super::payroll_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Inclusive date range covered by the period.
    #[must_use]
    pub const fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }

    /// Stored totals. `uncomputed_count` is not persisted and reads as zero.
    #[must_use]
    pub const fn stored_totals(&self) -> PeriodTotals {
        PeriodTotals {
            record_count: self.total_employees,
            paid_count: self.paid_employees,
            uncomputed_count: 0,
            total_gross_pay: self.total_gross_pay,
            total_deductions: self.total_deductions,
            total_net_pay: self.total_net_pay,
        }
    }
}
