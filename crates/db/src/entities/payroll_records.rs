//! `SeaORM` Entity for payroll_records table.

use payday_core::deduction::DeductionBreakdown;
use payday_core::employee::EmployeeRates;
use payday_core::payroll::{Earnings, SupplementaryEarnings};
use payday_core::totals::RecordTotalsInput;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PaymentStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payroll_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub employee_id: Uuid,
    pub payroll_period_id: Uuid,
    // Rate snapshot
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub daily_rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub hourly_rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((8, 4)))")]
    pub overtime_multiplier: Decimal,
    // Attendance
    pub days_present: i32,
    pub days_absent: i32,
    pub days_late: i32,
    pub days_half_day: i32,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub hours_worked: Decimal,
    pub late_minutes: i32,
    // Earnings
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub basic_pay: Decimal,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub overtime_hours: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub overtime_pay: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub holiday_pay: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub night_diff_pay: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub allowance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub bonus: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub gross_pay: Decimal,
    // Deductions
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub sss: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub philhealth: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub pag_ibig: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub tax: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub loan: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub advance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub other_deductions: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub deductions_total: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub net_pay: Decimal,
    // Payment
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub amount_paid: Decimal,
    pub payment_status: PaymentStatus,
    pub payment_reference: Option<String>,
    pub computed_at: Option<DateTimeWithTimeZone>,
    pub paid_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
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
        belongs_to = "super::payroll_periods::Entity",
        from = "Column::PayrollPeriodId",
        to = "super::payroll_periods::Column::Id"
    )]
    PayrollPeriods,
    #[sea_orm(has_many = "super::deductions::Entity")]
    Deductions,
}

impl Related<super::employees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employees.def()
    }
}

impl Related<super::payroll_periods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollPeriods.def()
    }
}

impl Related<super::deductions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Deductions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Rates the record was computed with.
    #[must_use]
    pub const fn rates(&self) -> EmployeeRates {
        EmployeeRates {
            daily_rate: self.daily_rate,
            hourly_rate: self.hourly_rate,
            overtime_multiplier: self.overtime_multiplier,
        }
    }

    /// Stored holiday, night differential, allowance, and bonus.
    #[must_use]
    pub const fn supplementary(&self) -> SupplementaryEarnings {
        SupplementaryEarnings {
            holiday_pay: self.holiday_pay,
            night_diff_pay: self.night_diff_pay,
            allowance: self.allowance,
            bonus: self.bonus,
        }
    }

    /// Stored earnings breakdown.
    #[must_use]
    pub const fn earnings(&self) -> Earnings {
        Earnings {
            basic_pay: self.basic_pay,
            overtime_hours: self.overtime_hours,
            overtime_pay: self.overtime_pay,
            supplementary: self.supplementary(),
            gross_pay: self.gross_pay,
        }
    }

    /// Stored deduction category totals.
    #[must_use]
    pub const fn breakdown(&self) -> DeductionBreakdown {
        DeductionBreakdown {
            sss: self.sss,
            philhealth: self.philhealth,
            pag_ibig: self.pag_ibig,
            tax: self.tax,
            loan: self.loan,
            advance: self.advance,
            other: self.other_deductions,
        }
    }

    /// The fields period totals are built from.
    #[must_use]
    pub fn totals_input(&self) -> RecordTotalsInput {
        RecordTotalsInput {
            gross_pay: self.gross_pay,
            deductions_total: self.deductions_total,
            net_pay: self.net_pay,
            computed: self.computed_at.is_some(),
            payment_status: self.payment_status.into(),
        }
    }
}
