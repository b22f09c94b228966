//! `SeaORM` active enums, stored as text so the schema stays portable.
//!
//! Each mirrors a `payday-core` enum and converts both ways.

use payday_core::attendance::AttendanceStatus as CoreAttendanceStatus;
use payday_core::deduction::{
    DeductionSource as CoreDeductionSource, DeductionType as CoreDeductionType,
};
use payday_core::employee::EmployeeStatus as CoreEmployeeStatus;
use payday_core::overtime::OvertimeApproval;
use payday_core::payroll::PaymentStatus as CorePaymentStatus;
use payday_core::period::PayrollPeriodStatus as CorePeriodStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Mirrors two enums that share variant names one-to-one.
macro_rules! mirror_enum {
    ($db:ident, $core:ident, [$($variant:ident),+ $(,)?]) => {
        impl From<$db> for $core {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$core> for $db {
            fn from(value: $core) -> Self {
                match value {
                    $($core::$variant => Self::$variant,)+
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
    #[sea_orm(string_value = "terminated")]
    Terminated,
}

mirror_enum!(EmployeeStatus, CoreEmployeeStatus, [Active, Inactive, Terminated]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum PayrollPeriodStatus {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "locked")]
    Locked,
    #[sea_orm(string_value = "closed")]
    Closed,
}

mirror_enum!(PayrollPeriodStatus, CorePeriodStatus, [Open, Processing, Locked, Closed]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "kebab-case")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "partially-paid")]
    PartiallyPaid,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

mirror_enum!(PaymentStatus, CorePaymentStatus, [Unpaid, Paid, PartiallyPaid, Cancelled]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceStatus {
    #[sea_orm(string_value = "present")]
    Present,
    #[sea_orm(string_value = "absent")]
    Absent,
    #[sea_orm(string_value = "late")]
    Late,
    #[sea_orm(string_value = "half-day")]
    HalfDay,
    #[sea_orm(string_value = "on-leave")]
    OnLeave,
    #[sea_orm(string_value = "holiday")]
    Holiday,
}

mirror_enum!(
    AttendanceStatus,
    CoreAttendanceStatus,
    [Present, Absent, Late, HalfDay, OnLeave, Holiday]
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

mirror_enum!(ApprovalStatus, OvertimeApproval, [Pending, Approved, Rejected]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "kebab-case")]
pub enum DeductionType {
    #[sea_orm(string_value = "sss")]
    Sss,
    #[sea_orm(string_value = "philhealth")]
    Philhealth,
    #[sea_orm(string_value = "pag-ibig")]
    PagIbig,
    #[sea_orm(string_value = "tax")]
    Tax,
    #[sea_orm(string_value = "loan")]
    Loan,
    #[sea_orm(string_value = "advance")]
    Advance,
    #[sea_orm(string_value = "other")]
    Other,
}

mirror_enum!(
    DeductionType,
    CoreDeductionType,
    [Sss, Philhealth, PagIbig, Tax, Loan, Advance, Other]
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum DeductionSource {
    #[sea_orm(string_value = "policy")]
    Policy,
    #[sea_orm(string_value = "manual")]
    Manual,
}

mirror_enum!(DeductionSource, CoreDeductionSource, [Policy, Manual]);
