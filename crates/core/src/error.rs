//! Payroll engine error types.
//!
//! Every error belongs to one [`ErrorKind`] so callers can tell "nothing
//! happened, retry" apart from "your request conflicts with current state".

use chrono::NaiveDate;
use payday_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::period::PayrollPeriodStatus;

/// Coarse classification of a [`PayrollError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Employee, period, record, or deduction is missing.
    NotFound,
    /// The request conflicts with the current period or record state.
    InvalidState,
    /// Malformed input, rejected before any write.
    Validation,
    /// Two writers raced on the same record; safe to retry once.
    ConcurrencyConflict,
    /// Storage or programming failure.
    Internal,
}

/// Errors that can occur during payroll operations.
#[derive(Debug, Error)]
pub enum PayrollError {
    // ========== Not Found ==========
    /// Employee not found.
    #[error("Employee not found: {0}")]
    EmployeeNotFound(Uuid),

    /// Payroll period not found.
    #[error("Payroll period not found: {0}")]
    PeriodNotFound(Uuid),

    /// Payroll record not found.
    #[error("Payroll record not found: {0}")]
    RecordNotFound(Uuid),

    /// Deduction not found.
    #[error("Deduction not found: {0}")]
    DeductionNotFound(Uuid),

    // ========== Period State ==========
    /// Period is locked; records can only be paid.
    #[error("Payroll period is locked, records cannot be changed")]
    PeriodLocked,

    /// Period is closed; nothing under it can change.
    #[error("Payroll period is closed")]
    PeriodClosed,

    /// Period is already closed.
    #[error("Payroll period is already closed")]
    AlreadyClosed,

    /// Lock requested on a period without records.
    #[error("Cannot lock period: no payroll records exist")]
    NoRecords,

    /// Lock requested while some records were never computed.
    #[error("Cannot lock period: {count} records not computed")]
    NotAllComputed {
        /// Number of records with no `computed_at`.
        count: i32,
    },

    /// Close requested on a period that is not locked.
    #[error("Cannot close period: period is {0}, expected locked")]
    NotLocked(PayrollPeriodStatus),

    /// Close requested while some records are not paid.
    #[error("Cannot close period: {count} records not paid")]
    UnpaidRecordsExist {
        /// Number of records whose payment status is not `paid`.
        count: i32,
    },

    /// Transition not allowed by the period state machine.
    #[error("Invalid period transition from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: PayrollPeriodStatus,
        /// Requested status.
        to: PayrollPeriodStatus,
    },

    /// Period deletion requested while records exist.
    #[error("Cannot delete period: {count} payroll records exist")]
    PeriodHasRecords {
        /// Number of records owned by the period.
        count: i32,
    },

    /// Period deletion requested outside the open state.
    #[error("Cannot delete period: period is {0}, expected open")]
    PeriodNotOpen(PayrollPeriodStatus),

    // ========== Record State ==========
    /// Record is paid and immutable.
    #[error("Payroll record is paid and cannot be changed")]
    RecordPaid,

    /// Record already carries a partial payment.
    #[error("Payroll record has partial payments and cannot be changed")]
    RecordHasPayments,

    /// Payment requested for a record that is already paid.
    #[error("Payroll record is already paid")]
    AlreadyPaid,

    /// Payment requested for a cancelled record.
    #[error("Payroll record is cancelled")]
    RecordCancelled,

    // ========== Validation ==========
    /// Start date is after end date.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// Requested start date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },

    /// Pay date falls before the period ends.
    #[error("Pay date {pay_date} is before period end {end}")]
    PayDateBeforeEnd {
        /// Requested pay date.
        pay_date: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },

    /// Working days outside `0..=calendar days`.
    #[error("Working days must be between 0 and {max}, got {value}")]
    InvalidWorkingDays {
        /// Requested working days.
        value: i32,
        /// Calendar days in the period.
        max: i64,
    },

    /// Period overlaps an existing period.
    #[error("Period overlaps existing period: {0}")]
    OverlappingPeriod(String),

    /// Period name is blank.
    #[error("Period name cannot be empty")]
    EmptyName,

    /// Amount cannot be negative.
    #[error("{0} cannot be negative")]
    NegativeAmount(&'static str),

    /// Amount cannot be zero.
    #[error("{0} must be greater than zero")]
    ZeroAmount(&'static str),

    /// Payment exceeds what is still owed.
    #[error("Payment of {amount} exceeds outstanding balance {outstanding}")]
    Overpayment {
        /// Requested payment.
        amount: Decimal,
        /// Remaining balance on the record.
        outstanding: Decimal,
    },

    /// Deduction category outside the fixed set.
    #[error("Unknown deduction type: {0}")]
    UnknownDeductionType(String),

    /// Contribution rate outside `0..=1`.
    #[error("Contribution rate must be between 0 and 1, got {0}")]
    InvalidContributionRate(Decimal),

    // ========== Concurrency ==========
    /// Another writer changed the same rows first.
    #[error("Concurrent modification detected, please retry: {0}")]
    ConcurrencyConflict(String),

    // ========== Internal ==========
    /// Storage or programming failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PayrollError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmployeeNotFound(_)
            | Self::PeriodNotFound(_)
            | Self::RecordNotFound(_)
            | Self::DeductionNotFound(_) => ErrorKind::NotFound,

            Self::PeriodLocked
            | Self::PeriodClosed
            | Self::AlreadyClosed
            | Self::NoRecords
            | Self::NotAllComputed { .. }
            | Self::NotLocked(_)
            | Self::UnpaidRecordsExist { .. }
            | Self::InvalidTransition { .. }
            | Self::PeriodHasRecords { .. }
            | Self::PeriodNotOpen(_)
            | Self::RecordPaid
            | Self::RecordHasPayments
            | Self::AlreadyPaid
            | Self::RecordCancelled => ErrorKind::InvalidState,

            Self::InvalidDateRange { .. }
            | Self::PayDateBeforeEnd { .. }
            | Self::InvalidWorkingDays { .. }
            | Self::OverlappingPeriod(_)
            | Self::EmptyName
            | Self::NegativeAmount(_)
            | Self::ZeroAmount(_)
            | Self::Overpayment { .. }
            | Self::UnknownDeductionType(_)
            | Self::InvalidContributionRate(_) => ErrorKind::Validation,

            Self::ConcurrencyConflict(_) => ErrorKind::ConcurrencyConflict,

            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmployeeNotFound(_) => "EMPLOYEE_NOT_FOUND",
            Self::PeriodNotFound(_) => "PERIOD_NOT_FOUND",
            Self::RecordNotFound(_) => "RECORD_NOT_FOUND",
            Self::DeductionNotFound(_) => "DEDUCTION_NOT_FOUND",
            Self::PeriodLocked => "PERIOD_LOCKED",
            Self::PeriodClosed => "PERIOD_CLOSED",
            Self::AlreadyClosed => "ALREADY_CLOSED",
            Self::NoRecords => "NO_RECORDS",
            Self::NotAllComputed { .. } => "NOT_ALL_COMPUTED",
            Self::NotLocked(_) => "NOT_LOCKED",
            Self::UnpaidRecordsExist { .. } => "UNPAID_RECORDS_EXIST",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::PeriodHasRecords { .. } => "PERIOD_HAS_RECORDS",
            Self::PeriodNotOpen(_) => "PERIOD_NOT_OPEN",
            Self::RecordPaid => "RECORD_PAID",
            Self::RecordHasPayments => "RECORD_HAS_PAYMENTS",
            Self::AlreadyPaid => "ALREADY_PAID",
            Self::RecordCancelled => "RECORD_CANCELLED",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::PayDateBeforeEnd { .. } => "PAY_DATE_BEFORE_END",
            Self::InvalidWorkingDays { .. } => "INVALID_WORKING_DAYS",
            Self::OverlappingPeriod(_) => "OVERLAPPING_PERIOD",
            Self::EmptyName => "EMPTY_NAME",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::ZeroAmount(_) => "ZERO_AMOUNT",
            Self::Overpayment { .. } => "OVERPAYMENT",
            Self::UnknownDeductionType(_) => "UNKNOWN_DEDUCTION_TYPE",
            Self::InvalidContributionRate(_) => "INVALID_CONTRIBUTION_RATE",
            Self::ConcurrencyConflict(_) => "CONCURRENCY_CONFLICT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::NotFound => 404,
            ErrorKind::InvalidState => 422,
            ErrorKind::Validation => 400,
            ErrorKind::ConcurrencyConflict => 409,
            ErrorKind::Internal => 500,
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::ConcurrencyConflict)
    }
}

impl From<PayrollError> for AppError {
    fn from(err: PayrollError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::InvalidState => Self::InvalidState(message),
            ErrorKind::Validation => Self::Validation(message),
            ErrorKind::ConcurrencyConflict => Self::Conflict(message),
            ErrorKind::Internal => Self::Internal(message),
        }
    }
}
