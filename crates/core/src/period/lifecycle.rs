//! Payroll period state machine and transition guards.
//!
//! Every function here is pure: callers load the current period status and
//! fresh totals, ask for a decision, and persist the returned transition
//! inside their own unit of work.

use chrono::{DateTime, Utc};

use super::types::{DateRange, NewPeriod, PayrollPeriodStatus, PeriodTransition, RecordOperation};
use crate::error::PayrollError;
use crate::payroll::PaymentStatus;
use crate::totals::PeriodTotals;

/// Stateless guard service for the payroll period lifecycle.
pub struct PeriodLifecycle;

impl PeriodLifecycle {
    /// Validates the fields of a new period.
    ///
    /// Enforces `start_date <= end_date <= pay_date`, a non-blank name, and
    /// `0 <= working_days <= calendar days`.
    pub fn validate_new_period(input: &NewPeriod) -> Result<(), PayrollError> {
        if input.name.trim().is_empty() {
            return Err(PayrollError::EmptyName);
        }
        if input.start_date > input.end_date {
            return Err(PayrollError::InvalidDateRange {
                start: input.start_date,
                end: input.end_date,
            });
        }
        if input.pay_date < input.end_date {
            return Err(PayrollError::PayDateBeforeEnd {
                pay_date: input.pay_date,
                end: input.end_date,
            });
        }

        let max = input.range().calendar_days();
        if input.working_days < 0 || i64::from(input.working_days) > max {
            return Err(PayrollError::InvalidWorkingDays {
                value: input.working_days,
                max,
            });
        }

        Ok(())
    }

    /// Rejects a range that overlaps any existing `(name, range)` pair.
    pub fn ensure_no_overlap<'a, I>(range: DateRange, existing: I) -> Result<(), PayrollError>
    where
        I: IntoIterator<Item = (&'a str, DateRange)>,
    {
        for (name, other) in existing {
            if range.overlaps(&other) {
                return Err(PayrollError::OverlappingPeriod(name.to_string()));
            }
        }
        Ok(())
    }

    /// Gate for every record mutation.
    ///
    /// The period is checked first, then the record's payment status
    /// (`None` when the record does not exist yet). Locked periods still
    /// accept payments.
    pub fn ensure_record_mutable(
        period_status: PayrollPeriodStatus,
        payment_status: Option<PaymentStatus>,
        operation: RecordOperation,
    ) -> Result<(), PayrollError> {
        match period_status {
            PayrollPeriodStatus::Closed => return Err(PayrollError::PeriodClosed),
            PayrollPeriodStatus::Locked if operation != RecordOperation::MarkPaid => {
                return Err(PayrollError::PeriodLocked);
            }
            _ => {}
        }

        let Some(payment_status) = payment_status else {
            return Ok(());
        };

        match (operation, payment_status) {
            (RecordOperation::MarkPaid, PaymentStatus::Paid) => Err(PayrollError::AlreadyPaid),
            (RecordOperation::MarkPaid, PaymentStatus::Cancelled) => {
                Err(PayrollError::RecordCancelled)
            }
            (RecordOperation::MarkPaid, _) => Ok(()),
            (_, PaymentStatus::Paid) => Err(PayrollError::RecordPaid),
            (_, PaymentStatus::PartiallyPaid) => Err(PayrollError::RecordHasPayments),
            _ => Ok(()),
        }
    }

    /// Status to move to when a computation starts, if any.
    #[must_use]
    pub const fn begin_processing(status: PayrollPeriodStatus) -> Option<PayrollPeriodStatus> {
        match status {
            PayrollPeriodStatus::Open => Some(PayrollPeriodStatus::Processing),
            _ => None,
        }
    }

    /// Validates `open | processing -> locked`.
    ///
    /// Requires at least one record and every record computed.
    pub fn lock(
        status: PayrollPeriodStatus,
        totals: &PeriodTotals,
        now: DateTime<Utc>,
    ) -> Result<PeriodTransition, PayrollError> {
        match status {
            PayrollPeriodStatus::Closed => return Err(PayrollError::AlreadyClosed),
            PayrollPeriodStatus::Locked => {
                return Err(PayrollError::InvalidTransition {
                    from: status,
                    to: PayrollPeriodStatus::Locked,
                });
            }
            PayrollPeriodStatus::Open | PayrollPeriodStatus::Processing => {}
        }

        if totals.record_count == 0 {
            return Err(PayrollError::NoRecords);
        }
        if totals.uncomputed_count > 0 {
            return Err(PayrollError::NotAllComputed {
                count: totals.uncomputed_count,
            });
        }

        Ok(PeriodTransition {
            new_status: PayrollPeriodStatus::Locked,
            locked_at: Some(now),
            closed_at: None,
        })
    }

    /// Validates `locked -> closed`.
    ///
    /// Requires every record paid. `locked_at` is carried over unchanged.
    pub fn close(
        status: PayrollPeriodStatus,
        totals: &PeriodTotals,
        locked_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<PeriodTransition, PayrollError> {
        match status {
            PayrollPeriodStatus::Closed => return Err(PayrollError::AlreadyClosed),
            PayrollPeriodStatus::Locked => {}
            other => return Err(PayrollError::NotLocked(other)),
        }

        let unpaid = totals.unpaid_count();
        if unpaid > 0 {
            return Err(PayrollError::UnpaidRecordsExist { count: unpaid });
        }

        Ok(PeriodTransition {
            new_status: PayrollPeriodStatus::Closed,
            locked_at,
            closed_at: Some(now),
        })
    }

    /// Validates `processing | locked -> open`. Clears `locked_at`.
    pub fn reopen(status: PayrollPeriodStatus) -> Result<PeriodTransition, PayrollError> {
        match status {
            PayrollPeriodStatus::Closed => Err(PayrollError::AlreadyClosed),
            PayrollPeriodStatus::Open => Err(PayrollError::InvalidTransition {
                from: status,
                to: PayrollPeriodStatus::Open,
            }),
            PayrollPeriodStatus::Processing | PayrollPeriodStatus::Locked => Ok(PeriodTransition {
                new_status: PayrollPeriodStatus::Open,
                locked_at: None,
                closed_at: None,
            }),
        }
    }

    /// Deletion is allowed only for an open period without records.
    pub fn validate_delete(
        status: PayrollPeriodStatus,
        record_count: i32,
    ) -> Result<(), PayrollError> {
        match status {
            PayrollPeriodStatus::Open => {}
            PayrollPeriodStatus::Closed => return Err(PayrollError::PeriodClosed),
            other => return Err(PayrollError::PeriodNotOpen(other)),
        }
        if record_count > 0 {
            return Err(PayrollError::PeriodHasRecords {
                count: record_count,
            });
        }
        Ok(())
    }
}
