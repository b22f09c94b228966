//! Payroll period types.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Status of a payroll period.
///
/// Valid transitions:
/// - Open → Processing (implicit, first computation)
/// - Open | Processing → Locked (lock)
/// - Locked → Closed (close)
/// - Processing | Locked → Open (reopen)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayrollPeriodStatus {
    /// Period accepts records and computations.
    Open,
    /// At least one computation has run.
    Processing,
    /// Records are frozen; only payments are accepted.
    Locked,
    /// Every record is paid. Terminal.
    Closed,
}

impl PayrollPeriodStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Processing => "processing",
            Self::Locked => "locked",
            Self::Closed => "closed",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "open" => Some(Self::Open),
            "processing" => Some(Self::Processing),
            "locked" => Some(Self::Locked),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }

    /// Returns true if records under this period may be created or recomputed.
    #[must_use]
    pub const fn allows_record_mutation(&self) -> bool {
        matches!(self, Self::Open | Self::Processing)
    }

    /// Returns true if records under this period may be paid.
    #[must_use]
    pub const fn allows_payment(&self) -> bool {
        !matches!(self, Self::Closed)
    }
}

impl fmt::Display for PayrollPeriodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive date range, compared on dates only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day included.
    pub start: NaiveDate,
    /// Last day included.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range without validating it.
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Returns true if the given date falls within the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Returns true if the two ranges share at least one day.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Number of calendar days in the range, both ends included.
    #[must_use]
    pub fn calendar_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Input for creating a payroll period.
#[derive(Debug, Clone)]
pub struct NewPeriod {
    /// Display name (e.g., "March 2026 - 1st half").
    pub name: String,
    /// First day of the period.
    pub start_date: NaiveDate,
    /// Last day of the period (inclusive).
    pub end_date: NaiveDate,
    /// Day salaries are released.
    pub pay_date: NaiveDate,
    /// Scheduled working days in the period.
    pub working_days: i32,
}

impl NewPeriod {
    /// The period's inclusive date range.
    #[must_use]
    pub const fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }
}

/// Record-level operations gated by period status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOperation {
    /// Create an uncomputed record.
    Create,
    /// Compute (or recompute) a record.
    Compute,
    /// Change supplementary earnings.
    UpdateEarnings,
    /// Add a deduction.
    AddDeduction,
    /// Remove a deduction.
    RemoveDeduction,
    /// Record a payment.
    MarkPaid,
    /// Delete the record.
    Delete,
}

/// Outcome of a validated period transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodTransition {
    /// Status after the transition.
    pub new_status: PayrollPeriodStatus,
    /// Value to store in `locked_at`.
    pub locked_at: Option<DateTime<Utc>>,
    /// Value to store in `closed_at`.
    pub closed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            PayrollPeriodStatus::Open,
            PayrollPeriodStatus::Processing,
            PayrollPeriodStatus::Locked,
            PayrollPeriodStatus::Closed,
        ] {
            assert_eq!(PayrollPeriodStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PayrollPeriodStatus::parse("LOCKED"), Some(PayrollPeriodStatus::Locked));
        assert_eq!(PayrollPeriodStatus::parse("archived"), None);
    }

    #[test]
    fn test_status_permissions() {
        assert!(PayrollPeriodStatus::Open.allows_record_mutation());
        assert!(PayrollPeriodStatus::Processing.allows_record_mutation());
        assert!(!PayrollPeriodStatus::Locked.allows_record_mutation());
        assert!(!PayrollPeriodStatus::Closed.allows_record_mutation());

        assert!(PayrollPeriodStatus::Locked.allows_payment());
        assert!(!PayrollPeriodStatus::Closed.allows_payment());
    }

    #[test]
    fn test_range_is_inclusive() {
        let range = DateRange::new(date(2026, 3, 1), date(2026, 3, 15));
        assert!(range.contains(date(2026, 3, 1)));
        assert!(range.contains(date(2026, 3, 15)));
        assert!(!range.contains(date(2026, 2, 28)));
        assert!(!range.contains(date(2026, 3, 16)));
        assert_eq!(range.calendar_days(), 15);
    }

    #[test]
    fn test_range_overlap() {
        let first = DateRange::new(date(2026, 3, 1), date(2026, 3, 15));
        let touching = DateRange::new(date(2026, 3, 15), date(2026, 3, 31));
        let after = DateRange::new(date(2026, 3, 16), date(2026, 3, 31));

        assert!(first.overlaps(&touching));
        assert!(touching.overlaps(&first));
        assert!(!first.overlaps(&after));
    }
}
