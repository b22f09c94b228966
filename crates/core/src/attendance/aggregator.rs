//! Summarizes attendance facts for one employee over a date range.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::period::DateRange;

/// Attendance status of one work day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceStatus {
    /// Worked the full day.
    Present,
    /// Did not work.
    Absent,
    /// Worked, but arrived late.
    Late,
    /// Worked half a day.
    HalfDay,
    /// Approved leave.
    OnLeave,
    /// Non-working holiday.
    Holiday,
}

impl AttendanceStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::Late => "late",
            Self::HalfDay => "half-day",
            Self::OnLeave => "on-leave",
            Self::Holiday => "holiday",
        }
    }
}

/// One attendance log row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceFact {
    /// Fact ID.
    pub id: Uuid,
    /// Employee the fact belongs to.
    pub employee_id: Uuid,
    /// Day the fact describes.
    pub work_date: NaiveDate,
    /// Status of the day.
    pub status: AttendanceStatus,
    /// Hours worked that day.
    pub hours_worked: Decimal,
    /// Overtime hours logged on the attendance row (informational).
    pub overtime_hours: Decimal,
    /// Minutes late.
    pub late_minutes: i32,
    /// Record that claimed this fact, if any.
    pub payroll_record_id: Option<Uuid>,
}

/// Day counts and hour totals for one employee and range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceSummary {
    /// Present days, including late days.
    pub days_present: i32,
    /// Absent days (raw count of `absent` facts).
    pub days_absent: i32,
    /// Late days. Each is also counted in `days_present`.
    pub days_late: i32,
    /// Half days.
    pub days_half_day: i32,
    /// Days on leave.
    pub days_on_leave: i32,
    /// Holidays.
    pub days_holiday: i32,
    /// Sum of hours worked.
    pub hours_worked: Decimal,
    /// Sum of overtime hours on attendance rows.
    pub overtime_hours: Decimal,
    /// Sum of late minutes.
    pub late_minutes: i32,
    /// Facts that went into this summary, to be claimed.
    #[serde(skip)]
    pub fact_ids: Vec<Uuid>,
}

impl AttendanceSummary {
    /// Days paid at the daily rate: present days plus half of the half days.
    #[must_use]
    pub fn payable_days(&self) -> Decimal {
        Decimal::from(self.days_present) + Decimal::from(self.days_half_day) / Decimal::TWO
    }
}

/// Stateless attendance aggregation service.
pub struct AttendanceAggregator;

impl AttendanceAggregator {
    /// Returns true if the fact may be counted by `claimant`.
    ///
    /// A fact is eligible when it belongs to the employee, falls inside the
    /// range, and is either unclaimed or already claimed by `claimant`.
    #[must_use]
    pub fn is_eligible(
        fact: &AttendanceFact,
        employee_id: Uuid,
        range: DateRange,
        claimant: Uuid,
    ) -> bool {
        fact.employee_id == employee_id
            && range.contains(fact.work_date)
            && fact.payroll_record_id.is_none_or(|owner| owner == claimant)
    }

    /// Summarizes the eligible facts among `facts`.
    ///
    /// A `late` day counts toward both `days_present` and `days_late`.
    pub fn summarize<'a, I>(
        employee_id: Uuid,
        range: DateRange,
        facts: I,
        claimant: Uuid,
    ) -> AttendanceSummary
    where
        I: IntoIterator<Item = &'a AttendanceFact>,
    {
        let mut summary = AttendanceSummary::default();

        for fact in facts {
            if !Self::is_eligible(fact, employee_id, range, claimant) {
                continue;
            }

            match fact.status {
                AttendanceStatus::Present => summary.days_present += 1,
                AttendanceStatus::Late => {
                    summary.days_present += 1;
                    summary.days_late += 1;
                }
                AttendanceStatus::HalfDay => summary.days_half_day += 1,
                AttendanceStatus::Absent => summary.days_absent += 1,
                AttendanceStatus::OnLeave => summary.days_on_leave += 1,
                AttendanceStatus::Holiday => summary.days_holiday += 1,
            }

            summary.hours_worked += fact.hours_worked;
            summary.overtime_hours += fact.overtime_hours;
            summary.late_minutes += fact.late_minutes;
            summary.fact_ids.push(fact.id);
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fact(employee_id: Uuid, day: u32, status: AttendanceStatus) -> AttendanceFact {
        AttendanceFact {
            id: Uuid::new_v4(),
            employee_id,
            work_date: date(2026, 3, day),
            status,
            hours_worked: match status {
                AttendanceStatus::Present | AttendanceStatus::Late => dec!(8),
                AttendanceStatus::HalfDay => dec!(4),
                _ => Decimal::ZERO,
            },
            overtime_hours: Decimal::ZERO,
            late_minutes: if status == AttendanceStatus::Late { 15 } else { 0 },
            payroll_record_id: None,
        }
    }

    fn march_first_half() -> DateRange {
        DateRange::new(date(2026, 3, 1), date(2026, 3, 15))
    }

    #[test]
    fn test_late_counts_as_present() {
        let emp = Uuid::new_v4();
        let facts = vec![
            fact(emp, 2, AttendanceStatus::Present),
            fact(emp, 3, AttendanceStatus::Late),
            fact(emp, 4, AttendanceStatus::HalfDay),
            fact(emp, 5, AttendanceStatus::Absent),
            fact(emp, 6, AttendanceStatus::OnLeave),
            fact(emp, 7, AttendanceStatus::Holiday),
        ];

        let summary =
            AttendanceAggregator::summarize(emp, march_first_half(), &facts, Uuid::new_v4());

        assert_eq!(summary.days_present, 2);
        assert_eq!(summary.days_late, 1);
        assert_eq!(summary.days_half_day, 1);
        assert_eq!(summary.days_absent, 1);
        assert_eq!(summary.days_on_leave, 1);
        assert_eq!(summary.days_holiday, 1);
        assert_eq!(summary.hours_worked, dec!(20));
        assert_eq!(summary.late_minutes, 15);
        assert_eq!(summary.fact_ids.len(), 6);
        assert_eq!(summary.payable_days(), dec!(2.5));
    }

    #[test]
    fn test_range_boundaries_are_inclusive() {
        let emp = Uuid::new_v4();
        let mut outside = fact(emp, 1, AttendanceStatus::Present);
        outside.work_date = date(2026, 2, 28);
        let facts = vec![
            outside,
            fact(emp, 1, AttendanceStatus::Present),
            fact(emp, 15, AttendanceStatus::Present),
            fact(emp, 16, AttendanceStatus::Present),
        ];

        let summary =
            AttendanceAggregator::summarize(emp, march_first_half(), &facts, Uuid::new_v4());
        assert_eq!(summary.days_present, 2);
    }

    #[test]
    fn test_ignores_other_employees_and_foreign_claims() {
        let emp = Uuid::new_v4();
        let record = Uuid::new_v4();

        let mut mine = fact(emp, 2, AttendanceStatus::Present);
        mine.payroll_record_id = Some(record);
        let mut foreign = fact(emp, 3, AttendanceStatus::Present);
        foreign.payroll_record_id = Some(Uuid::new_v4());
        let other_employee = fact(Uuid::new_v4(), 4, AttendanceStatus::Present);

        let facts = vec![mine.clone(), foreign, other_employee];
        let summary = AttendanceAggregator::summarize(emp, march_first_half(), &facts, record);

        assert_eq!(summary.days_present, 1);
        assert_eq!(summary.fact_ids, vec![mine.id]);
    }

    #[test]
    fn test_empty_input() {
        let summary = AttendanceAggregator::summarize(
            Uuid::new_v4(),
            march_first_half(),
            &Vec::new(),
            Uuid::new_v4(),
        );
        assert_eq!(summary, AttendanceSummary::default());
        assert_eq!(summary.payable_days(), Decimal::ZERO);
    }
}
