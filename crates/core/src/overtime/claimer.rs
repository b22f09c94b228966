//! Selects claimable overtime facts and prices them.
//!
//! Only approved facts inside the range that nobody else has claimed are
//! eligible. A fact already linked to a different record stays invisible,
//! which is what keeps overtime from being paid twice.

use chrono::NaiveDate;
use payday_shared::round_money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::employee::EmployeeRates;
use crate::period::DateRange;

/// Approval state of an overtime request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OvertimeApproval {
    /// Awaiting a decision.
    Pending,
    /// Approved and payable.
    Approved,
    /// Rejected. Never paid.
    Rejected,
}

impl OvertimeApproval {
    /// Returns the string representation of the approval state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// One overtime log row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OvertimeFact {
    /// Fact ID.
    pub id: Uuid,
    /// Employee the overtime belongs to.
    pub employee_id: Uuid,
    /// Day the overtime was worked.
    pub work_date: NaiveDate,
    /// Overtime hours.
    pub hours: Decimal,
    /// Multiplier override for this fact (e.g. rest-day rate).
    pub rate_multiplier: Option<Decimal>,
    /// Precomputed pay. Takes precedence over the rate calculation.
    pub amount: Option<Decimal>,
    /// Approval state.
    pub approval: OvertimeApproval,
    /// Record that claimed this fact, if any.
    pub payroll_record_id: Option<Uuid>,
}

/// Overtime selected for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OvertimeClaim {
    /// Facts to link to the record.
    pub fact_ids: Vec<Uuid>,
    /// Sum of hours.
    pub total_hours: Decimal,
    /// Sum of per-fact pay.
    pub total_pay: Decimal,
}

/// Stateless overtime selection service.
pub struct OvertimeClaimer;

impl OvertimeClaimer {
    /// Returns true if `claimant` may claim the fact.
    #[must_use]
    pub fn is_claimable(
        fact: &OvertimeFact,
        employee_id: Uuid,
        range: DateRange,
        claimant: Uuid,
    ) -> bool {
        fact.employee_id == employee_id
            && fact.approval == OvertimeApproval::Approved
            && range.contains(fact.work_date)
            && fact.payroll_record_id.is_none_or(|owner| owner == claimant)
    }

    /// Pay for one fact: its `amount`, or `hours × hourly_rate × multiplier`.
    ///
    /// The fact's own multiplier wins over the employee default.
    #[must_use]
    pub fn fact_pay(fact: &OvertimeFact, rates: &EmployeeRates) -> Decimal {
        match fact.amount {
            Some(amount) => round_money(amount),
            None => {
                let multiplier = fact.rate_multiplier.unwrap_or(rates.overtime_multiplier);
                round_money(fact.hours * rates.hourly_rate * multiplier)
            }
        }
    }

    /// Selects and prices the claimable facts among `facts`.
    pub fn select<'a, I>(
        employee_id: Uuid,
        range: DateRange,
        rates: &EmployeeRates,
        facts: I,
        claimant: Uuid,
    ) -> OvertimeClaim
    where
        I: IntoIterator<Item = &'a OvertimeFact>,
    {
        facts
            .into_iter()
            .filter(|fact| Self::is_claimable(fact, employee_id, range, claimant))
            .fold(OvertimeClaim::default(), |mut claim, fact| {
                claim.total_hours += fact.hours;
                claim.total_pay += Self::fact_pay(fact, rates);
                claim.fact_ids.push(fact.id);
                claim
            })
    }
}
