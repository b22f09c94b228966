//! Rolls every record of a period into period totals.
//!
//! Totals are always recomputed from the current records, never adjusted by
//! deltas, so a refresh running next to an in-flight compute only ever sees
//! committed state.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::payroll::PaymentStatus;

/// The parts of a payroll record that feed period totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordTotalsInput {
    /// Record gross pay.
    pub gross_pay: Decimal,
    /// Record deductions total.
    pub deductions_total: Decimal,
    /// Record net pay.
    pub net_pay: Decimal,
    /// Whether `computed_at` is set.
    pub computed: bool,
    /// Payment status.
    pub payment_status: PaymentStatus,
}

/// Aggregate totals of one period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeriodTotals {
    /// Number of records.
    pub record_count: i32,
    /// Records with `payment_status = paid`.
    pub paid_count: i32,
    /// Records with no `computed_at`.
    pub uncomputed_count: i32,
    /// Sum of gross pay.
    pub total_gross_pay: Decimal,
    /// Sum of deductions.
    pub total_deductions: Decimal,
    /// Sum of net pay.
    pub total_net_pay: Decimal,
}

impl PeriodTotals {
    /// Records not yet fully paid.
    #[must_use]
    pub const fn unpaid_count(&self) -> i32 {
        self.record_count - self.paid_count
    }
}

/// Stateless totals aggregation service.
pub struct PeriodTotalsAggregator;

impl PeriodTotalsAggregator {
    /// Aggregates records into period totals.
    pub fn aggregate<I>(records: I) -> PeriodTotals
    where
        I: IntoIterator<Item = RecordTotalsInput>,
    {
        records
            .into_iter()
            .fold(PeriodTotals::default(), |mut totals, record| {
                totals.record_count += 1;
                if record.payment_status == PaymentStatus::Paid {
                    totals.paid_count += 1;
                }
                if !record.computed {
                    totals.uncomputed_count += 1;
                }
                totals.total_gross_pay += record.gross_pay;
                totals.total_deductions += record.deductions_total;
                totals.total_net_pay += record.net_pay;
                totals
            })
    }
}
