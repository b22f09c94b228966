//! Period-level totals.

pub mod aggregator;

pub use aggregator::{PeriodTotals, PeriodTotalsAggregator, RecordTotalsInput};
