//! Per-record deductions and their rollup.

pub mod ledger;
pub mod types;

pub use ledger::{DeductionLedger, LedgerTotals};
pub use types::{DeductionBreakdown, DeductionInput, DeductionSource, DeductionType};
