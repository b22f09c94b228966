//! Payroll period lifecycle.
//!
//! A period moves `open → processing → locked → closed`, with `reopen`
//! returning a processing or locked period to `open`. The guards here decide
//! which transitions and record mutations are legal; persistence lives in
//! `payday-db`.
//!
//! # Modules
//!
//! - `types` - Period status, date ranges, transition outcomes
//! - `lifecycle` - Transition and mutation guards

pub mod lifecycle;
pub mod types;

#[cfg(test)]
mod lifecycle_props;

pub use lifecycle::PeriodLifecycle;
pub use types::{DateRange, NewPeriod, PayrollPeriodStatus, PeriodTransition, RecordOperation};
