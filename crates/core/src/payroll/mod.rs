//! Payroll record computation.
//!
//! # Modules
//!
//! - `types` - Payment status, earnings, computation output
//! - `policy` - Pluggable deduction policies
//! - `computer` - Gross/deduction/net computation
//! - `payment` - Cumulative payment rules

pub mod computer;
pub mod payment;
pub mod policy;
pub mod types;

#[cfg(test)]
mod computer_props;

pub use computer::{ComputeInput, PayrollComputer};
pub use payment::PaymentCalculator;
pub use policy::{ContributionRule, DeductionPolicy, FlatRatePolicy, NoDeductions, StatutoryPolicy};
pub use types::{
    ComputedPayroll, Earnings, PaymentInfo, PaymentOutcome, PaymentStatus, SupplementaryEarnings,
};
