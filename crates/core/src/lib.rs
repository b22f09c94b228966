//! Core business logic for Payday.
//!
//! This crate contains pure payroll logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `period` - Payroll period state machine and guards
//! - `attendance` - Attendance day counts and hour totals
//! - `overtime` - Overtime eligibility and pricing
//! - `payroll` - Gross/net computation, deduction policies, payments
//! - `deduction` - Deduction categories and ledger rollups
//! - `totals` - Period-level totals

pub mod attendance;
pub mod deduction;
pub mod employee;
pub mod error;
pub mod overtime;
pub mod payroll;
pub mod period;
pub mod totals;

pub use error::{ErrorKind, PayrollError};
