//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every write takes the owning period's row lock first.

pub mod deduction;
pub mod error;
pub(crate) mod facts;
pub mod payroll;
pub mod period;

pub use deduction::DeductionRepository;
pub use error::RepositoryError;
pub use payroll::{BatchFailure, BatchOutcome, PayrollRepository};
pub use period::PeriodRepository;
