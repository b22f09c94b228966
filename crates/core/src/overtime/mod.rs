//! Overtime selection and pricing.

pub mod claimer;

pub use claimer::{OvertimeApproval, OvertimeClaim, OvertimeClaimer, OvertimeFact};
