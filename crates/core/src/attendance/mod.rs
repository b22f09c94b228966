//! Attendance aggregation.

pub mod aggregator;

pub use aggregator::{AttendanceAggregator, AttendanceFact, AttendanceStatus, AttendanceSummary};
