//! Employee directory view consumed by the engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Employment status. Only active employees are picked up by batch compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    /// Currently employed.
    Active,
    /// Temporarily not working (leave of absence, suspension).
    Inactive,
    /// No longer employed.
    Terminated,
}

impl EmployeeStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Terminated => "terminated",
        }
    }
}

/// Rates copied onto a payroll record at compute time.
///
/// Later changes to the employee do not touch records already computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRates {
    /// Pay for one full day present.
    pub daily_rate: Decimal,
    /// Base hourly rate used for overtime without a precomputed amount.
    pub hourly_rate: Decimal,
    /// Default overtime multiplier (e.g. `1.25`).
    pub overtime_multiplier: Decimal,
}

/// Employee as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeSnapshot {
    /// Employee ID.
    pub id: Uuid,
    /// Employment status.
    pub status: EmployeeStatus,
    /// Current rates.
    pub rates: EmployeeRates,
}
