//! Repository error type shared by every payroll repository.

use payday_core::{ErrorKind, PayrollError};
use payday_shared::AppError;
use sea_orm::{DbErr, SqlErr};

/// Errors returned by the payroll repositories.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Engine rule violation, missing entity, or lost race.
    #[error(transparent)]
    Payroll(#[from] PayrollError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(DbErr),
}

impl From<DbErr> for RepositoryError {
    fn from(err: DbErr) -> Self {
        // A second writer inserting the same (employee, period) record.
        if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            return Self::Payroll(PayrollError::ConcurrencyConflict(detail));
        }
        Self::Database(err)
    }
}

impl RepositoryError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Payroll(err) => err.kind(),
            Self::Database(_) => ErrorKind::Internal,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Payroll(err) => err.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns true if nothing was written and the caller may retry once.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Payroll(err) => err.is_retryable(),
            Self::Database(_) => false,
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Payroll(err) => err.into(),
            RepositoryError::Database(err) => Self::Database(err.to_string()),
        }
    }
}
