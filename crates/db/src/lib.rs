//! Database layer with `SeaORM` entities, repositories, and the payroll engine.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//! - [`PayrollEngine`], the operation surface over the repositories

pub mod engine;
pub mod entities;
pub mod migration;
pub mod repositories;

pub use engine::PayrollEngine;
pub use repositories::{
    BatchFailure, BatchOutcome, DeductionRepository, PayrollRepository, PeriodRepository,
    RepositoryError,
};

use std::time::Duration;

use payday_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    Database::connect(options).await
}
