//! Payday payroll runner.
//!
//! Runs one engine operation against the configured database and prints the
//! resulting record or period as JSON on stdout. Failures print the error
//! code and message as JSON on stderr and exit non-zero.

use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use payday_core::payroll::PaymentInfo;
use payday_db::{PayrollEngine, RepositoryError, connect};
use payday_shared::AppConfig;
use payday_shared::config::LoggingConfig;
use payday_shared::types::{EmployeeId, PayrollPeriodId, PayrollRecordId};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Payday - payroll computation and period lifecycle
#[derive(Parser, Debug)]
#[command(name = "payday")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Override the database URL from configuration
    #[arg(long)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute (or recompute) one employee's record for a period
    Compute {
        /// Employee ID
        #[arg(long)]
        employee: EmployeeId,
        /// Payroll period ID
        #[arg(long)]
        period: PayrollPeriodId,
    },

    /// Compute every active employee of a period
    ComputeBatch {
        /// Payroll period ID
        #[arg(long)]
        period: PayrollPeriodId,
    },

    /// Lock a period once every record is computed
    Lock {
        /// Payroll period ID
        #[arg(long)]
        period: PayrollPeriodId,
    },

    /// Close a locked period once every record is paid
    Close {
        /// Payroll period ID
        #[arg(long)]
        period: PayrollPeriodId,
    },

    /// Return a processing or locked period to open
    Reopen {
        /// Payroll period ID
        #[arg(long)]
        period: PayrollPeriodId,
    },

    /// Recompute stored period totals
    RefreshTotals {
        /// Payroll period ID
        #[arg(long)]
        period: PayrollPeriodId,
    },

    /// Record a payment against a payroll record
    MarkPaid {
        /// Payroll record ID
        #[arg(long)]
        record: PayrollRecordId,
        /// Amount paid; defaults to the outstanding balance
        #[arg(long)]
        amount: Option<Decimal>,
        /// Payment time (RFC 3339); defaults to now
        #[arg(long)]
        paid_at: Option<DateTime<Utc>>,
        /// Bank or payout reference
        #[arg(long)]
        reference: Option<String>,
    },
}

#[derive(Serialize)]
struct Failure<'a> {
    error_code: &'a str,
    message: String,
    retryable: bool,
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(engine: &PayrollEngine, command: Commands) -> Result<(), RepositoryError> {
    match command {
        Commands::Compute { employee, period } => {
            let record = engine.compute_payroll(employee, period).await?;
            emit(&record);
        }
        Commands::ComputeBatch { period } => {
            let outcome = engine.compute_payroll_batch(period).await?;
            emit(&outcome);
        }
        Commands::Lock { period } => emit(&engine.lock_period(period).await?),
        Commands::Close { period } => emit(&engine.close_period(period).await?),
        Commands::Reopen { period } => emit(&engine.reopen_period(period).await?),
        Commands::RefreshTotals { period } => emit(&engine.refresh_period_totals(period).await?),
        Commands::MarkPaid {
            record,
            amount,
            paid_at,
            reference,
        } => {
            let info = PaymentInfo {
                amount,
                paid_at,
                reference,
            };
            emit(&engine.mark_as_paid(record, info).await?);
        }
    }
    Ok(())
}

fn emit<T: Serialize>(value: &T) {
    if let Err(err) = print_json(value) {
        eprintln!("failed to write output: {err:#}");
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = AppConfig::load().context("failed to load configuration")?;
    if let Some(url) = cli.database_url {
        config.database.url = url;
    }

    init_tracing(&config.logging);

    let db = connect(&config.database)
        .await
        .context("failed to connect to database")?;
    let engine = PayrollEngine::from_config(db, &config.payroll)
        .context("invalid payroll contribution configuration")?;
    info!(currency = %config.payroll.currency, "payroll engine ready");

    match run(&engine, cli.command).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            let failure = Failure {
                error_code: err.error_code(),
                message: err.to_string(),
                retryable: err.is_retryable(),
            };
            eprintln!("{}", serde_json::to_string(&failure)?);
            Ok(ExitCode::FAILURE)
        }
    }
}
