//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Payroll policy configuration.
    #[serde(default)]
    pub payroll: PayrollConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Payroll policy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollConfig {
    /// Currency label printed next to amounts.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Statutory contribution rules applied to gross pay on every compute.
    #[serde(default = "default_contributions")]
    pub contributions: Vec<ContributionConfig>,
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            contributions: default_contributions(),
        }
    }
}

/// One percentage-of-gross contribution rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContributionConfig {
    /// Deduction category (`sss`, `philhealth`, `pag-ibig`, `tax`, ...).
    pub category: String,
    /// Fraction of gross pay, e.g. `0.045` for 4.5%.
    pub rate: Decimal,
    /// Upper bound on the contribution for one record.
    #[serde(default)]
    pub cap: Option<Decimal>,
}

fn default_currency() -> String {
    "PHP".to_string()
}

fn default_contributions() -> Vec<ContributionConfig> {
    vec![
        ContributionConfig {
            category: "sss".to_string(),
            rate: Decimal::new(45, 3),
            cap: Some(Decimal::new(1350, 0)),
        },
        ContributionConfig {
            category: "philhealth".to_string(),
            rate: Decimal::new(25, 3),
            cap: Some(Decimal::new(2500, 0)),
        },
        ContributionConfig {
            category: "pag-ibig".to_string(),
            rate: Decimal::new(2, 2),
            cap: Some(Decimal::new(100, 0)),
        },
    ]
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_log_filter() -> String {
    "payday=info,sea_orm=warn".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("PAYDAY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("PAYDAY__DATABASE__URL", Some("postgres://localhost/payday_test")),
                ("PAYDAY__DATABASE__MAX_CONNECTIONS", Some("4")),
                ("PAYDAY__LOGGING__JSON", Some("true")),
                ("RUN_MODE", Some("config-test")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/payday_test");
                assert_eq!(config.database.max_connections, 4);
                assert_eq!(config.database.min_connections, 1);
                assert!(config.logging.json);
                assert_eq!(config.logging.filter, "payday=info,sea_orm=warn");
            },
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        temp_env::with_vars(
            [
                ("PAYDAY__DATABASE__URL", None::<&str>),
                ("RUN_MODE", Some("config-test")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }

    #[test]
    fn test_default_payroll_contributions() {
        let payroll = PayrollConfig::default();
        assert_eq!(payroll.currency, "PHP");
        assert_eq!(payroll.contributions.len(), 3);

        let sss = &payroll.contributions[0];
        assert_eq!(sss.category, "sss");
        assert_eq!(sss.rate, dec!(0.045));
        assert_eq!(sss.cap, Some(dec!(1350)));

        let pagibig = &payroll.contributions[2];
        assert_eq!(pagibig.category, "pag-ibig");
        assert_eq!(pagibig.rate, dec!(0.02));
    }
}
