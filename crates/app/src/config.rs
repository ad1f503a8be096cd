//! Configuration
//!
//! Settings are read from CLI flags, falling back to environment variables and a
//! `.env` file.

use clap::{Args, ValueEnum};
use rusty_money::iso::{self, Currency};
use thiserror::Error;

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Where vendor data lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// `PostgreSQL`, via `DATABASE_URL`.
    Postgres,

    /// In-process; data is lost on exit, so only `vendor apply` and `price` are
    /// useful with it.
    Memory,
}

/// Store settings.
#[derive(Debug, Clone, Args)]
pub struct StoreConfig {
    /// Storage backend (postgres, memory); memory keeps nothing between commands
    #[arg(long, env = "VENDORA_STORE", value_enum, default_value_t = StoreKind::Postgres)]
    pub store: StoreKind,

    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Apply pending migrations on startup
    #[arg(long, env = "VENDORA_MIGRATE", default_value_t = false)]
    pub migrate: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown currency code `{0}`")]
pub struct UnknownCurrency(String);

/// Pricing settings.
#[derive(Debug, Clone, Args)]
pub struct PricingConfig {
    /// ISO 4217 code of the catalog currency
    #[arg(long, env = "VENDORA_CURRENCY", default_value = "INR")]
    pub currency: String,
}

impl PricingConfig {
    /// The configured currency.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownCurrency`] when the code is not an ISO 4217 currency.
    pub fn currency(&self) -> Result<&'static Currency, UnknownCurrency> {
        let code = self.currency.trim().to_ascii_uppercase();

        iso::find(&code).ok_or(UnknownCurrency(code))
    }
}

/// Load `.env` if present. Missing files are not an error.
pub fn load_dotenv() {
    _ = dotenvy::dotenv();
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        logging: LoggingConfig,

        #[command(flatten)]
        store: StoreConfig,

        #[command(flatten)]
        pricing: PricingConfig,
    }

    #[test]
    fn flags_parse_into_config() -> TestResult {
        let parsed = Harness::try_parse_from([
            "vendora",
            "--log-format",
            "json",
            "--store",
            "memory",
            "--currency",
            "usd",
        ])?;

        assert_eq!(parsed.logging.log_format, LogFormat::Json);
        assert_eq!(parsed.store.store, StoreKind::Memory);
        assert_eq!(parsed.pricing.currency()?.iso_alpha_code, "USD");

        Ok(())
    }

    #[test]
    fn unknown_currency_is_rejected() {
        let pricing = PricingConfig {
            currency: "XYZ1".to_string(),
        };

        assert_eq!(
            pricing.currency().err(),
            Some(UnknownCurrency("XYZ1".to_string()))
        );
    }
}
