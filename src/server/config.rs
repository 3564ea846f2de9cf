//! Environment based server configuration.

use std::{path::PathBuf, str::FromStr};

use rust_decimal::Decimal;

use crate::server::error::config::ConfigError;

/// Default address the HTTP server binds to.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
/// Default root directory for uploaded contract documents.
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
/// Default session inactivity timeout in minutes.
pub const DEFAULT_SESSION_TIMEOUT_MINUTES: i64 = 120;
/// Default share of contract revenue kept by the platform, in percent.
pub const DEFAULT_COMMISSION_PERCENT: i64 = 10;

/// Server configuration read from environment variables.
pub struct Config {
    /// Database connection URL
    pub database_url: String,
    /// Valkey/Redis URL backing the session store
    pub valkey_url: String,
    /// Address the HTTP listener binds to
    pub bind_address: String,
    /// Root directory for stored contract documents
    pub upload_dir: PathBuf,
    /// Minutes of inactivity before a session expires
    pub session_timeout_minutes: i64,
    /// Platform commission applied to revenue reports, in percent
    pub commission_percent: Decimal,
}

impl Config {
    /// Load the configuration from the process environment.
    ///
    /// Call `dotenvy::dotenv()` beforehand to pick up a `.env` file.
    ///
    /// # Returns
    /// - `Ok(Config)` - All required variables present and valid
    /// - `Err(ConfigError::MissingEnvVar)` - `DATABASE_URL` or `VALKEY_URL` is unset
    /// - `Err(ConfigError::InvalidEnvValue)` - An optional variable failed to parse or is out of range
    pub fn from_env() -> Result<Self, ConfigError> {
        let session_timeout_minutes = optional_var(
            "SESSION_TIMEOUT_MINUTES",
            DEFAULT_SESSION_TIMEOUT_MINUTES,
        )?;
        if session_timeout_minutes <= 0 {
            return Err(ConfigError::InvalidEnvValue {
                var: "SESSION_TIMEOUT_MINUTES".to_string(),
                reason: "must be a positive number of minutes".to_string(),
            });
        }

        let commission_percent = optional_var(
            "PLATFORM_COMMISSION_PERCENT",
            Decimal::from(DEFAULT_COMMISSION_PERCENT),
        )?;
        if commission_percent < Decimal::ZERO || commission_percent > Decimal::ONE_HUNDRED {
            return Err(ConfigError::InvalidEnvValue {
                var: "PLATFORM_COMMISSION_PERCENT".to_string(),
                reason: "must be between 0 and 100".to_string(),
            });
        }

        Ok(Self {
            database_url: required_var("DATABASE_URL")?,
            valkey_url: required_var("VALKEY_URL")?,
            bind_address: std::env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string()),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            session_timeout_minutes,
            commission_percent,
        })
    }
}

fn required_var(var: &str) -> Result<String, ConfigError> {
    std::env::var(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
}

fn optional_var<T>(var: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvValue {
                var: var.to_string(),
                reason: e.to_string(),
            }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_var_falls_back_to_default() {
        let value: i64 = optional_var("WASL_TEST_UNSET_VARIABLE", 42).unwrap();

        assert_eq!(value, 42);
    }

    #[test]
    fn required_var_reports_missing_name() {
        let result = required_var("WASL_TEST_UNSET_REQUIRED");

        assert!(matches!(
            result,
            Err(ConfigError::MissingEnvVar(var)) if var == "WASL_TEST_UNSET_REQUIRED"
        ));
    }
}
