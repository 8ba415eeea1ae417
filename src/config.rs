use crate::error::{FaultError, FaultResult};
use crate::logging::log_debug;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Settings for the error manager and its process hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorHandlingConfig {
    /// Occurrences of one error signature before the cap applies
    pub max_tracked_errors: u64,
    /// Suppress logging and reporting for a signature once it passes the cap.
    /// Counting continues either way.
    pub enforce_error_cap: bool,
    /// Status passed to the terminator by fatal handling
    pub fatal_exit_code: i32,
    /// Terminate after routing a panic through the uncaught-exception path
    pub exit_on_uncaught_panic: bool,
    /// Forward MAJOR and CRITICAL errors to the monitoring reporter
    pub reporting_enabled: bool,
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for ErrorHandlingConfig {
    fn default() -> Self {
        Self {
            max_tracked_errors: 100,
            enforce_error_cap: false,
            fatal_exit_code: 1,
            exit_on_uncaught_panic: false,
            reporting_enabled: true,
            log_filter: "info".to_string(),
        }
    }
}

impl ErrorHandlingConfig {
    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns [`FaultError::ConfigurationError`] if:
    /// - `fatal_exit_code` is zero (a fatal exit must signal failure)
    /// - `max_tracked_errors` is zero
    /// - `log_filter` is empty
    pub fn validate(&self) -> FaultResult<()> {
        if self.fatal_exit_code == 0 {
            return Err(FaultError::configuration_error(
                "fatal_exit_code must be non-zero",
            ));
        }
        if self.max_tracked_errors == 0 {
            return Err(FaultError::configuration_error(
                "max_tracked_errors must be greater than zero",
            ));
        }
        if self.log_filter.trim().is_empty() {
            return Err(FaultError::configuration_error(
                "log_filter must not be empty",
            ));
        }
        Ok(())
    }

    /// Load configuration from environment variables, falling back to defaults
    ///
    /// Recognised variables: `FAULT_MAX_TRACKED_ERRORS`, `FAULT_ENFORCE_ERROR_CAP`,
    /// `FAULT_FATAL_EXIT_CODE`, `FAULT_EXIT_ON_PANIC`, `FAULT_REPORTING_ENABLED`,
    /// `FAULT_LOG_FILTER`.
    ///
    /// # Errors
    ///
    /// Returns [`FaultError::ConfigurationError`] if a variable is set but cannot be
    /// parsed, or if the resulting configuration fails [`validate`](Self::validate).
    pub fn from_env() -> FaultResult<Self> {
        log_debug!("Loading error handling configuration from environment");

        let mut config = Self::default();
        if let Some(value) = env_parse::<u64>("FAULT_MAX_TRACKED_ERRORS")? {
            config.max_tracked_errors = value;
        }
        if let Some(value) = env_flag("FAULT_ENFORCE_ERROR_CAP")? {
            config.enforce_error_cap = value;
        }
        if let Some(value) = env_parse::<i32>("FAULT_FATAL_EXIT_CODE")? {
            config.fatal_exit_code = value;
        }
        if let Some(value) = env_flag("FAULT_EXIT_ON_PANIC")? {
            config.exit_on_uncaught_panic = value;
        }
        if let Some(value) = env_flag("FAULT_REPORTING_ENABLED")? {
            config.reporting_enabled = value;
        }
        if let Ok(filter) = std::env::var("FAULT_LOG_FILTER") {
            config.log_filter = filter;
        }

        config.validate()?;

        log_debug!(
            max_tracked_errors = config.max_tracked_errors,
            enforce_error_cap = config.enforce_error_cap,
            fatal_exit_code = config.fatal_exit_code,
            reporting_enabled = config.reporting_enabled,
            "Error handling configuration loaded and validated"
        );

        Ok(config)
    }
}

fn env_parse<T: FromStr>(name: &str) -> FaultResult<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            FaultError::configuration_error(format!("{name} has an invalid value: {raw}"))
        }),
        Err(_) => Ok(None),
    }
}

fn env_flag(name: &str) -> FaultResult<Option<bool>> {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(FaultError::configuration_error(format!(
                "{name} must be a boolean, got: {raw}"
            ))),
        },
        Err(_) => Ok(None),
    }
}
