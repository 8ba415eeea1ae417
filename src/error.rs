//! Error types for fault-router's own operations.
//!
//! The error manager never fails outward, but a few surrounding operations can:
//! loading configuration, forwarding a summary to a monitoring sink, and moving a
//! lifecycle holder between states. Those return [`FaultError`].
//!
//! Failures raised by the *application* are modelled separately as
//! [`UserError`](crate::UserError) and [`RaisedError`](crate::RaisedError).
//!
//! # Result Type
//!
//! ```rust
//! use fault_router::FaultResult;
//!
//! fn my_function() -> FaultResult<String> {
//!     Ok("Success".to_string())
//! }
//! ```

use crate::logging::{log_debug, log_error, log_warn};
use thiserror::Error;

/// Convenient result type for fault-router operations.
pub type FaultResult<T> = std::result::Result<T, FaultError>;

/// Errors produced by fault-router itself.
///
/// # Creating Errors
///
/// Use the constructor methods which automatically log the error:
///
/// ```rust
/// use fault_router::FaultError;
///
/// let err = FaultError::configuration_error("FAULT_FATAL_EXIT_CODE must be an integer");
/// let err = FaultError::report_failed("monitoring channel closed");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FaultError {
    /// Configuration is malformed or out of range.
    #[error("Error handling configuration error: {message}")]
    ConfigurationError {
        /// Description of the configuration problem.
        message: String,
    },

    /// A summary could not be handed to the monitoring sink.
    ///
    /// The manager swallows this; it surfaces only to direct callers of a reporter.
    #[error("Error report could not be delivered: {message}")]
    ReportFailed {
        /// Why delivery failed.
        message: String,
    },

    /// A lifecycle holder was asked to move between incompatible states.
    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition {
        /// State the holder was in.
        from: String,
        /// State that was requested.
        to: String,
    },
}

impl FaultError {
    // =========================================================================
    // Constructor methods with automatic logging
    // =========================================================================

    /// Create a configuration error (logs at ERROR level).
    pub fn configuration_error(message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(
            error_type = "configuration_error",
            message = %message,
            "Error handling configuration validation failed"
        );
        Self::ConfigurationError { message }
    }

    /// Create a report delivery error (logs at DEBUG level, since it is always swallowed).
    pub fn report_failed(message: impl Into<String>) -> Self {
        let message = message.into();
        log_debug!(
            error_type = "report_failed",
            message = %message,
            "Error report delivery failed"
        );
        Self::ReportFailed { message }
    }

    pub fn invalid_transition(from: impl ToString, to: impl ToString) -> Self {
        let from = from.to_string();
        let to = to.to_string();
        log_warn!(
            error_type = "invalid_transition",
            from = %from,
            to = %to,
            "Rejected lifecycle state transition"
        );
        Self::InvalidTransition { from, to }
    }
}
