//! # fault-router
//!
//! Error classification, routing, and display for AI-assisted command line tools.
//!
//! ## Key Features
//!
//! - **Taxonomy**: Ordered severity levels, subsystem categories, and `UserError`s with resolution guidance
//! - **Dual-mode formatting**: Friendly output for end users, technical output for developers
//! - **Routing**: Level-based dispatch to log sinks with per-signature occurrence counting
//! - **Reporting**: Pluggable monitoring integration for MAJOR and CRITICAL errors
//! - **Process hooks**: Panics and failed background tasks funnel into the same pipeline
//!
//! ## Example
//!
//! ```rust,no_run
//! use fault_router::{
//!     init_error_handling, init_logging, ErrorCategory, ErrorHandlingConfig, ErrorLevel,
//!     ErrorManager, ErrorOptions, RaisedError, UserError,
//! };
//!
//! # fn example() -> fault_router::FaultResult<()> {
//! let config = ErrorHandlingConfig::from_env()?;
//! init_logging(&config);
//! let errors = init_error_handling(config);
//!
//! let err = UserError::new("Failed to connect to Claude AI service")
//!     .with_category(ErrorCategory::Connection)
//!     .with_resolution("Check your internet connection and API key, then try again.");
//! errors.handle_error(
//!     &RaisedError::from(err),
//!     ErrorOptions::new()
//!         .with_level(ErrorLevel::Major)
//!         .with_category(ErrorCategory::Connection),
//! );
//! # Ok(())
//! # }
//! ```

// Allow missing errors documentation - errors are self-documenting via type signatures
#![allow(clippy::missing_errors_doc)]

// Core value types for the error pipeline
pub mod core_types;

// Logging utilities (re-exports tracing with log_* naming) plus the sink seam
pub mod logging;

pub mod ai;
pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod formatter;
mod guard;
pub mod hooks;
pub mod manager;
pub mod reporting;

#[cfg(test)]
pub mod tests;

// Re-export main types
pub use config::ErrorHandlingConfig;
pub use context::{AppContext, LifecycleState};
pub use error::{FaultError, FaultResult};
pub use manager::{ErrorHandler, ErrorManager, ErrorOptions, RejectionOrigin};

pub use core_types::{ErrorCategory, ErrorKind, ErrorLevel, LegacyLevel, RaisedError, Resolution, UserError};
pub use formatter::{
    format_display_for_user, format_for_display, format_user_facing, format_with_severity,
    FormattedError,
};
pub use hooks::{
    init_error_handling, install_error_handler, install_panic_hook, remove_panic_hook,
    spawn_supervised, ProcessExit, ProcessTerminator,
};
pub use logging::{init_logging, LogSink, TracingLogSink};
pub use reporting::{ChannelReporter, ErrorReporter, ErrorSummary, MonitoringSink, NoopReporter};

pub use ai::{AiConnection, AiModule};
pub use auth::{AuthManager, AuthMethod, AuthState};
