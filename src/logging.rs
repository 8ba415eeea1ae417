//! Logging utilities for fault-router
//!
//! Re-exports tracing macros with log_* naming convention for consistency, and
//! provides the [`LogSink`] seam the error manager writes through.

use crate::config::ErrorHandlingConfig;
use tracing_subscriber::EnvFilter;

// Re-export tracing macros with log_* naming
pub use tracing::{
    debug as log_debug,
    error as log_error,
    info as log_info,
    trace as log_trace,
    warn as log_warn,
};

/// Severity-tagged log destination used by the error manager.
///
/// Each method receives a free-text label and a structured payload. Implementations
/// must not panic; the manager assumes logging always succeeds.
pub trait LogSink: Send + Sync {
    fn debug(&self, label: &str, payload: &serde_json::Value);
    fn info(&self, label: &str, payload: &serde_json::Value);
    fn warn(&self, label: &str, payload: &serde_json::Value);
    fn error(&self, label: &str, payload: &serde_json::Value);
}

/// Default sink that emits `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn debug(&self, label: &str, payload: &serde_json::Value) {
        log_debug!(payload = %payload, "{}", label);
    }

    fn info(&self, label: &str, payload: &serde_json::Value) {
        log_info!(payload = %payload, "{}", label);
    }

    fn warn(&self, label: &str, payload: &serde_json::Value) {
        log_warn!(payload = %payload, "{}", label);
    }

    fn error(&self, label: &str, payload: &serde_json::Value) {
        log_error!(payload = %payload, "{}", label);
    }
}

/// Install a stderr `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `config.log_filter`. Calling this more than once
/// is harmless: later calls leave the first subscriber in place and return `false`.
pub fn init_logging(config: &ErrorHandlingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}
