//! Central error routing.
//!
//! Every failure in the process ends at one of the four [`ErrorManager`] entry
//! points. The manager classifies the failure, counts its signature, formats it,
//! logs it to the sink matching its level, and forwards MAJOR and CRITICAL errors
//! to the monitoring reporter. It never re-raises.
//!
//! # Routing
//!
//! | Level | Log sink | Reported |
//! |-------|----------|----------|
//! | `Critical` | error | yes |
//! | `Major` | error | yes |
//! | `Minor` | warn | no |
//! | `Informational` | info | no |
//! | `Debug` | none | no |

use crate::config::ErrorHandlingConfig;
use crate::core_types::{ErrorCategory, ErrorLevel, RaisedError};
use crate::formatter::{format_for_display, FormattedError};
use crate::guard;
use crate::hooks::{ProcessExit, ProcessTerminator};
use crate::logging::{log_debug, LogSink, TracingLogSink};
use crate::reporting::{ErrorReporter, ErrorSummary, NoopReporter};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Classification hints supplied by the caller of [`ErrorManager::handle_error`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorOptions {
    /// Defaults to [`ErrorLevel::Minor`].
    pub level: Option<ErrorLevel>,
    /// Defaults to the user error's own category, then [`ErrorCategory::Application`].
    pub category: Option<ErrorCategory>,
    /// Extra structured data attached to the log payload and the report.
    pub context: Option<Value>,
}

impl ErrorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: ErrorLevel) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_category(mut self, category: ErrorCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }
}

/// Where an unhandled failure surfaced, e.g. a supervised background task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectionOrigin {
    pub label: String,
    pub task_id: Option<String>,
}

impl RejectionOrigin {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            task_id: None,
        }
    }

    pub fn with_task_id(mut self, task_id: impl ToString) -> Self {
        self.task_id = Some(task_id.to_string());
        self
    }

    fn to_context(&self) -> Value {
        serde_json::json!({
            "origin": self.label,
            "task_id": self.task_id,
        })
    }
}

/// The complete failure-handling surface.
pub trait ErrorManager: Send + Sync {
    /// Log as CRITICAL and terminate the process. Never returns.
    fn handle_fatal_error(&self, error: &RaisedError) -> !;

    /// Log a failure nobody awaited as MAJOR. Does not terminate.
    fn handle_unhandled_rejection(&self, reason: &RaisedError, origin: &RejectionOrigin);

    /// Log an uncaught failure as CRITICAL. Termination is left to the hook policy.
    fn handle_uncaught_exception(&self, error: &RaisedError);

    /// General-purpose entry point.
    fn handle_error(&self, error: &RaisedError, options: ErrorOptions);
}

/// Stateful [`ErrorManager`] with injectable sinks.
///
/// ```rust
/// use fault_router::{ErrorHandler, ErrorHandlingConfig, ErrorManager, ErrorOptions, RaisedError};
///
/// let handler = ErrorHandler::new(ErrorHandlingConfig::default());
/// handler.handle_error(&RaisedError::from("disk full"), ErrorOptions::default());
/// assert_eq!(handler.occurrence_count("application:minor:disk full"), 1);
/// ```
pub struct ErrorHandler {
    config: ErrorHandlingConfig,
    sink: Arc<dyn LogSink>,
    reporter: Arc<dyn ErrorReporter>,
    terminator: Arc<dyn ProcessTerminator>,
    error_count: Mutex<HashMap<String, u64>>,
}

impl fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorHandler")
            .field("config", &self.config)
            .field("tracked_signatures", &self.lock_counts().len())
            .finish_non_exhaustive()
    }
}

impl ErrorHandler {
    /// Handler that logs through `tracing`, reports nowhere, and exits the process on fatal errors.
    pub fn new(config: ErrorHandlingConfig) -> Self {
        Self {
            config,
            sink: Arc::new(TracingLogSink),
            reporter: Arc::new(NoopReporter),
            terminator: Arc::new(ProcessExit),
            error_count: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_terminator(mut self, terminator: Arc<dyn ProcessTerminator>) -> Self {
        self.terminator = terminator;
        self
    }

    pub fn config(&self) -> &ErrorHandlingConfig {
        &self.config
    }

    /// Signature used to count repeats: `category:level:message`.
    pub fn occurrence_key(error: &RaisedError, level: ErrorLevel, category: ErrorCategory) -> String {
        format!("{}:{}:{}", category.as_str(), level.as_str(), error.message())
    }


    pub fn occurrence_count(&self, key: &str) -> u64 {
        self.lock_counts().get(key).copied().unwrap_or(0)
    }

    /// Snapshot of every tracked signature and its count.
    pub fn occurrences(&self) -> HashMap<String, u64> {
        self.lock_counts().clone()
    }

    /// The logging half of [`ErrorManager::handle_fatal_error`], without terminating.
    pub fn log_fatal_error(&self, error: &RaisedError) {
        let formatted = format_for_display(error);
        let payload = self.payload(
            &formatted,
            ErrorLevel::Critical,
            ErrorCategory::Application,
            None,
        );
        self.sink
            .error(&format!("FATAL ERROR: {}", formatted.message), &payload);
    }

    /// Terminate through the configured terminator using the fatal exit code.
    pub fn terminate(&self) -> ! {
        self.terminator.terminate(self.config.fatal_exit_code)
    }

    /// Route an uncaught failure with extra diagnostic context (e.g. a panic location).
    pub fn handle_uncaught_with_context(&self, error: &RaisedError, context: Option<Value>) {
        let formatted = format_for_display(error);
        let payload = self.payload(
            &formatted,
            ErrorLevel::Critical,
            ErrorCategory::Application,
            context.as_ref(),
        );
        self.sink
            .error(&format!("Uncaught exception: {}", formatted.message), &payload);
    }

    fn lock_counts(&self) -> std::sync::MutexGuard<'_, HashMap<String, u64>> {
        self.error_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn record_occurrence(&self, key: &str) -> u64 {
        let mut counts = self.lock_counts();
        let count = counts.entry(key.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    fn payload(
        &self,
        formatted: &FormattedError<'_>,
        level: ErrorLevel,
        category: ErrorCategory,
        context: Option<&Value>,
    ) -> Value {
        let mut payload = formatted.to_payload();
        if let Value::Object(map) = &mut payload {
            // A user error's own category stays visible beside the routed one.
            if let Some(own) = formatted.category {
                map.insert("error_category".into(), Value::String(own.as_str().to_string()));
            }
            map.insert("level".into(), Value::String(level.as_str().to_string()));
            map.insert(
                "category".into(),
                Value::String(category.as_str().to_string()),
            );
            if let Some(context) = context {
                map.insert("context".into(), context.clone());
            }
        }
        payload
    }

    fn report_error(
        &self,
        formatted: &FormattedError<'_>,
        level: ErrorLevel,
        category: ErrorCategory,
        occurrences: u64,
        context: Option<Value>,
    ) {
        if !self.config.reporting_enabled {
            return;
        }

        let summary = ErrorSummary::new(formatted.message.clone(), level, category)
            .with_occurrences(occurrences)
            .with_context(context);

        match guard::contain(|| self.reporter.report(&summary)) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                log_debug!(report_id = %summary.id, error = %e, "Error report dropped");
            }
            Err(_) => {
                log_debug!(report_id = %summary.id, "Error reporter panicked, report dropped");
            }
        }
    }
}

impl ErrorManager for ErrorHandler {
    fn handle_fatal_error(&self, error: &RaisedError) -> ! {
        self.log_fatal_error(error);
        self.terminate()
    }

    fn handle_unhandled_rejection(&self, reason: &RaisedError, origin: &RejectionOrigin) {
        let formatted = format_for_display(reason);
        let payload = self.payload(
            &formatted,
            ErrorLevel::Major,
            ErrorCategory::Application,
            Some(&origin.to_context()),
        );
        self.sink
            .error(&format!("Unhandled rejection: {}", formatted.message), &payload);
    }

    fn handle_uncaught_exception(&self, error: &RaisedError) {
        self.handle_uncaught_with_context(error, None);
    }

    fn handle_error(&self, error: &RaisedError, options: ErrorOptions) {
        let level = options.level.unwrap_or_default();
        let category = options.category.unwrap_or_default();

        let key = Self::occurrence_key(error, level, category);
        let count = self.record_occurrence(&key);

        if self.config.enforce_error_cap && count > self.config.max_tracked_errors {
            log_debug!(
                key = %key,
                count = count,
                cap = self.config.max_tracked_errors,
                "Error signature over cap, suppressing"
            );
            return;
        }

        let formatted = format_for_display(error);
        let label = format!("[{}] {}", category.label(), formatted.message);
        let payload = self.payload(&formatted, level, category, options.context.as_ref());

        match level {
            ErrorLevel::Critical | ErrorLevel::Major => self.sink.error(&label, &payload),
            ErrorLevel::Minor => self.sink.warn(&label, &payload),
            ErrorLevel::Informational => self.sink.info(&label, &payload),
            ErrorLevel::Debug => {}
        }

        if level.is_reportable() {
            self.report_error(&formatted, level, category, count, options.context);
        }
    }
}
