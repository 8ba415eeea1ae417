// Test helper utilities shared across unit test modules
//
// IMPORTANT: These helpers are test-only and should NEVER be used in production code.

#![allow(dead_code)]

use crate::config::ErrorHandlingConfig;
use crate::error::FaultResult;
use crate::hooks::ProcessTerminator;
use crate::logging::LogSink;
use crate::manager::ErrorHandler;
use crate::reporting::{ErrorReporter, ErrorSummary};
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Mutex};

/// One call captured by [`RecordingSink`].
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: &'static str,
    pub label: String,
    pub payload: Value,
}

/// Log sink that remembers every call.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<LogRecord>>,
}

impl RecordingSink {
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn count(&self, level: &str) -> usize {
        self.records().iter().filter(|r| r.level == level).count()
    }

    pub fn total(&self) -> usize {
        self.records().len()
    }

    fn push(&self, level: &'static str, label: &str, payload: &Value) {
        self.records.lock().unwrap().push(LogRecord {
            level,
            label: label.to_string(),
            payload: payload.clone(),
        });
    }
}

impl LogSink for RecordingSink {
    fn debug(&self, label: &str, payload: &Value) {
        self.push("debug", label, payload);
    }

    fn info(&self, label: &str, payload: &Value) {
        self.push("info", label, payload);
    }

    fn warn(&self, label: &str, payload: &Value) {
        self.push("warn", label, payload);
    }

    fn error(&self, label: &str, payload: &Value) {
        self.push("error", label, payload);
    }
}

/// Terminator that records the exit status, then unwinds instead of exiting.
#[derive(Debug, Default)]
pub struct RecordingTerminator {
    codes: Mutex<Vec<i32>>,
}

impl RecordingTerminator {
    pub fn codes(&self) -> Vec<i32> {
        self.codes.lock().unwrap().clone()
    }
}

impl ProcessTerminator for RecordingTerminator {
    fn terminate(&self, code: i32) -> ! {
        self.codes.lock().unwrap().push(code);
        panic!("process terminated with status {code}");
    }
}

/// Reporter that remembers every summary it receives.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    summaries: Mutex<Vec<ErrorSummary>>,
}

impl RecordingReporter {
    pub fn summaries(&self) -> Vec<ErrorSummary> {
        self.summaries.lock().unwrap().clone()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, summary: &ErrorSummary) -> FaultResult<()> {
        self.summaries.lock().unwrap().push(summary.clone());
        Ok(())
    }
}

/// Reporter whose every call panics.
#[derive(Debug, Default)]
pub struct PanickingReporter;

impl ErrorReporter for PanickingReporter {
    fn report(&self, _summary: &ErrorSummary) -> FaultResult<()> {
        panic!("reporter exploded");
    }
}

/// Error whose `Display` impl panics.
#[derive(Debug)]
pub struct ExplodingDisplay;

impl fmt::Display for ExplodingDisplay {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        panic!("display exploded")
    }
}

impl std::error::Error for ExplodingDisplay {}

/// Error that prints fine but whose cause chain panics when walked.
#[derive(Debug)]
pub struct ExplodingSource;

impl fmt::Display for ExplodingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("session store unavailable")
    }
}

impl std::error::Error for ExplodingSource {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        panic!("source chain exploded")
    }
}

/// Handler wired to recording fakes.
pub struct TestHarness {
    pub handler: ErrorHandler,
    pub sink: Arc<RecordingSink>,
    pub reporter: Arc<RecordingReporter>,
    pub terminator: Arc<RecordingTerminator>,
}

pub fn create_test_harness(config: ErrorHandlingConfig) -> TestHarness {
    let sink = Arc::new(RecordingSink::default());
    let reporter = Arc::new(RecordingReporter::default());
    let terminator = Arc::new(RecordingTerminator::default());
    let handler = ErrorHandler::new(config)
        .with_log_sink(sink.clone())
        .with_reporter(reporter.clone())
        .with_terminator(terminator.clone());

    TestHarness {
        handler,
        sink,
        reporter,
        terminator,
    }
}
