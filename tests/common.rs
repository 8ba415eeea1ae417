//! Test helper utilities for fault-router integration tests
//!
//! Recording fakes for the log sink and monitoring seams, built only on the
//! public API so they exercise the same extension points applications use.
//!
//! IMPORTANT: These helpers are test-only and should NEVER be used in production code.

// Allow dead code in test utilities - functions are used across different test files
#![allow(dead_code)]

use async_trait::async_trait;
use fault_router::{
    ErrorHandler, ErrorHandlingConfig, ErrorSummary, LogSink, MonitoringSink, ProcessTerminator,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// One captured sink call.
#[derive(Debug, Clone)]
pub struct CapturedLog {
    pub level: &'static str,
    pub label: String,
    pub payload: Value,
}

/// Log sink that keeps every record in memory.
#[derive(Debug, Default)]
pub struct CapturingSink {
    records: Mutex<Vec<CapturedLog>>,
}

impl CapturingSink {
    pub fn records(&self) -> Vec<CapturedLog> {
        self.records.lock().unwrap().clone()
    }

    pub fn labels(&self) -> Vec<String> {
        self.records().into_iter().map(|r| r.label).collect()
    }

    fn push(&self, level: &'static str, label: &str, payload: &Value) {
        self.records.lock().unwrap().push(CapturedLog {
            level,
            label: label.to_string(),
            payload: payload.clone(),
        });
    }
}

impl LogSink for CapturingSink {
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

/// Monitoring backend that stores submitted summaries.
#[derive(Debug, Default)]
pub struct CollectingMonitor {
    received: Mutex<Vec<ErrorSummary>>,
}

impl CollectingMonitor {
    pub fn received(&self) -> Vec<ErrorSummary> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl MonitoringSink for CollectingMonitor {
    async fn submit(&self, summary: ErrorSummary) -> anyhow::Result<()> {
        self.received.lock().unwrap().push(summary);
        Ok(())
    }
}

/// Monitoring backend that is always down.
#[derive(Debug, Default)]
pub struct UnavailableMonitor;

#[async_trait]
impl MonitoringSink for UnavailableMonitor {
    async fn submit(&self, _summary: ErrorSummary) -> anyhow::Result<()> {
        anyhow::bail!("monitoring backend unavailable")
    }
}

/// Terminator that unwinds instead of exiting, so fatal paths can be observed.
#[derive(Debug, Default)]
pub struct UnwindingTerminator {
    codes: Mutex<Vec<i32>>,
}

impl UnwindingTerminator {
    pub fn codes(&self) -> Vec<i32> {
        self.codes.lock().unwrap().clone()
    }
}

impl ProcessTerminator for UnwindingTerminator {
    fn terminate(&self, code: i32) -> ! {
        self.codes.lock().unwrap().push(code);
        panic!("terminated with exit code {code}")
    }
}

/// Create a handler whose log output is captured.
pub fn create_capturing_handler(config: ErrorHandlingConfig) -> (ErrorHandler, Arc<CapturingSink>) {
    let sink = Arc::new(CapturingSink::default());
    let handler = ErrorHandler::new(config).with_log_sink(sink.clone());
    (handler, sink)
}
