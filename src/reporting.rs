//! Forwarding severe errors to an external monitoring service.
//!
//! The manager hands an [`ErrorSummary`] to an [`ErrorReporter`] for every MAJOR or
//! CRITICAL error. Reporting is fire-and-forget: a reporter must return quickly, and
//! whatever it returns (or panics with) is swallowed by the manager.
//!
//! Two reporters ship with the crate:
//! - [`NoopReporter`] logs at debug level that it *would* report. It is the default.
//! - [`ChannelReporter`] queues summaries on an unbounded channel drained by a
//!   background task into an async [`MonitoringSink`].

use crate::core_types::{ErrorCategory, ErrorLevel};
use crate::error::{FaultError, FaultResult};
use crate::logging::{log_debug, log_warn};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Minimal description of an error sent to monitoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorSummary {
    /// Unique identifier for this report (UUID v4).
    pub id: Uuid,
    pub message: String,
    pub level: ErrorLevel,
    pub category: ErrorCategory,
    /// How many times this signature had been seen, including this one.
    pub occurrences: u64,
    pub occurred_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

impl ErrorSummary {
    pub fn new(message: impl Into<String>, level: ErrorLevel, category: ErrorCategory) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            level,
            category,
            occurrences: 1,
            occurred_at: Utc::now(),
            context: None,
        }
    }

    pub fn with_occurrences(mut self, occurrences: u64) -> Self {
        self.occurrences = occurrences;
        self
    }

    pub fn with_context(mut self, context: Option<serde_json::Value>) -> Self {
        self.context = context;
        self
    }
}

/// Pluggable monitoring integration point.
#[cfg_attr(test, mockall::automock)]
pub trait ErrorReporter: Send + Sync {
    /// Hand off a summary without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`FaultError::ReportFailed`] if the summary could not be queued. The
    /// error manager logs and discards this.
    fn report(&self, summary: &ErrorSummary) -> FaultResult<()>;
}

/// Reporter that only notes what it would have sent.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ErrorReporter for NoopReporter {
    fn report(&self, summary: &ErrorSummary) -> FaultResult<()> {
        log_debug!(
            error = %summary.message,
            level = %summary.level,
            category = %summary.category,
            report_id = %summary.id,
            "Would report error to monitoring system"
        );
        Ok(())
    }
}

/// Destination for summaries drained by a [`ChannelReporter`].
#[async_trait]
pub trait MonitoringSink: Send + Sync {
    async fn submit(&self, summary: ErrorSummary) -> anyhow::Result<()>;
}

/// Reporter that queues summaries for asynchronous delivery.
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    sender: mpsc::UnboundedSender<ErrorSummary>,
}

impl ChannelReporter {
    /// Create a reporter and the receiving end of its queue.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ErrorSummary>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Create a reporter whose queue is drained into `sink` by a spawned task.
    ///
    /// Must be called from within a tokio runtime. The task exits once every clone
    /// of the reporter has been dropped.
    pub fn spawn(sink: Arc<dyn MonitoringSink>) -> (Self, JoinHandle<()>) {
        let (reporter, mut receiver) = Self::new();
        let handle = tokio::spawn(async move {
            while let Some(summary) = receiver.recv().await {
                let report_id = summary.id;
                if let Err(e) = sink.submit(summary).await {
                    log_warn!(
                        report_id = %report_id,
                        error = %e,
                        "Monitoring sink rejected error report"
                    );
                }
            }
            log_debug!("Error report channel closed, monitoring forwarder stopping");
        });
        (reporter, handle)
    }
}

impl ErrorReporter for ChannelReporter {
    fn report(&self, summary: &ErrorSummary) -> FaultResult<()> {
        self.sender
            .send(summary.clone())
            .map_err(|_| FaultError::report_failed("monitoring channel closed"))
    }
}
