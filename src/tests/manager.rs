// Unit Tests for the Error Manager
//
// UNIT UNDER TEST: ErrorHandler (ErrorManager implementation)
//
// BUSINESS RESPONSIBILITY:
//   - Classifies every failure with a level and category, using defaults when absent
//   - Counts repeated failures per category/level/message signature
//   - Routes formatted errors to the log sink matching their level
//   - Forwards MAJOR and CRITICAL errors to the monitoring reporter
//   - Terminates the process only through the fatal path
//   - Never lets a reporting or formatting failure escape
//
// TEST COVERAGE:
//   - Default classification and warn routing
//   - Level-to-sink routing table including the silent debug level
//   - Occurrence counting and key format
//   - Reporting once per severe error, with swallowed failures and panics
//   - Fatal, uncaught and unhandled-rejection entry points
//   - Optional error cap enforcement

use crate::config::ErrorHandlingConfig;
use crate::core_types::{ErrorCategory, ErrorLevel, RaisedError, UserError};
use crate::error::FaultError;
use crate::manager::{ErrorHandler, ErrorManager, ErrorOptions, RejectionOrigin};
use crate::reporting::MockErrorReporter;
use crate::tests::helpers::{create_test_harness, PanickingReporter, RecordingSink};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

#[cfg(test)]
mod handle_error_routing_tests {
    use super::*;

    #[test]
    fn test_no_options_classifies_as_minor_application_and_warns() {
        // Test verifies defaults route to the warning sink, not the error sink

        // Arrange
        let harness = create_test_harness(ErrorHandlingConfig::default());

        // Act
        harness
            .handler
            .handle_error(&RaisedError::from("cache miss storm"), ErrorOptions::default());

        // Assert
        assert_eq!(harness.sink.count("warn"), 1);
        assert_eq!(harness.sink.count("error"), 0);
        assert!(harness.reporter.summaries().is_empty());
        assert_eq!(
            harness
                .handler
                .occurrence_count("application:minor:cache miss storm"),
            1
        );
    }

    #[test]
    fn test_disk_full_scenario() {
        // Arrange
        let harness = create_test_harness(ErrorHandlingConfig::default());
        let raised = RaisedError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));

        // Act
        harness.handler.handle_error(&raised, ErrorOptions::new());

        // Assert
        let records = harness.sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, "warn");
        assert_eq!(records[0].label, "[APPLICATION] disk full");
        assert_eq!(records[0].payload["message"], "disk full");
        assert_eq!(
            harness.handler.occurrence_count("application:minor:disk full"),
            1
        );
    }

    #[test]
    fn test_critical_logs_error_and_reports_once() {
        // Arrange
        let harness = create_test_harness(ErrorHandlingConfig::default());

        // Act
        harness.handler.handle_error(
            &RaisedError::from("state file corrupted"),
            ErrorOptions::new().with_level(ErrorLevel::Critical),
        );

        // Assert
        assert_eq!(harness.sink.count("error"), 1);
        assert_eq!(harness.sink.total(), 1);
        let summaries = harness.reporter.summaries();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].level, ErrorLevel::Critical);
        assert_eq!(summaries[0].category, ErrorCategory::Application);
        assert_eq!(summaries[0].message, "state file corrupted");
    }

    #[test]
    fn test_informational_logs_info_and_never_reports() {
        // Arrange
        let harness = create_test_harness(ErrorHandlingConfig::default());

        // Act
        harness.handler.handle_error(
            &RaisedError::from("retrying request"),
            ErrorOptions::new().with_level(ErrorLevel::Informational),
        );

        // Assert
        assert_eq!(harness.sink.count("info"), 1);
        assert_eq!(harness.sink.total(), 1);
        assert!(harness.reporter.summaries().is_empty());
    }

    #[test]
    fn test_debug_level_is_silently_ignored() {
        // Test verifies levels below INFORMATIONAL produce no output and no report

        // Arrange
        let harness = create_test_harness(ErrorHandlingConfig::default());

        // Act
        harness.handler.handle_error(
            &RaisedError::from("verbose detail"),
            ErrorOptions::new().with_level(ErrorLevel::Debug),
        );

        // Assert
        assert_eq!(harness.sink.total(), 0);
        assert!(harness.reporter.summaries().is_empty());
        assert_eq!(
            harness.handler.occurrence_count("application:debug:verbose detail"),
            1
        );
    }

    #[test]
    fn test_connection_user_error_at_major_logs_resolution_and_reports() {
        // Arrange
        let harness = create_test_harness(ErrorHandlingConfig::default());
        let raised = RaisedError::from(
            UserError::new("Failed to connect to Claude AI service")
                .with_category(ErrorCategory::Connection)
                .with_resolution("Check your internet connection and API key, then try again."),
        );

        // Act
        harness
            .handler
            .handle_error(&raised, ErrorOptions::new().with_level(ErrorLevel::Major));

        // Assert
        let records = harness.sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, "error");
        assert_eq!(
            records[0].label,
            "[APPLICATION] Failed to connect to Claude AI service"
        );
        let display = records[0].payload["display"].as_str().unwrap();
        assert!(display.contains("Check your internet connection and API key, then try again."));
        assert_eq!(harness.reporter.summaries().len(), 1);
        assert_eq!(harness.reporter.summaries()[0].category, ErrorCategory::Application);
    }

    #[test]
    fn test_user_error_category_does_not_change_default_classification() {
        // Arrange
        let harness = create_test_harness(ErrorHandlingConfig::default());
        let raised = RaisedError::from(
            UserError::new("Failed to connect").with_category(ErrorCategory::Connection),
        );

        // Act
        harness.handler.handle_error(&raised, ErrorOptions::default());

        // Assert
        assert_eq!(
            harness.handler.occurrence_count("application:minor:Failed to connect"),
            1
        );
        assert_eq!(harness.handler.occurrences().len(), 1);
        let records = harness.sink.records();
        assert_eq!(records[0].label, "[APPLICATION] Failed to connect");
        assert_eq!(records[0].payload["category"], "application");
        assert_eq!(records[0].payload["error_category"], "connection");
    }

    #[test]
    fn test_explicit_category_overrides_user_error_category() {
        // Arrange
        let harness = create_test_harness(ErrorHandlingConfig::default());
        let raised = RaisedError::from(UserError::new("bad flag").with_category(ErrorCategory::Command));

        // Act
        harness.handler.handle_error(
            &raised,
            ErrorOptions::new().with_category(ErrorCategory::Validation),
        );

        // Assert
        assert_eq!(harness.handler.occurrence_count("validation:minor:bad flag"), 1);
        assert_eq!(harness.sink.records()[0].label, "[VALIDATION] bad flag");
    }

    #[test]
    fn test_context_is_attached_to_payload_and_report() {
        // Arrange
        let harness = create_test_harness(ErrorHandlingConfig::default());

        // Act
        harness.handler.handle_error(
            &RaisedError::from("upload rejected"),
            ErrorOptions::new()
                .with_level(ErrorLevel::Major)
                .with_context(serde_json::json!({ "file": "notes.md" })),
        );

        // Assert
        assert_eq!(harness.sink.records()[0].payload["context"]["file"], "notes.md");
        assert_eq!(
            harness.reporter.summaries()[0].context,
            Some(serde_json::json!({ "file": "notes.md" }))
        );
    }
}

#[cfg(test)]
mod occurrence_counting_tests {
    use super::*;

    #[test]
    fn test_identical_errors_increment_counter_without_altering_routing() {
        // Arrange
        let harness = create_test_harness(ErrorHandlingConfig::default());
        let raised = RaisedError::from("rate limited");
        let key = "network:minor:rate limited";

        // Act
        let options = || ErrorOptions::new().with_category(ErrorCategory::Network);
        harness.handler.handle_error(&raised, options());
        let after_first = harness.handler.occurrence_count(key);
        harness.handler.handle_error(&raised, options());

        // Assert
        assert_eq!(after_first, 1);
        assert_eq!(harness.handler.occurrence_count(key), 2);
        assert_eq!(harness.sink.count("warn"), 2);
    }

    #[test]
    fn test_key_format() {
        let key = ErrorHandler::occurrence_key(
            &RaisedError::from("boom"),
            ErrorLevel::Critical,
            ErrorCategory::Initialization,
        );
        assert_eq!(key, "initialization:critical:boom");
    }

    #[test]
    fn test_reported_summary_carries_running_count() {
        // Arrange
        let harness = create_test_harness(ErrorHandlingConfig::default());
        let raised = RaisedError::from("provider down");
        let options = || ErrorOptions::new().with_level(ErrorLevel::Major);

        // Act
        harness.handler.handle_error(&raised, options());
        harness.handler.handle_error(&raised, options());

        // Assert
        let counts: Vec<u64> = harness
            .reporter
            .summaries()
            .iter()
            .map(|s| s.occurrences)
            .collect();
        assert_eq!(counts, vec![1, 2]);
    }

    #[test]
    fn test_uncapped_by_default() {
        // Arrange
        let config = ErrorHandlingConfig {
            max_tracked_errors: 2,
            ..Default::default()
        };
        let harness = create_test_harness(config);

        // Act
        for _ in 0..5 {
            harness
                .handler
                .handle_error(&RaisedError::from("flaky"), ErrorOptions::new());
        }

        // Assert
        assert_eq!(harness.sink.count("warn"), 5);
        assert_eq!(harness.handler.occurrence_count("application:minor:flaky"), 5);
    }

    #[test]
    fn test_enforced_cap_suppresses_logging_but_keeps_counting() {
        // Arrange
        let config = ErrorHandlingConfig {
            max_tracked_errors: 2,
            enforce_error_cap: true,
            ..Default::default()
        };
        let harness = create_test_harness(config);

        // Act
        for _ in 0..4 {
            harness.handler.handle_error(
                &RaisedError::from("flaky"),
                ErrorOptions::new().with_level(ErrorLevel::Major),
            );
        }

        // Assert
        assert_eq!(harness.sink.count("error"), 2);
        assert_eq!(harness.reporter.summaries().len(), 2);
        assert_eq!(harness.handler.occurrence_count("application:major:flaky"), 4);
    }
}

#[cfg(test)]
mod reporting_failure_tests {
    use super::*;

    #[test]
    fn test_reporter_invoked_exactly_once_for_critical() {
        // Arrange
        let mut reporter = MockErrorReporter::new();
        reporter
            .expect_report()
            .withf(|summary| summary.level == ErrorLevel::Critical && summary.message == "oom")
            .times(1)
            .returning(|_| Ok(()));
        let sink = Arc::new(RecordingSink::default());
        let handler = ErrorHandler::new(ErrorHandlingConfig::default())
            .with_log_sink(sink.clone())
            .with_reporter(Arc::new(reporter));

        // Act
        handler.handle_error(
            &RaisedError::from("oom"),
            ErrorOptions::new().with_level(ErrorLevel::Critical),
        );

        // Assert
        assert_eq!(sink.count("error"), 1);
    }

    #[test]
    fn test_reporter_never_invoked_below_major() {
        // Arrange
        let mut reporter = MockErrorReporter::new();
        reporter.expect_report().times(0);
        let handler = ErrorHandler::new(ErrorHandlingConfig::default())
            .with_log_sink(Arc::new(RecordingSink::default()))
            .with_reporter(Arc::new(reporter));

        // Act
        for level in [ErrorLevel::Debug, ErrorLevel::Informational, ErrorLevel::Minor] {
            handler.handle_error(&RaisedError::from("quiet"), ErrorOptions::new().with_level(level));
        }
    }

    #[test]
    fn test_reporter_error_is_swallowed() {
        // Arrange
        let mut reporter = MockErrorReporter::new();
        reporter
            .expect_report()
            .times(1)
            .returning(|_| Err(FaultError::report_failed("monitoring channel closed")));
        let sink = Arc::new(RecordingSink::default());
        let handler = ErrorHandler::new(ErrorHandlingConfig::default())
            .with_log_sink(sink.clone())
            .with_reporter(Arc::new(reporter));

        // Act
        handler.handle_error(
            &RaisedError::from("upstream 500"),
            ErrorOptions::new().with_level(ErrorLevel::Major),
        );

        // Assert
        assert_eq!(sink.count("error"), 1);
    }

    #[test]
    fn test_reporter_panic_is_swallowed() {
        // Arrange
        let sink = Arc::new(RecordingSink::default());
        let handler = ErrorHandler::new(ErrorHandlingConfig::default())
            .with_log_sink(sink.clone())
            .with_reporter(Arc::new(PanickingReporter));

        // Act
        handler.handle_error(
            &RaisedError::from("upstream 500"),
            ErrorOptions::new().with_level(ErrorLevel::Critical),
        );
        handler.handle_error(
            &RaisedError::from("upstream 500"),
            ErrorOptions::new().with_level(ErrorLevel::Critical),
        );

        // Assert
        assert_eq!(sink.count("error"), 2);
        assert_eq!(handler.occurrence_count("application:critical:upstream 500"), 2);
    }

    #[test]
    fn test_reporting_disabled_skips_reporter() {
        // Arrange
        let config = ErrorHandlingConfig {
            reporting_enabled: false,
            ..Default::default()
        };
        let harness = create_test_harness(config);

        // Act
        harness.handler.handle_error(
            &RaisedError::from("oom"),
            ErrorOptions::new().with_level(ErrorLevel::Critical),
        );

        // Assert
        assert_eq!(harness.sink.count("error"), 1);
        assert!(harness.reporter.summaries().is_empty());
    }
}

#[cfg(test)]
mod process_level_entry_point_tests {
    use super::*;
    use serial_test::serial;

    // Fatal tests unwind through the terminator, so they stay clear of the
    // process-global panic hook tests.
    #[test]
    #[serial]
    fn test_fatal_error_logs_then_terminates_with_status_one() {
        // Test verifies the fatal path never returns and invokes termination exactly once

        // Arrange
        let harness = create_test_harness(ErrorHandlingConfig::default());

        // Act
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            harness
                .handler
                .handle_fatal_error(&RaisedError::from("config unreadable"))
        }));

        // Assert
        assert!(outcome.is_err(), "fatal handling must not return");
        assert_eq!(harness.terminator.codes(), vec![1]);
        let records = harness.sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, "error");
        assert!(records[0].label.starts_with("FATAL ERROR:"));
        assert_eq!(records[0].payload["level"], "critical");
        assert_eq!(records[0].payload["category"], "application");
    }

    #[test]
    #[serial]
    fn test_fatal_exit_code_is_configurable() {
        // Arrange
        let config = ErrorHandlingConfig {
            fatal_exit_code: 70,
            ..Default::default()
        };
        let harness = create_test_harness(config);

        // Act
        let _ = catch_unwind(AssertUnwindSafe(|| {
            harness.handler.handle_fatal_error(&RaisedError::null())
        }));

        // Assert
        assert_eq!(harness.terminator.codes(), vec![70]);
    }

    #[test]
    fn test_log_fatal_error_does_not_terminate() {
        // Arrange
        let harness = create_test_harness(ErrorHandlingConfig::default());

        // Act
        harness.handler.log_fatal_error(&RaisedError::from("shutting down"));

        // Assert
        assert_eq!(harness.sink.count("error"), 1);
        assert!(harness.terminator.codes().is_empty());
    }

    #[test]
    fn test_unhandled_rejection_logs_major_with_origin_and_continues() {
        // Arrange
        let harness = create_test_harness(ErrorHandlingConfig::default());
        let origin = RejectionOrigin::new("session-sync").with_task_id("42");

        // Act
        harness
            .handler
            .handle_unhandled_rejection(&RaisedError::from("socket closed"), &origin);

        // Assert
        let records = harness.sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, "error");
        assert_eq!(records[0].payload["level"], "major");
        assert_eq!(records[0].payload["context"]["origin"], "session-sync");
        assert_eq!(records[0].payload["context"]["task_id"], "42");
        assert!(harness.terminator.codes().is_empty());
    }

    #[test]
    fn test_uncaught_exception_logs_critical_and_continues() {
        // Arrange
        let harness = create_test_harness(ErrorHandlingConfig::default());

        // Act
        harness
            .handler
            .handle_uncaught_exception(&RaisedError::from("index out of bounds"));

        // Assert
        let records = harness.sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, "error");
        assert_eq!(records[0].payload["level"], "critical");
        assert!(harness.terminator.codes().is_empty());
        assert!(harness.reporter.summaries().is_empty());
    }

    #[test]
    fn test_usable_as_trait_object() {
        // Arrange
        let harness = create_test_harness(ErrorHandlingConfig::default());
        let sink = harness.sink.clone();
        let manager: Arc<dyn ErrorManager> = Arc::new(harness.handler);

        // Act
        manager.handle_error(&RaisedError::from("via trait"), ErrorOptions::default());

        // Assert
        assert_eq!(sink.count("warn"), 1);
    }
}
