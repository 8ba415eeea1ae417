//! Error routing example showing levels, categories and user-facing output.
//!
//! This example shows how to:
//! - Load configuration from the environment and start logging
//! - Route failures at different severity levels
//! - Render friendly messages with resolution guidance
//! - Supervise a background task so its failure is not lost
//!
//! # Running
//!
//! ```bash
//! cargo run --example error_routing
//!
//! # Show the debug-level bookkeeping too:
//! RUST_LOG=debug cargo run --example error_routing
//! ```
//!
//! # Level Routing
//!
//! | Level | Log level | Reported |
//! |-------|-----------|----------|
//! | Critical, Major | error | yes |
//! | Minor | warn | no |
//! | Informational | info | no |
//! | Debug | dropped | no |

use fault_router::{
    format_display_for_user, format_user_facing, format_with_severity, init_error_handling,
    init_logging, spawn_supervised, ErrorCategory, ErrorHandlingConfig, ErrorLevel, ErrorManager,
    ErrorOptions, FaultResult, LegacyLevel, RaisedError, UserError,
};
use serde_json::json;
use std::sync::Arc;

fn demonstrate_levels(errors: &dyn ErrorManager) {
    println!("=== Routing by level ===\n");

    let levels = [
        ErrorLevel::Critical,
        ErrorLevel::Major,
        ErrorLevel::Minor,
        ErrorLevel::Informational,
        ErrorLevel::Debug,
    ];
    for level in levels {
        println!("  {level}: reportable = {}", level.is_reportable());
        errors.handle_error(
            &RaisedError::from(format!("sample failure at {level}")),
            ErrorOptions::new().with_level(level),
        );
    }

    // Older call sites still speak in the legacy vocabulary.
    let legacy: ErrorLevel = LegacyLevel::Warning.into();
    println!("  legacy WARNING maps to {legacy}\n");
}

fn demonstrate_user_output(errors: &dyn ErrorManager) {
    println!("=== User-facing output ===\n");

    let disk_full = UserError::new("Could not save session")
        .with_category(ErrorCategory::FileSystem)
        .with_resolution(vec![
            "Free up disk space",
            "Check write permissions on ~/.config",
        ]);
    println!("{}\n", format_with_severity(&disk_full, ErrorLevel::Major));

    let connection = UserError::new("Failed to connect to Claude AI service")
        .with_category(ErrorCategory::Connection)
        .with_resolution("Check your internet connection and API key, then try again.");
    println!("{}\n", format_user_facing(&connection));

    let native = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "settings.json is read-only");
    println!("{}\n", format_display_for_user(&RaisedError::from(native)));

    errors.handle_error(
        &RaisedError::from(connection),
        ErrorOptions::new()
            .with_level(ErrorLevel::Major)
            .with_category(ErrorCategory::Connection)
            .with_context(json!({ "endpoint": "api.anthropic.com" })),
    );
}

#[tokio::main]
async fn main() -> FaultResult<()> {
    let config = ErrorHandlingConfig::from_env()?;
    init_logging(&config);
    let errors = init_error_handling(config);

    demonstrate_levels(errors.as_ref());
    demonstrate_user_output(errors.as_ref());

    println!("=== Supervised background task ===\n");
    let manager: Arc<dyn ErrorManager> = errors.clone();
    let outcome = spawn_supervised(manager, "refresh-token", async {
        Err::<(), _>(anyhow::anyhow!("token endpoint returned 503"))
    })
    .await;
    println!("  task outcome: {outcome:?}");

    for (signature, count) in errors.occurrences() {
        println!("  seen {count}x: {signature}");
    }

    Ok(())
}
