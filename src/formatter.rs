//! Turns raised values into displayable records.
//!
//! Two renderings exist:
//! - friendly, for [`UserError`]s: the message first, then the resolution
//! - technical, for everything else: the message plus the cause chain
//!
//! Every function here is pure and total. A failure while formatting degrades to a
//! minimal record rather than escaping to the caller.

use crate::core_types::{ErrorCategory, ErrorKind, ErrorLevel, RaisedError, Resolution, UserError};
use crate::guard;
use serde_json::{Map, Value};

/// Display-ready view of a raised value.
///
/// Borrows the original so diagnostics can reach it; it lives only as long as the
/// logging or reporting call that produced it.
#[derive(Debug)]
pub struct FormattedError<'a> {
    /// Never empty.
    pub message: String,
    pub resolution: Option<Resolution>,
    /// Present only for user errors.
    pub category: Option<ErrorCategory>,
    pub kind: ErrorKind,
    /// Cause chain, outermost first.
    pub details: Vec<String>,
    /// Full rendered text for a terminal.
    pub display: String,
    /// Set when formatting failed and this record is the fallback.
    pub formatting_error: Option<String>,
    pub original: &'a RaisedError,
}

impl FormattedError<'_> {
    /// Structured form handed to log sinks.
    pub fn to_payload(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("message".into(), Value::String(self.message.clone()));
        payload.insert("kind".into(), serde_json::to_value(self.kind).unwrap_or(Value::Null));
        if let Some(resolution) = &self.resolution {
            payload.insert(
                "resolution".into(),
                serde_json::to_value(resolution).unwrap_or(Value::Null),
            );
        }
        if let Some(category) = self.category {
            payload.insert("category".into(), Value::String(category.as_str().to_string()));
        }
        if !self.details.is_empty() {
            payload.insert(
                "details".into(),
                Value::Array(self.details.iter().cloned().map(Value::String).collect()),
            );
        }
        payload.insert("display".into(), Value::String(self.display.clone()));
        if let Some(formatting_error) = &self.formatting_error {
            payload.insert(
                "formatting_error".into(),
                Value::String(formatting_error.clone()),
            );
        }
        Value::Object(payload)
    }
}

/// Format any raised value for display.
///
/// ```rust
/// use fault_router::{format_for_display, RaisedError};
///
/// let raised = RaisedError::from("disk full");
/// let record = format_for_display(&raised);
/// assert_eq!(record.message, "disk full");
/// ```
pub fn format_for_display(error: &RaisedError) -> FormattedError<'_> {
    guard::contain(|| build_record(error)).unwrap_or_else(|payload| {
        let failure = RaisedError::from_panic_payload(&*payload).message();
        FormattedError {
            message: error.message(),
            resolution: None,
            category: None,
            kind: error.kind(),
            details: Vec::new(),
            display: error.message(),
            formatting_error: Some(failure),
            original: error,
        }
    })
}

fn build_record(error: &RaisedError) -> FormattedError<'_> {
    match error {
        RaisedError::User(user) => FormattedError {
            message: user.message().to_string(),
            resolution: user.resolution().cloned(),
            category: Some(user.category()),
            kind: ErrorKind::User,
            details: error.causes(),
            display: format_user_facing(user),
            formatting_error: None,
            original: error,
        },
        RaisedError::Native(_) => {
            let message = error.message();
            let details = error.causes();
            let display = technical_text(&message, &details);
            FormattedError {
                message,
                resolution: None,
                category: None,
                kind: ErrorKind::Native,
                details,
                display,
                formatting_error: None,
                original: error,
            }
        }
        RaisedError::Message(_) | RaisedError::Unrecognized { .. } => {
            let message = error.message();
            FormattedError {
                display: message.clone(),
                message,
                resolution: None,
                category: None,
                kind: error.kind(),
                details: Vec::new(),
                formatting_error: None,
                original: error,
            }
        }
    }
}

fn technical_text(message: &str, details: &[String]) -> String {
    let mut text = message.to_string();
    for cause in details {
        text.push_str("\n  caused by: ");
        text.push_str(cause);
    }
    text
}

/// Render a user error as `Error: <message>` plus an optional resolution block.
///
/// ```rust
/// use fault_router::{format_user_facing, UserError};
///
/// let err = UserError::new("Upload failed").with_resolution(vec!["Retry", "Check quota"]);
/// assert_eq!(
///     format_user_facing(&err),
///     "Error: Upload failed\nResolution: Retry\n  - Check quota"
/// );
/// ```
pub fn format_user_facing(error: &UserError) -> String {
    match error.resolution() {
        Some(resolution) => format!(
            "Error: {}\nResolution: {}",
            error.message(),
            resolution.render()
        ),
        None => format!("Error: {}", error.message()),
    }
}

/// Render any raised value as a single string for the terminal.
pub fn format_display_for_user(error: &RaisedError) -> String {
    format_for_display(error).display
}

/// Render a user error with a sentence describing its severity.
///
/// The resolution block is included only for levels where
/// [`ErrorLevel::shows_resolution`] holds.
pub fn format_with_severity(error: &UserError, level: ErrorLevel) -> String {
    let mut text = format!("Error: {}", error.message());
    let notice = level.severity_message();
    if !notice.is_empty() {
        text.push('\n');
        text.push_str(notice);
    }
    if level.shows_resolution() {
        if let Some(resolution) = error.resolution() {
            text.push_str("\nResolution: ");
            text.push_str(&resolution.render());
        }
    }
    text
}
