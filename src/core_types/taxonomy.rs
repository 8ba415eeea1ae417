//! Severity levels, categories, and the user-facing error value.

use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Ordered severity used to pick a log sink and decide whether to report.
///
/// Ordering follows declaration order, so `ErrorLevel::Minor < ErrorLevel::Major`.
/// [`ErrorLevel::Debug`] sits below `Informational` and is never logged or reported.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ErrorLevel {
    /// Diagnostic noise; dropped by the manager.
    Debug,
    /// No user-facing alarm.
    Informational,
    /// Recoverable; logged as a warning.
    #[default]
    Minor,
    /// Logged as an error and reported.
    Major,
    /// Logged as an error, reported, and may be fatal.
    Critical,
}

/// Level names kept for callers written against the older five-step scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyLevel {
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
}

impl From<LegacyLevel> for ErrorLevel {
    fn from(level: LegacyLevel) -> Self {
        match level {
            LegacyLevel::Debug => Self::Debug,
            LegacyLevel::Info => Self::Informational,
            LegacyLevel::Warning => Self::Minor,
            LegacyLevel::Error => Self::Major,
            LegacyLevel::Fatal => Self::Critical,
        }
    }
}

impl ErrorLevel {
    /// Lowercase name, as used in occurrence keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Informational => "informational",
            Self::Minor => "minor",
            Self::Major => "major",
            Self::Critical => "critical",
        }
    }

    /// Whether errors at this level are forwarded to the monitoring sink.
    pub fn is_reportable(&self) -> bool {
        *self >= Self::Major
    }

    /// Whether resolution guidance is worth showing alongside a severity notice.
    pub fn shows_resolution(&self) -> bool {
        matches!(self, Self::Major | Self::Critical)
    }

    /// One-sentence explanation of what this level means for the user.
    pub fn severity_message(&self) -> &'static str {
        match self {
            Self::Critical => {
                "This is a critical error that prevents the application from functioning."
            }
            Self::Major => "This is a significant error that may impact functionality.",
            Self::Minor => {
                "This is a minor error that should not significantly impact functionality."
            }
            Self::Informational => "This is an informational message about an error condition.",
            Self::Debug => "",
        }
    }
}

impl fmt::Display for ErrorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LegacyLevel::Debug.into()),
            "info" => Ok(LegacyLevel::Info.into()),
            "warning" | "warn" => Ok(LegacyLevel::Warning.into()),
            "error" => Ok(LegacyLevel::Error.into()),
            "fatal" => Ok(LegacyLevel::Fatal.into()),
            "informational" => Ok(Self::Informational),
            "minor" => Ok(Self::Minor),
            "major" => Ok(Self::Major),
            "critical" => Ok(Self::Critical),
            other => Err(format!("unknown error level: {other}")),
        }
    }
}

/// Subsystem that produced a failure. Used for grouping and log prefixes only.
///
/// Downstream domains extend the set with [`ErrorCategory::Custom`]:
///
/// ```rust
/// use fault_router::ErrorCategory;
///
/// const PLUGINS: ErrorCategory = ErrorCategory::Custom("plugins");
/// assert_eq!(PLUGINS.label(), "PLUGINS");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorCategory {
    #[default]
    Application,
    Authentication,
    Network,
    Connection,
    Initialization,
    Configuration,
    FileSystem,
    Command,
    Api,
    Validation,
    Internal,
    /// Category defined by calling code; use a lowercase identifier.
    Custom(&'static str),
}

impl ErrorCategory {
    /// Lowercase identifier, as used in occurrence keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Authentication => "authentication",
            Self::Network => "network",
            Self::Connection => "connection",
            Self::Initialization => "initialization",
            Self::Configuration => "configuration",
            Self::FileSystem => "file_system",
            Self::Command => "command",
            Self::Api => "api",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Custom(name) => name,
        }
    }

    /// Uppercase label used to prefix log lines, e.g. `[CONNECTION]`.
    pub fn label(&self) -> Cow<'static, str> {
        match self {
            Self::Application => Cow::Borrowed("APPLICATION"),
            Self::Authentication => Cow::Borrowed("AUTHENTICATION"),
            Self::Network => Cow::Borrowed("NETWORK"),
            Self::Connection => Cow::Borrowed("CONNECTION"),
            Self::Initialization => Cow::Borrowed("INITIALIZATION"),
            Self::Configuration => Cow::Borrowed("CONFIGURATION"),
            Self::FileSystem => Cow::Borrowed("FILE_SYSTEM"),
            Self::Command => Cow::Borrowed("COMMAND"),
            Self::Api => Cow::Borrowed("API"),
            Self::Validation => Cow::Borrowed("VALIDATION"),
            Self::Internal => Cow::Borrowed("INTERNAL"),
            Self::Custom(name) => Cow::Owned(name.to_ascii_uppercase()),
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Remediation guidance attached to a [`UserError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Resolution {
    /// One piece of advice, shown verbatim.
    Single(String),
    /// Ordered steps, shown as a bulleted continuation.
    Steps(Vec<String>),
}

impl Resolution {
    /// Render the guidance as it appears after `Resolution: `.
    pub fn render(&self) -> String {
        match self {
            Self::Single(text) => text.clone(),
            Self::Steps(steps) => steps.join("\n  - "),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(text) => text.is_empty(),
            Self::Steps(steps) => steps.is_empty(),
        }
    }
}

impl From<&str> for Resolution {
    fn from(text: &str) -> Self {
        Self::Single(text.to_string())
    }
}

impl From<String> for Resolution {
    fn from(text: String) -> Self {
        Self::Single(text)
    }
}

impl<S: Into<String>> From<Vec<S>> for Resolution {
    fn from(steps: Vec<S>) -> Self {
        Self::Steps(steps.into_iter().map(Into::into).collect())
    }
}

/// Message substituted when a [`UserError`] is built from blank text.
pub const UNKNOWN_USER_ERROR: &str = "An unknown error occurred";

/// A failure meant to be shown directly to the end user.
///
/// Built once at the point a domain operation fails, then handed to the formatter
/// or the error manager. There are no setters; the `with_*` methods consume the
/// value while it is being assembled.
///
/// ```rust
/// use fault_router::{ErrorCategory, UserError};
///
/// let err = UserError::new("AI module not initialized")
///     .with_category(ErrorCategory::Initialization)
///     .with_resolution("Call AiModule::init (or AppContext::init_ai) before using AI capabilities.");
/// assert_eq!(err.category(), ErrorCategory::Initialization);
/// ```
#[derive(Error, Debug)]
#[error("{message}")]
pub struct UserError {
    message: String,
    resolution: Option<Resolution>,
    category: ErrorCategory,
    #[source]
    cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl UserError {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            UNKNOWN_USER_ERROR.to_string()
        } else {
            message
        };
        Self {
            message,
            resolution: None,
            category: ErrorCategory::default(),
            cause: None,
        }
    }

    pub fn with_resolution(mut self, resolution: impl Into<Resolution>) -> Self {
        let resolution = resolution.into();
        self.resolution = (!resolution.is_empty()).then_some(resolution);
        self
    }

    pub fn with_category(mut self, category: ErrorCategory) -> Self {
        self.category = category;
        self
    }

    /// Attach the originating failure for diagnostic chaining.
    pub fn with_cause(mut self, cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}
