//! Core value types for the error pipeline
//!
//! ## Organization
//! - `taxonomy` - Severity levels, categories, resolutions and `UserError`
//! - `raised` - `RaisedError`, the tagged union for anything a caller may raise

pub mod raised;
pub mod taxonomy;

// Re-export commonly used types
pub use raised::{ErrorKind, RaisedError, UNKNOWN_ERROR, UNPRINTABLE_ERROR};
pub use taxonomy::{
    ErrorCategory, ErrorLevel, LegacyLevel, Resolution, UserError, UNKNOWN_USER_ERROR,
};
