//! Tagged union for any value handed to the error pipeline.

use super::taxonomy::UserError;
use crate::guard;
use serde::Serialize;
use std::any::Any;
use std::fmt::Debug;

/// Message used when a value yields no usable text.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Shown when an error's `Display` impl panics.
pub const UNPRINTABLE_ERROR: &str = "<error message could not be rendered>";

/// Which branch of [`RaisedError`] a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    User,
    Native,
    Message,
    Unrecognized,
}

/// Anything a caller might raise.
///
/// Each variant has its own total conversion to a message, see [`RaisedError::message`].
#[derive(Debug)]
pub enum RaisedError {
    /// Friendly failure with optional resolution guidance.
    User(UserError),
    /// Any typed Rust error; its `source()` chain is kept for diagnostics.
    Native(Box<dyn std::error::Error + Send + Sync>),
    /// Bare text.
    Message(String),
    /// A value with no error shape. `json` holds the structured rendering when
    /// serialization succeeded, `debug` is the fallback.
    Unrecognized {
        json: Option<serde_json::Value>,
        debug: String,
    },
}

impl RaisedError {
    /// Wrap an arbitrary value, preferring structured serialization.
    pub fn unrecognized<T: Serialize + Debug + ?Sized>(value: &T) -> Self {
        Self::Unrecognized {
            json: serde_json::to_value(value).ok(),
            debug: format!("{value:?}"),
        }
    }

    /// The absence of a value, e.g. a task that failed without a reason.
    pub fn null() -> Self {
        Self::Unrecognized {
            json: Some(serde_json::Value::Null),
            debug: "null".to_string(),
        }
    }

    /// Convert a panic payload, keeping `&str` and `String` messages.
    pub fn from_panic_payload(payload: &(dyn Any + Send)) -> Self {
        if let Some(text) = payload.downcast_ref::<&str>() {
            Self::Message((*text).to_string())
        } else if let Some(text) = payload.downcast_ref::<String>() {
            Self::Message(text.clone())
        } else {
            Self::Unrecognized {
                json: None,
                debug: "non-string panic payload".to_string(),
            }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::User(_) => ErrorKind::User,
            Self::Native(_) => ErrorKind::Native,
            Self::Message(_) => ErrorKind::Message,
            Self::Unrecognized { .. } => ErrorKind::Unrecognized,
        }
    }

    pub fn as_user_error(&self) -> Option<&UserError> {
        match self {
            Self::User(err) => Some(err),
            _ => None,
        }
    }

    /// Best-effort message. Deterministic, never empty, never panics.
    pub fn message(&self) -> String {
        let message = match self {
            Self::User(err) => err.message().to_string(),
            Self::Native(err) => render_guarded(&**err),
            Self::Message(text) => text.clone(),
            Self::Unrecognized { json: Some(value), .. } => value.to_string(),
            Self::Unrecognized { json: None, debug } => debug.clone(),
        };

        if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        }
    }

    /// Messages of every error underneath this one, outermost first.
    pub fn causes(&self) -> Vec<String> {
        let first = match self {
            Self::User(err) => err.cause().map(|c| c as &(dyn std::error::Error + 'static)),
            Self::Native(err) => err.source(),
            Self::Message(_) | Self::Unrecognized { .. } => None,
        };

        let mut chain = Vec::new();
        let mut current = first;
        while let Some(err) = current {
            chain.push(render_guarded(err));
            current = err.source();
        }
        chain
    }
}

fn render_guarded(err: &(dyn std::error::Error + 'static)) -> String {
    guard::contain(|| err.to_string())
        .unwrap_or_else(|_| UNPRINTABLE_ERROR.to_string())
}

impl From<UserError> for RaisedError {
    fn from(err: UserError) -> Self {
        Self::User(err)
    }
}

impl From<String> for RaisedError {
    fn from(text: String) -> Self {
        Self::Message(text)
    }
}

impl From<&str> for RaisedError {
    fn from(text: &str) -> Self {
        Self::Message(text.to_string())
    }
}

impl From<anyhow::Error> for RaisedError {
    fn from(err: anyhow::Error) -> Self {
        Self::Native(err.into())
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for RaisedError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self::Native(err)
    }
}

impl From<std::io::Error> for RaisedError {
    fn from(err: std::io::Error) -> Self {
        Self::Native(Box::new(err))
    }
}

impl From<crate::error::FaultError> for RaisedError {
    fn from(err: crate::error::FaultError) -> Self {
        Self::Native(Box::new(err))
    }
}
