//! Authentication state holder.
//!
//! Credential storage and token refresh belong to the auth layer. This module
//! tracks where in the authentication lifecycle the process is, and explains in a
//! [`UserError`] why an operation that needs credentials cannot run.

use crate::core_types::{ErrorCategory, UserError};
use crate::error::{FaultError, FaultResult};
use crate::logging::log_debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the user authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthMethod {
    #[serde(rename = "api_key")]
    ApiKey,
    #[serde(rename = "oauth")]
    OAuth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthState {
    #[default]
    Initial,
    Authenticating,
    Authenticated,
    Failed,
    Refreshing,
    Expired,
    Unauthenticated,
}

impl AuthState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Authenticating => "authenticating",
            Self::Authenticated => "authenticated",
            Self::Failed => "failed",
            Self::Refreshing => "refreshing",
            Self::Expired => "expired",
            Self::Unauthenticated => "unauthenticated",
        }
    }

    fn can_transition_to(self, next: AuthState) -> bool {
        use AuthState::*;
        match next {
            Authenticating => matches!(self, Initial | Failed | Expired | Unauthenticated),
            Authenticated | Failed => matches!(self, Authenticating | Refreshing),
            Refreshing => matches!(self, Authenticated | Expired),
            Expired => matches!(self, Authenticated),
            Unauthenticated => true,
            Initial => false,
        }
    }
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks authentication state and the method in use.
#[derive(Debug, Clone, Default)]
pub struct AuthManager {
    state: AuthState,
    method: Option<AuthMethod>,
    last_failure: Option<String>,
}

impl AuthManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn method(&self) -> Option<AuthMethod> {
        self.method
    }

    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == AuthState::Authenticated
    }

    pub fn begin(&mut self, method: AuthMethod) -> FaultResult<()> {
        self.transition(AuthState::Authenticating)?;
        self.method = Some(method);
        self.last_failure = None;
        Ok(())
    }

    pub fn succeed(&mut self) -> FaultResult<()> {
        self.transition(AuthState::Authenticated)
    }

    pub fn fail(&mut self, reason: impl Into<String>) -> FaultResult<()> {
        self.transition(AuthState::Failed)?;
        self.last_failure = Some(reason.into());
        Ok(())
    }

    pub fn expire(&mut self) -> FaultResult<()> {
        self.transition(AuthState::Expired)
    }

    pub fn begin_refresh(&mut self) -> FaultResult<()> {
        self.transition(AuthState::Refreshing)
    }

    /// Forget the current session. Always allowed.
    pub fn logout(&mut self) {
        self.state = AuthState::Unauthenticated;
        self.method = None;
        log_debug!("Authentication state cleared");
    }

    /// The active method, or a user error explaining why there is none.
    pub fn require_authenticated(&self) -> Result<AuthMethod, UserError> {
        match (self.state, self.method) {
            (AuthState::Authenticated, Some(method)) => Ok(method),
            (AuthState::Expired, _) => Err(auth_error(
                "Authentication has expired",
                "Log in again to refresh your credentials.",
            )),
            (AuthState::Failed, _) => {
                let message = match &self.last_failure {
                    Some(reason) => format!("Authentication failed: {reason}"),
                    None => "Authentication failed".to_string(),
                };
                Err(auth_error(
                    &message,
                    "Check your API key or complete the login flow again.",
                ))
            }
            (AuthState::Authenticating | AuthState::Refreshing, _) => Err(auth_error(
                "Authentication is still in progress",
                "Wait for the login to finish, then try again.",
            )),
            _ => Err(auth_error(
                "Not authenticated",
                "Set ANTHROPIC_API_KEY or run the login command before using AI capabilities.",
            )),
        }
    }

    fn transition(&mut self, next: AuthState) -> FaultResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(FaultError::invalid_transition(self.state, next));
        }
        log_debug!(from = %self.state, to = %next, "Authentication state changed");
        self.state = next;
        Ok(())
    }
}

fn auth_error(message: &str, resolution: &str) -> UserError {
    UserError::new(message)
        .with_category(ErrorCategory::Authentication)
        .with_resolution(resolution)
}
