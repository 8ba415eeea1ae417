//! Explicitly constructed application context.
//!
//! Owns the error handler and the AI and auth lifecycle holders, so nothing depends
//! on process-wide mutable singletons. Lifecycle: `create -> ready -> dispose`.

use crate::ai::{AiConnection, AiModule};
use crate::auth::AuthManager;
use crate::config::ErrorHandlingConfig;
use crate::core_types::{ErrorCategory, RaisedError, UserError};
use crate::error::{FaultError, FaultResult};
use crate::logging::log_debug;
use crate::manager::{ErrorHandler, ErrorManager, ErrorOptions};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Created,
    Ready,
    Disposed,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Created => "created",
            Self::Ready => "ready",
            Self::Disposed => "disposed",
        })
    }
}

#[derive(Debug)]
pub struct AppContext {
    errors: Arc<ErrorHandler>,
    ai: AiModule,
    auth: AuthManager,
    state: LifecycleState,
}

impl AppContext {
    /// Build a context with a default handler. No process hooks are installed.
    pub fn create(config: ErrorHandlingConfig) -> Self {
        Self::with_handler(Arc::new(ErrorHandler::new(config)))
    }

    /// Build a context around an existing handler, e.g. one returned by
    /// [`init_error_handling`](crate::hooks::init_error_handling).
    pub fn with_handler(errors: Arc<ErrorHandler>) -> Self {
        Self {
            errors,
            ai: AiModule::new(),
            auth: AuthManager::new(),
            state: LifecycleState::Created,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn ready(&mut self) -> FaultResult<()> {
        if self.state != LifecycleState::Created {
            return Err(FaultError::invalid_transition(self.state, LifecycleState::Ready));
        }
        self.state = LifecycleState::Ready;
        log_debug!("Application context ready");
        Ok(())
    }

    /// Release held clients. Idempotent.
    pub fn dispose(&mut self) {
        if self.state == LifecycleState::Disposed {
            return;
        }
        self.ai.dispose();
        self.auth.logout();
        self.state = LifecycleState::Disposed;
        log_debug!("Application context disposed");
    }

    pub fn errors(&self) -> &Arc<ErrorHandler> {
        &self.errors
    }

    /// Route a failure through the context's error handler.
    pub fn handle(&self, error: &RaisedError, options: ErrorOptions) {
        self.errors.handle_error(error, options);
    }

    /// Initialize the AI module. Only allowed once the context is ready.
    ///
    /// # Errors
    ///
    /// Returns a user error if the context is not ready or the connection test fails.
    pub async fn init_ai(&mut self, client: Arc<dyn AiConnection>) -> Result<Arc<dyn AiConnection>, UserError> {
        self.require_ready()?;
        self.ai.init(client).await
    }

    pub fn ai_client(&self) -> Result<Arc<dyn AiConnection>, UserError> {
        self.require_ready()?;
        self.ai.client()
    }

    pub fn is_ai_initialized(&self) -> bool {
        self.state == LifecycleState::Ready && self.ai.is_initialized()
    }

    pub fn auth(&self) -> Result<&AuthManager, UserError> {
        self.require_ready()?;
        Ok(&self.auth)
    }

    pub fn auth_mut(&mut self) -> Result<&mut AuthManager, UserError> {
        self.require_ready()?;
        Ok(&mut self.auth)
    }

    fn require_ready(&self) -> Result<(), UserError> {
        match self.state {
            LifecycleState::Ready => Ok(()),
            LifecycleState::Created => Err(UserError::new("Application context is not ready")
                .with_category(ErrorCategory::Initialization)
                .with_resolution("Call ready() on the context before using its services.")),
            LifecycleState::Disposed => Err(UserError::new("Application context has been disposed")
                .with_category(ErrorCategory::Initialization)
                .with_resolution("Create a new context to continue.")),
        }
    }
}
