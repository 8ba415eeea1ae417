//! AI client lifecycle holder.
//!
//! Transport to the provider lives elsewhere. This module only tracks whether a
//! client has passed its connection test, and turns failures into [`UserError`]s
//! with resolution guidance.

use crate::core_types::{ErrorCategory, UserError};
use crate::logging::{log_debug, log_error, log_info};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// The slice of an AI client this crate needs.
#[async_trait]
pub trait AiConnection: Send + Sync {
    /// `Ok(false)` means the service answered but rejected the connection.
    async fn test_connection(&self) -> anyhow::Result<bool>;

    fn model(&self) -> &str;
}

/// Holds the AI client once it has been initialized.
#[derive(Default)]
pub struct AiModule {
    client: Option<Arc<dyn AiConnection>>,
}

impl fmt::Debug for AiModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiModule")
            .field("model", &self.client.as_ref().map(|c| c.model().to_string()))
            .finish()
    }
}

impl AiModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test `client`'s connection and keep it if the test passes.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorCategory::Initialization`] user error whose cause is either
    /// the connection test's own error or a [`ErrorCategory::Connection`] user error
    /// when the test reported failure. A previously held client is left in place.
    pub async fn init(&mut self, client: Arc<dyn AiConnection>) -> Result<Arc<dyn AiConnection>, UserError> {
        log_info!(model = client.model(), "Initializing AI module");

        match Self::check_connection(client.as_ref()).await {
            Ok(()) => {
                self.client = Some(Arc::clone(&client));
                log_info!("AI module initialized successfully");
                Ok(client)
            }
            Err(cause) => {
                log_error!(error = %cause, "Failed to initialize AI module");
                Err(UserError::new("Failed to initialize AI capabilities")
                    .with_category(ErrorCategory::Initialization)
                    .with_resolution(
                        "Check your authentication and internet connection, then try again.",
                    )
                    .with_cause(cause))
            }
        }
    }

    async fn check_connection(
        client: &dyn AiConnection,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        log_debug!("Testing connection to AI service");
        if client.test_connection().await? {
            Ok(())
        } else {
            Err(Box::new(
                UserError::new("Failed to connect to Claude AI service")
                    .with_category(ErrorCategory::Connection)
                    .with_resolution("Check your internet connection and API key, then try again."),
            ))
        }
    }

    /// The initialized client.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorCategory::Initialization`] user error before a successful
    /// [`init`](Self::init) or after [`dispose`](Self::dispose).
    pub fn client(&self) -> Result<Arc<dyn AiConnection>, UserError> {
        self.client.clone().ok_or_else(|| {
            UserError::new("AI module not initialized")
                .with_category(ErrorCategory::Initialization)
                .with_resolution("Call AiModule::init (or AppContext::init_ai) before using AI capabilities.")
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.client.is_some()
    }

    pub fn dispose(&mut self) {
        if self.client.take().is_some() {
            log_debug!("AI module disposed");
        }
    }
}
