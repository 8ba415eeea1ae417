//! Process-level wiring for the error manager.
//!
//! - panics reach [`ErrorManager::handle_uncaught_exception`] through a panic hook
//! - failed or panicked background tasks reach
//!   [`ErrorManager::handle_unhandled_rejection`] through [`spawn_supervised`]
//! - process termination goes through a [`ProcessTerminator`] so embedders can
//!   replace it

use crate::config::ErrorHandlingConfig;
use crate::core_types::RaisedError;
use crate::guard;
use crate::logging::log_debug;
use crate::manager::{ErrorHandler, ErrorManager, RejectionOrigin};
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Ends the process. Implementations must not return.
pub trait ProcessTerminator: Send + Sync {
    fn terminate(&self, code: i32) -> !;
}

/// Terminator backed by [`std::process::exit`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExit;

impl ProcessTerminator for ProcessExit {
    fn terminate(&self, code: i32) -> ! {
        log_debug!(exit_code = code, "Terminating process");
        std::process::exit(code)
    }
}

/// Build the default handler and install the panic hook.
///
/// Call [`init_logging`](crate::logging::init_logging) first if log output should
/// reach the console.
pub fn init_error_handling(config: ErrorHandlingConfig) -> Arc<ErrorHandler> {
    install_error_handler(ErrorHandler::new(config))
}

/// Install the panic hook for an already configured handler.
pub fn install_error_handler(handler: ErrorHandler) -> Arc<ErrorHandler> {
    log_debug!("Initializing error handling system");
    let handler = Arc::new(handler);
    install_panic_hook(Arc::clone(&handler));
    handler
}

/// Replace the process panic hook with one that routes through `handler`.
///
/// The panic location and thread name travel as context. When
/// `exit_on_uncaught_panic` is set the process is terminated afterwards;
/// otherwise unwinding continues normally.
///
/// Panics the pipeline contains itself (a panicking reporter or `Display` impl)
/// are neither routed nor allowed to terminate.
pub fn install_panic_hook(handler: Arc<ErrorHandler>) {
    std::panic::set_hook(Box::new(move |info| {
        if guard::is_containing() {
            log_debug!(panic = %info, "Contained panic inside error pipeline");
            return;
        }

        let error = RaisedError::from_panic_payload(info.payload());
        let thread = std::thread::current();
        let context = serde_json::json!({
            "location": info.location().map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column())),
            "thread": thread.name(),
        });
        handler.handle_uncaught_with_context(&error, Some(context));

        if handler.config().exit_on_uncaught_panic {
            handler.terminate();
        }
    }));
}

/// Restore the standard library's default panic hook.
pub fn remove_panic_hook() {
    drop(std::panic::take_hook());
}

/// Spawn a task whose failure is routed to the manager instead of being lost.
///
/// An `Err` output or a panic becomes an unhandled rejection tagged with `label`.
/// The returned handle yields `Some(value)` on success and `None` otherwise.
///
/// Must be called from within a tokio runtime.
pub fn spawn_supervised<F, T, E>(
    manager: Arc<dyn ErrorManager>,
    label: impl Into<String>,
    future: F,
) -> JoinHandle<Option<T>>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Into<RaisedError> + Send + 'static,
{
    let origin = RejectionOrigin::new(label).with_task_id(Uuid::new_v4());
    tokio::spawn(async move {
        match tokio::spawn(future).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                manager.handle_unhandled_rejection(&e.into(), &origin);
                None
            }
            Err(join_error) => {
                let reason = if join_error.is_panic() {
                    RaisedError::from_panic_payload(&*join_error.into_panic())
                } else {
                    RaisedError::from("task was cancelled before completing")
                };
                manager.handle_unhandled_rejection(&reason, &origin);
                None
            }
        }
    })
}
