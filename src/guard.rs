//! Panic containment for regions the pipeline promises to swallow.
//!
//! The std panic hook runs before `catch_unwind` regains control, so a hook
//! installed by [`install_panic_hook`](crate::hooks::install_panic_hook) would
//! otherwise see panics from reporters and `Display` impls as uncaught. Internal
//! regions run through [`contain`], and the hook skips any panic raised while
//! [`is_containing`] holds on the panicking thread.

use std::cell::Cell;
use std::panic::{catch_unwind, AssertUnwindSafe};

thread_local! {
    static DEPTH: Cell<u32> = const { Cell::new(0) };
}

/// Restores the depth even if the payload's drop panics.
struct DepthGuard;

impl DepthGuard {
    fn enter() -> Self {
        DEPTH.with(|depth| depth.set(depth.get() + 1));
        DepthGuard
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Run `f`, catching any panic it raises as an internally handled one.
pub(crate) fn contain<R>(f: impl FnOnce() -> R) -> std::thread::Result<R> {
    let _guard = DepthGuard::enter();
    catch_unwind(AssertUnwindSafe(f))
}

/// True while the current thread is inside [`contain`].
pub(crate) fn is_containing() -> bool {
    DEPTH.with(|depth| depth.get() > 0)
}
