//! Exit hook for the instrumented entry point
//!
//! The instrumenter declares one `ExitHook` next to `main` and splices
//! `let _funccover_exit_guard = HOOK.guard();` at the top of its body. The
//! guard's `Drop` fires the hook when `main` returns, whichever path it takes
//! (return, `?`, unwinding panic). Nothing fires on `process::exit`, aborts or
//! signals.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

/// Replaceable zero-argument callback, fired at most once
#[derive(Debug)]
pub struct ExitHook {
    callback: RwLock<fn()>,
    fired: AtomicBool,
}

impl ExitHook {
    /// Create a hook pointing at `callback`
    #[must_use]
    pub const fn new(callback: fn()) -> Self {
        Self {
            callback: RwLock::new(callback),
            fired: AtomicBool::new(false),
        }
    }

    /// Point the hook at a new callback, returning the previous one
    pub fn replace(&self, callback: fn()) -> fn() {
        let mut current = self
            .callback
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, callback)
    }

    /// The callback the hook currently points at
    #[must_use]
    pub fn callback(&self) -> fn() {
        *self.callback.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fire the current callback unless the hook already fired
    ///
    /// Returns `true` if this call ran the callback.
    pub fn invoke(&self) -> bool {
        if self.fired.swap(true, Ordering::AcqRel) {
            return false;
        }
        // Copy out first so the callback may call `replace` itself.
        let callback = self.callback();
        callback();
        true
    }

    /// Whether the hook has fired
    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    /// Scoped guard that fires the hook when dropped
    pub fn guard(&self) -> ExitGuard<'_> {
        ExitGuard { hook: self }
    }
}

/// Fires its [`ExitHook`] on drop
#[derive(Debug)]
#[must_use = "the exit hook fires as soon as the guard is dropped"]
pub struct ExitGuard<'a> {
    hook: &'a ExitHook,
}

impl Drop for ExitGuard<'_> {
    fn drop(&mut self) {
        let _ = self.hook.invoke();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn noop() {}

    #[test]
    fn test_new_hook_has_not_fired() {
        let hook = ExitHook::new(noop);
        assert!(!hook.has_fired());
    }

    #[test]
    fn test_invoke_runs_callback_once() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        fn count() {
            CALLS.fetch_add(1, Ordering::SeqCst);
        }

        let hook = ExitHook::new(count);
        assert!(hook.invoke());
        assert!(!hook.invoke());
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
        assert!(hook.has_fired());
    }

    #[test]
    fn test_replace_returns_previous_callback() {
        fn other() {}
        let hook = ExitHook::new(noop);
        let previous = hook.replace(other);
        assert_eq!(previous as usize, noop as fn() as usize);
        assert_eq!(hook.callback() as usize, other as fn() as usize);
    }

    #[test]
    fn test_guard_fires_on_drop() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        fn count() {
            CALLS.fetch_add(1, Ordering::SeqCst);
        }

        let hook = ExitHook::new(count);
        {
            let _guard = hook.guard();
            assert_eq!(CALLS.load(Ordering::SeqCst), 0);
        }
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }
}
