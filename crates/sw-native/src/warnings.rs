//! # Warning Hook
//!
//! Routes the native library's warning messages into `tracing`, plus an
//! optional application hook. The native side calls a plain `extern "C"`
//! function, so the application hook lives in a process-wide slot.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::ffi::{c_char, c_int};
use sw_call_results::algorithms::run_contained;
use tracing::{info, warn};

use crate::marshal::c_ptr_to_string;

/// Application callback for native warnings: `(severity, message)`.
pub type WarningHook = Box<dyn Fn(i32, &str) + Send + Sync + 'static>;

static USER_HOOK: Lazy<RwLock<Option<WarningHook>>> = Lazy::new(|| RwLock::new(None));

/// Install `hook` to also receive native warnings, replacing any previous one.
pub fn set_warning_hook(hook: WarningHook) {
    *USER_HOOK.write() = Some(hook);
}

/// Remove the application hook. Warnings are still logged.
pub fn clear_warning_hook() {
    *USER_HOOK.write() = None;
}

/// Log one message and forward it to the application hook.
///
/// Severity 0 is informational, anything higher is a warning.
pub fn dispatch_warning(severity: i32, message: &str) {
    if severity <= 0 {
        info!(severity, text = message, "Steamworks message");
    } else {
        warn!(severity, text = message, "Steamworks warning");
    }

    let hook = USER_HOOK.read();
    if let Some(hook) = hook.as_ref() {
        if let Err(panic) = run_contained(|| hook(severity, message)) {
            warn!(%panic, "Warning hook panicked");
        }
    }
}

/// Passed to `ISteamUtils::SetWarningMessageHook`.
pub(crate) unsafe extern "C" fn warning_trampoline(severity: c_int, text: *const c_char) {
    let message = c_ptr_to_string(text).unwrap_or_default();
    dispatch_warning(severity, &message);
}
