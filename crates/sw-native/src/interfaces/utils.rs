use std::ffi::c_void;
use std::sync::Arc;
use sw_call_results::{CallbackId, NativePoll};
use sw_types::{FloatingGamepadTextInputMode, SteamApiCall};

use super::{acquire, RawInterface};
use crate::errors::NativeError;
use crate::ffi::WarningMessageHook_t;
use crate::loader::SteamApi;
use crate::marshal::{aligned_buffer, aligned_bytes};

/// `ISteamUtils`
#[derive(Debug, Clone)]
pub struct Utils {
    api: Arc<SteamApi>,
    this: RawInterface,
}

impl Utils {
    pub(crate) fn new(api: Arc<SteamApi>) -> Result<Self, NativeError> {
        let this = acquire(api.steam_utils, "ISteamUtils")?;
        Ok(Self { api, this })
    }

    pub fn is_overlay_enabled(&self) -> bool {
        // SAFETY: no arguments besides the interface.
        unsafe { (self.api.utils_is_overlay_enabled)(self.this.as_ptr()) }
    }

    pub fn is_steam_running_on_steam_deck(&self) -> bool {
        // SAFETY: no arguments besides the interface.
        unsafe { (self.api.utils_is_steam_running_on_steam_deck)(self.this.as_ptr()) }
    }

    /// Show the on-screen keyboard over the given text field rectangle.
    pub fn show_floating_gamepad_text_input(
        &self,
        mode: FloatingGamepadTextInputMode,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> bool {
        // SAFETY: plain value arguments.
        unsafe {
            (self.api.utils_show_floating_gamepad_text_input)(
                self.this.as_ptr(),
                mode.raw(),
                x,
                y,
                width,
                height,
            )
        }
    }

    /// Poll one asynchronous call.
    ///
    /// `Pending` while the call is still running; otherwise the first
    /// `record_size` bytes the library wrote plus its failure flag.
    pub fn api_call_result(
        &self,
        call: SteamApiCall,
        callback_id: CallbackId,
        record_size: usize,
    ) -> NativePoll {
        let mut raw = aligned_buffer(record_size);
        let mut failed = false;

        // SAFETY: `raw` is at least `record_size` bytes and 8-byte aligned.
        let completed = unsafe {
            (self.api.utils_get_api_call_result)(
                self.this.as_ptr(),
                call.raw(),
                raw.as_mut_ptr().cast::<c_void>(),
                record_size as i32,
                callback_id.raw(),
                &mut failed,
            )
        };

        if !completed {
            return NativePoll::Pending;
        }
        NativePoll::Completed {
            failed,
            bytes: aligned_bytes(&raw, record_size),
        }
    }

    /// Install (or with `None` remove) the warning message hook.
    pub fn set_warning_message_hook(&self, hook: Option<WarningMessageHook_t>) {
        // SAFETY: the hook is a plain `extern "C"` function with 'static lifetime.
        unsafe { (self.api.utils_set_warning_message_hook)(self.this.as_ptr(), hook) }
    }
}
