//! `NativeCallbacks` backed by the loaded library.

use std::sync::Arc;
use sw_call_results::{CallbackId, NativeCallbacks, NativePoll};
use sw_types::SteamApiCall;

use crate::errors::NativeError;
use crate::interfaces::Utils;
use crate::loader::SteamApi;

/// Drives the bridge with `SteamAPI_RunCallbacks` and
/// `ISteamUtils::GetAPICallResult`.
#[derive(Debug, Clone)]
pub struct SteamCallbacks {
    api: Arc<SteamApi>,
    utils: Utils,
}

impl SteamCallbacks {
    /// Requires an initialized library, since it grabs `ISteamUtils` up front.
    pub fn new(api: Arc<SteamApi>) -> Result<Self, NativeError> {
        let utils = Utils::new(Arc::clone(&api))?;
        Ok(Self { api, utils })
    }
}

impl NativeCallbacks for SteamCallbacks {
    fn run_callbacks(&self) {
        // SAFETY: the bridge calls this from its driver thread only.
        unsafe { (self.api.run_callbacks)() }
    }

    fn poll_call_result(
        &self,
        call: SteamApiCall,
        callback_id: CallbackId,
        record_size: usize,
    ) -> NativePoll {
        self.utils.api_call_result(call, callback_id, record_size)
    }
}
