use std::sync::Arc;
use sw_types::{InputHandle, SteamInputType, UnknownEnumValue};

use super::{acquire, RawInterface};
use crate::errors::NativeError;
use crate::ffi::STEAM_INPUT_MAX_COUNT;
use crate::loader::SteamApi;

/// `ISteamInput`
#[derive(Debug, Clone)]
pub struct Input {
    api: Arc<SteamApi>,
    this: RawInterface,
}

impl Input {
    pub(crate) fn new(api: Arc<SteamApi>) -> Result<Self, NativeError> {
        let this = acquire(api.steam_input, "ISteamInput")?;
        Ok(Self { api, this })
    }

    /// Start the input subsystem. With `explicitly_call_run_frame` the caller
    /// must call [`Input::run_frame`] itself; otherwise `run_callbacks` does.
    pub fn init(&self, explicitly_call_run_frame: bool) -> bool {
        // SAFETY: plain value arguments.
        unsafe { (self.api.input_init)(self.this.as_ptr(), explicitly_call_run_frame) }
    }

    pub fn run_frame(&self) {
        // SAFETY: the reserved argument must be false.
        unsafe { (self.api.input_run_frame)(self.this.as_ptr(), false) }
    }

    /// Handles of every connected controller, at most 16.
    pub fn connected_controllers(&self) -> Vec<InputHandle> {
        let mut handles = [0u64; STEAM_INPUT_MAX_COUNT];

        // SAFETY: the library writes at most STEAM_INPUT_MAX_COUNT handles.
        let count = unsafe {
            (self.api.input_get_connected_controllers)(self.this.as_ptr(), handles.as_mut_ptr())
        };

        let count = usize::try_from(count).unwrap_or(0).min(STEAM_INPUT_MAX_COUNT);
        handles[..count].iter().copied().map(InputHandle).collect()
    }

    /// Controller family of `handle`. Values newer than this binding are
    /// reported as an error carrying the raw value.
    pub fn input_type_for_handle(
        &self,
        handle: InputHandle,
    ) -> Result<SteamInputType, UnknownEnumValue> {
        // SAFETY: plain value arguments.
        let raw = unsafe { (self.api.input_get_input_type_for_handle)(self.this.as_ptr(), handle.raw()) };
        SteamInputType::try_from(raw)
    }
}
