use std::ffi::c_char;
use std::sync::Arc;
use sw_types::AppId;

use super::{acquire, RawInterface};
use crate::errors::NativeError;
use crate::ffi::STRING_BUFFER_LEN;
use crate::loader::SteamApi;
use crate::marshal::{c_chars_to_string, c_ptr_to_string};

/// One DLC as reported by `BGetDLCDataByIndex`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DlcData {
    pub app_id: AppId,
    pub available: bool,
    pub name: String,
}

/// `ISteamApps`
#[derive(Debug, Clone)]
pub struct Apps {
    api: Arc<SteamApi>,
    this: RawInterface,
}

impl Apps {
    pub(crate) fn new(api: Arc<SteamApi>) -> Result<Self, NativeError> {
        let this = acquire(api.steam_apps, "ISteamApps")?;
        Ok(Self { api, this })
    }

    /// DLC metadata by index in `0..dlc_count()`. `None` if the index is out of range.
    pub fn dlc_data_by_index(&self, index: i32) -> Option<DlcData> {
        let mut app_id = 0u32;
        let mut available = false;
        let mut name = vec![0 as c_char; STRING_BUFFER_LEN];

        // SAFETY: every out pointer refers to live local storage and the name
        // length matches the buffer.
        let ok = unsafe {
            (self.api.apps_get_dlc_data_by_index)(
                self.this.as_ptr(),
                index,
                &mut app_id,
                &mut available,
                name.as_mut_ptr(),
                name.len() as i32,
            )
        };

        ok.then(|| DlcData {
            app_id: AppId(app_id),
            available,
            name: c_chars_to_string(&name),
        })
    }

    pub fn is_dlc_installed(&self, app_id: AppId) -> bool {
        // SAFETY: plain value arguments.
        unsafe { (self.api.apps_is_dlc_installed)(self.this.as_ptr(), app_id.raw()) }
    }

    /// Install folder of `app_id`, or an empty string if it is not installed.
    pub fn app_install_dir(&self, app_id: AppId) -> String {
        let mut folder = vec![0 as c_char; STRING_BUFFER_LEN];

        // SAFETY: the length passed matches the buffer.
        let written = unsafe {
            (self.api.apps_get_app_install_dir)(
                self.this.as_ptr(),
                app_id.raw(),
                folder.as_mut_ptr(),
                folder.len() as u32,
            )
        };

        if written == 0 {
            return String::new();
        }
        c_chars_to_string(&folder)
    }

    pub fn current_game_language(&self) -> String {
        // SAFETY: the returned string is owned by the library and copied
        // before any further call.
        unsafe {
            c_ptr_to_string((self.api.apps_get_current_game_language)(self.this.as_ptr()))
                .unwrap_or_default()
        }
    }

    pub fn dlc_count(&self) -> i32 {
        // SAFETY: no arguments besides the interface.
        unsafe { (self.api.apps_get_dlc_count)(self.this.as_ptr()) }
    }
}
