use std::sync::Arc;

use super::{acquire, RawInterface};
use crate::errors::NativeError;
use crate::loader::SteamApi;
use crate::marshal::{c_ptr_to_string, to_cstring};

/// `ISteamFriends`
#[derive(Debug, Clone)]
pub struct Friends {
    api: Arc<SteamApi>,
    this: RawInterface,
}

impl Friends {
    pub(crate) fn new(api: Arc<SteamApi>) -> Result<Self, NativeError> {
        let this = acquire(api.steam_friends, "ISteamFriends")?;
        Ok(Self { api, this })
    }

    /// Display name of the current user.
    pub fn persona_name(&self) -> String {
        // SAFETY: library-owned string, copied immediately.
        unsafe {
            c_ptr_to_string((self.api.friends_get_persona_name)(self.this.as_ptr()))
                .unwrap_or_default()
        }
    }

    /// Set a rich presence key. An empty `value` clears the key.
    pub fn set_rich_presence(&self, key: &str, value: &str) -> Result<bool, NativeError> {
        let key = to_cstring(key)?;
        let value = to_cstring(value)?;
        // SAFETY: both strings outlive the call.
        Ok(unsafe {
            (self.api.friends_set_rich_presence)(self.this.as_ptr(), key.as_ptr(), value.as_ptr())
        })
    }
}
