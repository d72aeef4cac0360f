use std::sync::Arc;
use sw_types::SteamId;

use super::{acquire, RawInterface};
use crate::errors::NativeError;
use crate::loader::SteamApi;

/// `ISteamUser`
#[derive(Debug, Clone)]
pub struct User {
    api: Arc<SteamApi>,
    this: RawInterface,
}

impl User {
    pub(crate) fn new(api: Arc<SteamApi>) -> Result<Self, NativeError> {
        let this = acquire(api.steam_user, "ISteamUser")?;
        Ok(Self { api, this })
    }

    pub fn steam_id(&self) -> SteamId {
        // SAFETY: no arguments besides the interface.
        SteamId(unsafe { (self.api.user_get_steam_id)(self.this.as_ptr()) })
    }
}
