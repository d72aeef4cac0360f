//! # Typed Interface Wrappers
//!
//! One wrapper per flat-API interface. Each holds the shared function table
//! and the interface pointer its accessor returned, and exposes the methods
//! with Rust types: `&str` in, `String` / `Vec` / newtypes out.
//!
//! Wrappers are cheap to clone. The native library is single-threaded by
//! contract; callers that share a wrapper across threads must serialize
//! calls themselves.

mod apps;
mod friends;
mod input;
mod remote_storage;
mod user;
mod user_stats;
mod utils;

pub use apps::{Apps, DlcData};
pub use friends::Friends;
pub use input::Input;
pub use remote_storage::RemoteStorage;
pub use user::User;
pub use user_stats::UserStats;
pub use utils::Utils;

use crate::errors::NativeError;
use crate::ffi::{InterfaceAccessor_t, InterfacePtr};

/// Interface pointer handed out by a `SteamAPI_SteamXxx_vNNN` accessor.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawInterface(InterfacePtr);

// SAFETY: the pointer is an opaque token owned by the native library; this
// crate never dereferences it.
unsafe impl Send for RawInterface {}
unsafe impl Sync for RawInterface {}

impl RawInterface {
    pub(crate) fn as_ptr(self) -> InterfacePtr {
        self.0
    }
}

/// Call an accessor, rejecting a null interface.
pub(crate) fn acquire(
    accessor: InterfaceAccessor_t,
    name: &'static str,
) -> Result<RawInterface, NativeError> {
    // SAFETY: accessors take no arguments and only read library state.
    let ptr = unsafe { accessor() };
    if ptr.is_null() {
        return Err(NativeError::InterfaceUnavailable(name));
    }
    Ok(RawInterface(ptr))
}
