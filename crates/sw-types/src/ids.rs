//! # Identifiers and Handles
//!
//! Opaque values returned by the native library. None of them carry meaning
//! on the Rust side beyond identity; they are only ever handed back to the
//! native library.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! native_handle {
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(transparent)]
        pub struct $name(pub $inner);

        impl $name {
            /// Raw value as passed across the C ABI.
            #[must_use]
            pub const fn raw(self) -> $inner {
                self.0
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }
    };
}

native_handle!(
    /// Handle of an in-flight asynchronous native call (`SteamAPICall_t`).
    SteamApiCall(u64)
);

native_handle!(
    /// Application id (`AppId_t`).
    AppId(u32)
);

native_handle!(
    /// 64-bit Steam account id (`CSteamID`).
    SteamId(u64)
);

native_handle!(
    /// Leaderboard handle (`SteamLeaderboard_t`).
    SteamLeaderboard(u64)
);

native_handle!(
    /// Handle to a downloaded batch of leaderboard entries (`SteamLeaderboardEntries_t`).
    SteamLeaderboardEntries(u64)
);

native_handle!(
    /// User-generated content handle (`UGCHandle_t`).
    UgcHandle(u64)
);

native_handle!(
    /// Connected controller handle (`InputHandle_t`).
    InputHandle(u64)
);

impl SteamApiCall {
    /// `k_uAPICallInvalid`: returned when the native library refused to start a call.
    pub const INVALID: SteamApiCall = SteamApiCall(0);

    /// Whether the native library actually started a call.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }
}

impl fmt::Display for SteamApiCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SteamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SteamLeaderboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "leaderboard:{}", self.0)
    }
}
