//! # Native Binding Errors

use std::path::PathBuf;
use std::time::Duration;
use sw_call_results::{BridgeError, CallResultError};
use thiserror::Error;

/// Fatal errors raised while loading or initializing the native library.
#[derive(Debug, Error)]
pub enum NativeError {
    /// No library file at any of the searched locations.
    #[error("Steamworks library not found; searched {searched:?}")]
    LibraryNotFound {
        /// Every path that was tried
        searched: Vec<PathBuf>,
    },

    /// The file exists but the system loader rejected it.
    #[error("Failed to load {path}: {source}")]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    /// A required export is missing (usually an SDK version mismatch).
    #[error("Missing symbol `{symbol}`: {source}")]
    MissingSymbol {
        symbol: &'static str,
        #[source]
        source: libloading::Error,
    },

    /// `SteamAPI_InitFlat` returned something other than OK.
    #[error("SteamAPI_InitFlat failed with result {result}: {message}")]
    InitFailed {
        /// Raw `ESteamAPIInitResult`
        result: i32,
        /// Text the native library wrote into the error buffer
        message: String,
    },

    /// An interface accessor returned null (library not initialized).
    #[error("Interface {0} is unavailable; was the library initialized?")]
    InterfaceUnavailable(&'static str),

    /// A string argument contains an interior NUL byte.
    #[error("String argument contains an interior NUL byte at {position}")]
    InteriorNul {
        /// Byte offset of the NUL
        position: usize,
    },

    /// The call-result bridge could not be started.
    #[error("Call-result bridge unavailable: {0}")]
    Bridge(#[from] BridgeError),
}

impl From<std::ffi::NulError> for NativeError {
    fn from(err: std::ffi::NulError) -> Self {
        NativeError::InteriorNul {
            position: err.nul_position(),
        }
    }
}

/// Outcome errors of the asynchronous leaderboard wrappers.
#[derive(Debug, Error)]
pub enum LeaderboardError {
    /// The native library returned an invalid call handle.
    #[error("Native library refused to start the call")]
    NotStarted,

    /// The lookup completed but no leaderboard has that name.
    #[error("Leaderboard not found: {0}")]
    NotFound(String),

    /// The call result was a native failure or did not decode.
    #[error("Leaderboard call failed: {0}")]
    CallFailed(#[from] CallResultError),

    /// The upload completed but the native library did not accept the score.
    #[error("Score upload was rejected")]
    Rejected,

    /// A downloaded entry could not be read back.
    #[error("Downloaded entry {0} is unavailable")]
    EntryUnavailable(i32),

    /// No result arrived in time.
    #[error("Leaderboard call timed out after {elapsed:?}")]
    TimedOut { elapsed: Duration },

    /// More detail values than the native library stores.
    #[error("Too many score details: {count} > {max}")]
    TooManyDetails { count: usize, max: usize },

    /// The request could not be handed to the bridge.
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// An argument could not be marshalled.
    #[error(transparent)]
    Native(#[from] NativeError),
}
