//! Adapters connecting the loaded library to the call-result bridge.

pub mod callbacks;

pub use callbacks::SteamCallbacks;
