//! # Steamworks Native Binding
//!
//! Loads the Steamworks flat C API at runtime and exposes it with Rust types.
//!
//! ## Usage
//!
//! ```no_run
//! use sw_native::{NativeConfig, SteamClient};
//!
//! let client = SteamClient::load(NativeConfig::from_env())?;
//! client.init()?;
//! println!("Hello, {}", client.friends()?.persona_name());
//!
//! client.leaderboards()?.find_leaderboard("Feet Traveled", |result| {
//!     println!("lookup finished: {result:?}");
//! })?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! sw-native/
//! ├── ffi.rs           # export names and function-pointer shapes
//! ├── loader.rs        # library lookup + eager symbol table (SteamApi)
//! ├── marshal.rs       # C string and buffer conversion
//! ├── interfaces/      # Apps, Friends, Input, RemoteStorage, User, UserStats, Utils
//! ├── adapters/        # SteamCallbacks: NativeCallbacks over the loaded library
//! ├── leaderboards.rs  # find / download / upload through the call-result bridge
//! ├── warnings.rs      # native warning hook -> tracing
//! └── client.rs        # SteamClient lifecycle
//! ```

#![warn(clippy::all)]

pub mod adapters;
pub mod client;
pub mod config;
pub mod errors;
pub mod ffi;
pub mod interfaces;
pub mod leaderboards;
pub mod loader;
pub mod marshal;
pub mod warnings;

// Re-exports
pub use adapters::SteamCallbacks;
pub use client::SteamClient;
pub use config::NativeConfig;
pub use errors::{LeaderboardError, NativeError};
pub use interfaces::{Apps, DlcData, Friends, Input, RemoteStorage, User, UserStats, Utils};
pub use leaderboards::{DownloadedEntry, LeaderboardNative, Leaderboards};
pub use loader::{library_file_name, locate_library, SteamApi};
pub use warnings::{clear_warning_hook, set_warning_hook, WarningHook};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
