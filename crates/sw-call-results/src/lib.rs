//! # Steamworks Call-Result Bridge
//!
//! Turns "start an asynchronous native call, learn the outcome much later"
//! into a cooperative polling protocol.
//!
//! ## Purpose
//!
//! The native library reports completion of asynchronous calls only when it
//! is asked. A single driver task:
//! - invokes the library's callback-processing entry point once per tick
//! - asks, per pending call handle, whether its result is ready or failed
//! - decodes ready buffers and runs exactly one continuation per request
//! - suspends completely while nothing is pending
//!
//! ## Guarantees
//!
//! | Property | How |
//! |----------|-----|
//! | Exactly-once delivery | continuations are `FnOnce`, consumed on removal |
//! | Strict timeouts | a request times out on the first tick where elapsed > timeout |
//! | Non-reentrant deferral | live and staged lists, merged only at tick start |
//! | Fault containment | each continuation runs behind its own panic boundary |
//! | No busy polling | idle driver waits on the channel, not the interval |
//!
//! ## Module Structure
//!
//! ```text
//! sw-call-results/
//! ├── domain/          # PendingRequest, records, errors, stats
//! ├── algorithms/      # layout tables, decoder, deferred queue, polling decision
//! ├── ports/           # CallResultApi (inbound) + NativeCallbacks (outbound)
//! ├── application/     # driver task, BridgeHandle, SharedBridge
//! └── config.rs        # BridgeConfig
//! ```

#![warn(clippy::all)]

pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use algorithms::{
    native_layout, LayoutTable, PointerWidth, ResultDecoder, TargetOs, TargetPlatform, PACK_LARGE,
    PACK_SMALL,
};
pub use application::{BridgeHandle, CallResultBridge, SharedBridge};
pub use config::BridgeConfig;
pub use domain::{
    BridgeError, BridgeStats, CallResultError, CallResultRecord, CallbackId, DeferredCallback,
    LeaderboardEntry, LeaderboardFindResult, LeaderboardScoreUploaded, LeaderboardScoresDownloaded,
    PendingRequest, RecordKind, StatsSnapshot, TimeoutInfo,
};
pub use ports::{CallResultApi, MockEvent, MockNativeCallbacks, NativeCallbacks, NativePoll};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
