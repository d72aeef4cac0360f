//! # Domain Errors
//!
//! Error types for the call-result bridge.

use thiserror::Error;

/// Error delivered to a success continuation instead of a result.
///
/// Timeouts are not errors; they go to the timeout continuation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallResultError {
    /// The native library completed the call but flagged it as failed.
    #[error("Native library reported the call as failed")]
    NativeFailure,

    /// The raw buffer is shorter than the record's fixed size.
    #[error("Buffer too short for {kind}: expected {expected} bytes, got {actual}")]
    BufferTooShort {
        /// Record being decoded
        kind: &'static str,
        /// Fixed size of the record on this platform
        expected: usize,
        /// Bytes actually available
        actual: usize,
    },

    /// No record variant exists for this callback discriminator.
    #[error("Unknown callback discriminator: {0}")]
    UnknownCallback(i32),

    /// A record of a different variant than the caller asked for.
    #[error("Unexpected record: expected {expected}, got {actual}")]
    UnexpectedRecord {
        /// Variant the caller expected
        expected: &'static str,
        /// Variant actually decoded
        actual: &'static str,
    },
}

/// Errors raised when starting a bridge or handing work to it.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The bridge has been closed or its driver has stopped.
    #[error("Call-result bridge is closed")]
    Closed,

    /// The driver could not be started.
    #[error("Failed to start bridge driver: {0}")]
    Runtime(String),

    /// Configuration values that the driver cannot run with.
    #[error("Invalid bridge configuration: {0}")]
    InvalidConfig(String),
}
