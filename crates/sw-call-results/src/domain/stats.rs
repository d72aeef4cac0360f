//! Lock-free bridge counters, readable from any handle.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics for a call-result bridge
#[derive(Debug, Default)]
pub struct BridgeStats {
    /// Requests accepted into the pending set
    pub submitted: AtomicU64,
    /// Requests delivered to their success continuation with bytes
    pub completed: AtomicU64,
    /// Requests delivered to their success continuation with an error
    pub failed: AtomicU64,
    /// Requests delivered to their timeout continuation
    pub timed_out: AtomicU64,
    /// Driver ticks executed
    pub ticks: AtomicU64,
    /// Per-handle readiness checks made against the native library
    pub native_polls: AtomicU64,
    /// Continuations and deferred callbacks that panicked
    pub continuation_panics: AtomicU64,
    /// Requests currently pending
    pub pending: AtomicU64,
}

impl BridgeStats {
    /// Point-in-time copy of every counter.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            submitted: self.submitted.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            timed_out: self.timed_out.load(Ordering::Relaxed),
            ticks: self.ticks.load(Ordering::Relaxed),
            native_polls: self.native_polls.load(Ordering::Relaxed),
            continuation_panics: self.continuation_panics.load(Ordering::Relaxed),
            pending: self.pending.load(Ordering::Relaxed),
        }
    }
}

/// Plain copy of [`BridgeStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub submitted: u64,
    pub completed: u64,
    pub failed: u64,
    pub timed_out: u64,
    pub ticks: u64,
    pub native_polls: u64,
    pub continuation_panics: u64,
    pub pending: u64,
}

impl StatsSnapshot {
    /// Requests that received any outcome.
    pub fn resolved(&self) -> u64 {
        self.completed + self.failed + self.timed_out
    }
}
