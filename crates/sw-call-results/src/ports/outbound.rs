//! # Outbound Ports
//!
//! What the bridge needs from the native library: exactly two operations.

use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use sw_types::SteamApiCall;

use crate::domain::CallbackId;

/// Readiness of one call handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativePoll {
    /// Not ready yet.
    Pending,
    /// Ready. `bytes` holds the raw record; `failed` is the native failure flag.
    Completed { failed: bool, bytes: Vec<u8> },
}

/// Native callback processing - outbound port.
///
/// Implementations are only ever called from the driver task, one call at a
/// time, so they may forward to a native library that is single-threaded by
/// contract.
pub trait NativeCallbacks: Send + Sync + 'static {
    /// Let the native library advance its internal state. Called once per tick,
    /// before any handle is polled.
    fn run_callbacks(&self);

    /// Ask whether `call`'s result is ready and whether it failed.
    fn poll_call_result(
        &self,
        call: SteamApiCall,
        callback_id: CallbackId,
        record_size: usize,
    ) -> NativePoll;
}

// =============================================================================
// Mock Implementation for Testing
// =============================================================================

/// What the mock observed, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockEvent {
    RunCallbacks,
    Poll(SteamApiCall),
}

/// Scriptable native library.
///
/// Each handle has a queue of poll outcomes; once the queue is empty the
/// handle reports `Pending`.
#[derive(Debug, Default)]
pub struct MockNativeCallbacks {
    scripts: Mutex<HashMap<SteamApiCall, VecDeque<NativePoll>>>,
    events: Mutex<Vec<MockEvent>>,
    run_callbacks_calls: AtomicU64,
    poll_calls: AtomicU64,
}

impl MockNativeCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append outcomes for `call`.
    pub fn script(&self, call: SteamApiCall, outcomes: impl IntoIterator<Item = NativePoll>) {
        self.scripts
            .lock()
            .entry(call)
            .or_default()
            .extend(outcomes);
    }

    /// Report `Pending` for `polls_before` polls, then complete with `bytes`.
    pub fn complete_after(&self, call: SteamApiCall, polls_before: usize, bytes: Vec<u8>) {
        let pending = std::iter::repeat(NativePoll::Pending).take(polls_before);
        let done = std::iter::once(NativePoll::Completed {
            failed: false,
            bytes,
        });
        self.script(call, pending.chain(done));
    }

    /// Report `Pending` for `polls_before` polls, then a native failure.
    pub fn fail_after(&self, call: SteamApiCall, polls_before: usize) {
        let pending = std::iter::repeat(NativePoll::Pending).take(polls_before);
        let failed = std::iter::once(NativePoll::Completed {
            failed: true,
            bytes: Vec::new(),
        });
        self.script(call, pending.chain(failed));
    }

    pub fn run_callbacks_calls(&self) -> u64 {
        self.run_callbacks_calls.load(Ordering::SeqCst)
    }

    pub fn poll_calls(&self) -> u64 {
        self.poll_calls.load(Ordering::SeqCst)
    }

    /// Polls made for one handle.
    pub fn polls_for(&self, call: SteamApiCall) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|event| **event == MockEvent::Poll(call))
            .count()
    }

    pub fn events(&self) -> Vec<MockEvent> {
        self.events.lock().clone()
    }
}

impl NativeCallbacks for MockNativeCallbacks {
    fn run_callbacks(&self) {
        self.run_callbacks_calls.fetch_add(1, Ordering::SeqCst);
        self.events.lock().push(MockEvent::RunCallbacks);
    }

    fn poll_call_result(
        &self,
        call: SteamApiCall,
        _callback_id: CallbackId,
        _record_size: usize,
    ) -> NativePoll {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        self.events.lock().push(MockEvent::Poll(call));
        self.scripts
            .lock()
            .get_mut(&call)
            .and_then(VecDeque::pop_front)
            .unwrap_or(NativePoll::Pending)
    }
}
