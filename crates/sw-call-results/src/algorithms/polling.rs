//! # Polling Decision
//!
//! What to do with one pending request on one tick.

use std::time::Duration;
use tokio::time::Instant;

use crate::domain::{invariant_timed_out, CallResultError, PendingRequest, RecordKind, TimeoutInfo};
use crate::ports::{NativeCallbacks, NativePoll};

/// Outcome of checking one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollDecision {
    /// Keep it for the next tick.
    Waiting,
    /// Remove it and run the timeout continuation.
    TimedOut(TimeoutInfo),
    /// Remove it and run the success continuation.
    Ready(Result<Vec<u8>, CallResultError>),
}

/// Check `request` against its timeout, then against the native library.
///
/// The native library is not asked about a request that has already timed out.
pub fn evaluate(
    request: &PendingRequest,
    now: Instant,
    default_timeout: Duration,
    native: &dyn NativeCallbacks,
) -> PollDecision {
    let elapsed = request.elapsed_at(now);
    let timeout = request.timeout().unwrap_or(default_timeout);

    if invariant_timed_out(elapsed, timeout) {
        return PollDecision::TimedOut(TimeoutInfo {
            submitted_at: request.submitted_at(),
            elapsed,
        });
    }

    match native.poll_call_result(request.call(), request.callback_id(), request.record_size()) {
        NativePoll::Pending => PollDecision::Waiting,
        NativePoll::Completed { failed: true, .. } => {
            PollDecision::Ready(Err(CallResultError::NativeFailure))
        }
        NativePoll::Completed { bytes, .. } if bytes.len() < request.record_size() => {
            let kind = RecordKind::try_from(request.callback_id()).map_or("call result", RecordKind::name);
            PollDecision::Ready(Err(CallResultError::BufferTooShort {
                kind,
                expected: request.record_size(),
                actual: bytes.len(),
            }))
        }
        NativePoll::Completed { bytes, .. } => PollDecision::Ready(Ok(bytes)),
    }
}
