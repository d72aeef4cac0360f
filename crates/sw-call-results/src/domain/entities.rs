//! # Domain Entities
//!
//! Pending requests, deferred callbacks and the decoded record family.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use sw_types::{SteamApiCall, SteamId, SteamLeaderboard, SteamLeaderboardEntries, UgcHandle};
use tokio::time::Instant;

use super::errors::CallResultError;
use super::value_objects::{CallbackId, RecordKind, TimeoutInfo};

// =============================================================================
// CONTINUATIONS
// =============================================================================

/// Continuation run when a call result is ready (or failed).
pub type CompletionFn = Box<dyn FnOnce(Result<Vec<u8>, CallResultError>) + Send + 'static>;

/// Continuation run when a call result did not arrive in time.
pub type TimeoutFn = Box<dyn FnOnce(TimeoutInfo) + Send + 'static>;

/// One tick of generic callback processing.
///
/// Returns `true` once it is finished and may be discarded.
pub type DeferredCallback = Box<dyn FnMut() -> bool + Send + 'static>;

// =============================================================================
// PENDING REQUEST
// =============================================================================

/// One outstanding asynchronous native call awaiting completion.
///
/// Both continuations are consumed by value, so at most one of them can ever
/// run, and only once.
pub struct PendingRequest {
    call: SteamApiCall,
    callback_id: CallbackId,
    record_size: usize,
    timeout: Option<Duration>,
    submitted_at: Instant,
    on_complete: CompletionFn,
    on_timeout: TimeoutFn,
}

impl PendingRequest {
    /// Create a request for `call`, stamped with the current time. The stamp
    /// is renewed when the request is handed to a bridge.
    ///
    /// `record_size` is the number of bytes the native library will write for
    /// a record tagged `callback_id`.
    pub fn new<C, T>(
        call: SteamApiCall,
        callback_id: CallbackId,
        record_size: usize,
        on_complete: C,
        on_timeout: T,
    ) -> Self
    where
        C: FnOnce(Result<Vec<u8>, CallResultError>) + Send + 'static,
        T: FnOnce(TimeoutInfo) + Send + 'static,
    {
        Self {
            call,
            callback_id,
            record_size,
            timeout: None,
            submitted_at: Instant::now(),
            on_complete: Box::new(on_complete),
            on_timeout: Box::new(on_timeout),
        }
    }

    /// Override the bridge's default timeout for this request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Native call handle.
    pub fn call(&self) -> SteamApiCall {
        self.call
    }

    /// Expected record discriminator.
    pub fn callback_id(&self) -> CallbackId {
        self.callback_id
    }

    /// Size of the raw record in bytes.
    pub fn record_size(&self) -> usize {
        self.record_size
    }

    /// Per-request timeout override, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Submission timestamp.
    pub fn submitted_at(&self) -> Instant {
        self.submitted_at
    }

    /// Restart the timeout clock at the moment of submission.
    pub(crate) fn mark_submitted(&mut self) {
        self.submitted_at = Instant::now();
    }

    /// Time spent pending as of `now`.
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.submitted_at)
    }

    /// Run the success continuation.
    pub fn complete(self, result: Result<Vec<u8>, CallResultError>) {
        (self.on_complete)(result)
    }

    /// Run the timeout continuation.
    pub fn expire(self, info: TimeoutInfo) {
        (self.on_timeout)(info)
    }
}

impl fmt::Debug for PendingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRequest")
            .field("call", &self.call)
            .field("callback_id", &self.callback_id)
            .field("record_size", &self.record_size)
            .field("timeout", &self.timeout)
            .field("submitted_at", &self.submitted_at)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// CALL RESULT RECORDS
// =============================================================================

/// `LeaderboardFindResult_t`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardFindResult {
    /// Handle of the leaderboard that was searched for.
    pub leaderboard: SteamLeaderboard,
    /// Whether the leaderboard exists.
    pub found: bool,
}

/// `LeaderboardScoresDownloaded_t`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardScoresDownloaded {
    pub leaderboard: SteamLeaderboard,
    /// Handle used to read individual entries.
    pub entries: SteamLeaderboardEntries,
    pub entry_count: i32,
}

/// `LeaderboardScoreUploaded_t`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardScoreUploaded {
    pub success: bool,
    pub leaderboard: SteamLeaderboard,
    pub score: i32,
    /// Whether the stored score changed.
    pub score_changed: bool,
    pub global_rank_new: i32,
    pub global_rank_previous: i32,
}

/// One downloaded leaderboard row (`LeaderboardEntry_t`).
///
/// Not a callback record, but it is read from the same kind of fixed layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub steam_id: SteamId,
    pub global_rank: i32,
    pub score: i32,
    /// Number of detail values stored with the entry.
    pub details_count: i32,
    pub ugc: UgcHandle,
}

/// Decoded form of a completed call's raw buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallResultRecord {
    LeaderboardFindResult(LeaderboardFindResult),
    LeaderboardScoresDownloaded(LeaderboardScoresDownloaded),
    LeaderboardScoreUploaded(LeaderboardScoreUploaded),
}

impl CallResultRecord {
    /// Which variant this is.
    pub fn kind(&self) -> RecordKind {
        match self {
            CallResultRecord::LeaderboardFindResult(_) => RecordKind::LeaderboardFindResult,
            CallResultRecord::LeaderboardScoresDownloaded(_) => {
                RecordKind::LeaderboardScoresDownloaded
            }
            CallResultRecord::LeaderboardScoreUploaded(_) => RecordKind::LeaderboardScoreUploaded,
        }
    }

    fn unexpected(&self, expected: RecordKind) -> CallResultError {
        CallResultError::UnexpectedRecord {
            expected: expected.name(),
            actual: self.kind().name(),
        }
    }

    pub fn into_find_result(self) -> Result<LeaderboardFindResult, CallResultError> {
        match self {
            CallResultRecord::LeaderboardFindResult(record) => Ok(record),
            other => Err(other.unexpected(RecordKind::LeaderboardFindResult)),
        }
    }

    pub fn into_scores_downloaded(self) -> Result<LeaderboardScoresDownloaded, CallResultError> {
        match self {
            CallResultRecord::LeaderboardScoresDownloaded(record) => Ok(record),
            other => Err(other.unexpected(RecordKind::LeaderboardScoresDownloaded)),
        }
    }

    pub fn into_score_uploaded(self) -> Result<LeaderboardScoreUploaded, CallResultError> {
        match self {
            CallResultRecord::LeaderboardScoreUploaded(record) => Ok(record),
            other => Err(other.unexpected(RecordKind::LeaderboardScoreUploaded)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_is_measured_from_submission() {
        let request = PendingRequest::new(
            SteamApiCall::from(7),
            CallbackId::LEADERBOARD_FIND_RESULT,
            12,
            |_| {},
            |_| {},
        );
        tokio::time::advance(Duration::from_millis(150)).await;
        assert_eq!(
            request.elapsed_at(Instant::now()),
            Duration::from_millis(150)
        );
    }

    #[test]
    fn test_complete_runs_success_continuation_only() {
        let successes = Arc::new(AtomicUsize::new(0));
        let timeouts = Arc::new(AtomicUsize::new(0));
        let s = successes.clone();
        let t = timeouts.clone();

        let request = PendingRequest::new(
            SteamApiCall::from(1),
            CallbackId::LEADERBOARD_FIND_RESULT,
            12,
            move |result| {
                assert_eq!(result, Ok(vec![1, 2, 3]));
                s.fetch_add(1, Ordering::SeqCst);
            },
            move |_| {
                t.fetch_add(1, Ordering::SeqCst);
            },
        );
        request.complete(Ok(vec![1, 2, 3]));

        assert_eq!(successes.load(Ordering::SeqCst), 1);
        assert_eq!(timeouts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_with_timeout_override() {
        let request = PendingRequest::new(
            SteamApiCall::from(1),
            CallbackId::LEADERBOARD_SCORE_UPLOADED,
            28,
            |_| {},
            |_| {},
        )
        .with_timeout(Duration::from_millis(500));
        assert_eq!(request.timeout(), Some(Duration::from_millis(500)));
        assert!(format!("{request:?}").contains("PendingRequest"));
    }

    #[test]
    fn test_unexpected_record() {
        let record = CallResultRecord::LeaderboardFindResult(LeaderboardFindResult {
            leaderboard: SteamLeaderboard::from(5),
            found: true,
        });
        assert_eq!(
            record.into_score_uploaded(),
            Err(CallResultError::UnexpectedRecord {
                expected: "LeaderboardScoreUploaded",
                actual: "LeaderboardFindResult",
            })
        );
        assert!(record.into_find_result().unwrap().found);
    }
}
