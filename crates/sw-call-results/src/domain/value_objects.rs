//! # Value Objects
//!
//! Callback discriminators, record kinds and timing metadata.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

use super::errors::CallResultError;

/// Default polling interval between driver ticks.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 20;

/// Default time a call result may stay pending before it times out.
pub const DEFAULT_CALL_TIMEOUT_MS: u64 = 10_000;

/// Default capacity of the submission channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 10;

/// Callback discriminator the native library uses to tag a result record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct CallbackId(pub i32);

impl CallbackId {
    /// `LeaderboardFindResult_t`
    pub const LEADERBOARD_FIND_RESULT: Self = Self(1104);
    /// `LeaderboardScoresDownloaded_t`
    pub const LEADERBOARD_SCORES_DOWNLOADED: Self = Self(1105);
    /// `LeaderboardScoreUploaded_t`
    pub const LEADERBOARD_SCORE_UPLOADED: Self = Self(1106);

    /// Get the raw discriminator.
    pub const fn raw(self) -> i32 {
        self.0
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The record variants the bridge knows how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// Result of looking up a leaderboard by name.
    LeaderboardFindResult,
    /// A batch of leaderboard entries became available.
    LeaderboardScoresDownloaded,
    /// A score upload was acknowledged.
    LeaderboardScoreUploaded,
}

impl RecordKind {
    /// Every known kind.
    pub const ALL: [RecordKind; 3] = [
        RecordKind::LeaderboardFindResult,
        RecordKind::LeaderboardScoresDownloaded,
        RecordKind::LeaderboardScoreUploaded,
    ];

    /// Discriminator the native library reports for this kind.
    pub const fn callback_id(self) -> CallbackId {
        match self {
            RecordKind::LeaderboardFindResult => CallbackId::LEADERBOARD_FIND_RESULT,
            RecordKind::LeaderboardScoresDownloaded => CallbackId::LEADERBOARD_SCORES_DOWNLOADED,
            RecordKind::LeaderboardScoreUploaded => CallbackId::LEADERBOARD_SCORE_UPLOADED,
        }
    }

    /// Name used in logs and errors.
    pub const fn name(self) -> &'static str {
        match self {
            RecordKind::LeaderboardFindResult => "LeaderboardFindResult",
            RecordKind::LeaderboardScoresDownloaded => "LeaderboardScoresDownloaded",
            RecordKind::LeaderboardScoreUploaded => "LeaderboardScoreUploaded",
        }
    }
}

impl TryFrom<CallbackId> for RecordKind {
    type Error = CallResultError;

    fn try_from(id: CallbackId) -> Result<Self, Self::Error> {
        RecordKind::ALL
            .into_iter()
            .find(|kind| kind.callback_id() == id)
            .ok_or(CallResultError::UnknownCallback(id.raw()))
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Timing metadata handed to a timeout continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutInfo {
    /// When the request was submitted.
    pub submitted_at: Instant,
    /// How long it had been pending when the timeout was detected.
    pub elapsed: Duration,
}
