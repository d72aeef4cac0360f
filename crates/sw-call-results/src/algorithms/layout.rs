//! # Record Layout Tables
//!
//! Byte offsets of every field of the native callback records, per target
//! platform. The native library is built with `#pragma pack(8)` on Windows
//! and `#pragma pack(4)` everywhere else, so a `u64` following a 1 or 4 byte
//! field lands on a different offset depending on the OS.
//!
//! | Record | pack(4) size | pack(8) size |
//! |--------|--------------|--------------|
//! | `LeaderboardFindResult_t` | 12 | 16 |
//! | `LeaderboardScoresDownloaded_t` | 20 | 24 |
//! | `LeaderboardScoreUploaded_t` | 28 | 32 |
//! | `LeaderboardEntry_t` | 28 | 32 |
//!
//! The table is chosen once per process, never per decode.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{invariant_fields_fit, RecordKind};

/// `LeaderboardFindResult_t`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindResultLayout {
    pub size: usize,
    pub leaderboard: usize,
    pub found: usize,
}

/// `LeaderboardScoresDownloaded_t`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoresDownloadedLayout {
    pub size: usize,
    pub leaderboard: usize,
    pub entries: usize,
    pub entry_count: usize,
}

/// `LeaderboardScoreUploaded_t`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreUploadedLayout {
    pub size: usize,
    pub success: usize,
    pub leaderboard: usize,
    pub score: usize,
    pub score_changed: usize,
    pub global_rank_new: usize,
    pub global_rank_previous: usize,
}

/// `LeaderboardEntry_t`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryLayout {
    pub size: usize,
    pub steam_id: usize,
    pub global_rank: usize,
    pub score: usize,
    pub details_count: usize,
    pub ugc: usize,
}

/// Offsets for every record on one packing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutTable {
    /// Packing rule name, for logs.
    pub name: &'static str,
    pub find_result: FindResultLayout,
    pub scores_downloaded: ScoresDownloadedLayout,
    pub score_uploaded: ScoreUploadedLayout,
    pub entry: EntryLayout,
}

/// Linux, macOS and FreeBSD (`#pragma pack(4)`).
pub const PACK_SMALL: LayoutTable = LayoutTable {
    name: "pack4",
    find_result: FindResultLayout {
        size: 12,
        leaderboard: 0,
        found: 8,
    },
    scores_downloaded: ScoresDownloadedLayout {
        size: 20,
        leaderboard: 0,
        entries: 8,
        entry_count: 16,
    },
    score_uploaded: ScoreUploadedLayout {
        size: 28,
        success: 0,
        leaderboard: 4,
        score: 12,
        score_changed: 16,
        global_rank_new: 20,
        global_rank_previous: 24,
    },
    entry: EntryLayout {
        size: 28,
        steam_id: 0,
        global_rank: 8,
        score: 12,
        details_count: 16,
        ugc: 20,
    },
};

/// Windows, both word sizes (`#pragma pack(8)`).
pub const PACK_LARGE: LayoutTable = LayoutTable {
    name: "pack8",
    find_result: FindResultLayout {
        size: 16,
        leaderboard: 0,
        found: 8,
    },
    scores_downloaded: ScoresDownloadedLayout {
        size: 24,
        leaderboard: 0,
        entries: 8,
        entry_count: 16,
    },
    score_uploaded: ScoreUploadedLayout {
        size: 32,
        success: 0,
        leaderboard: 8,
        score: 16,
        score_changed: 20,
        global_rank_new: 24,
        global_rank_previous: 28,
    },
    entry: EntryLayout {
        size: 32,
        steam_id: 0,
        global_rank: 8,
        score: 12,
        details_count: 16,
        ugc: 24,
    },
};

impl LayoutTable {
    /// Fixed size of a callback record.
    pub fn record_size(&self, kind: RecordKind) -> usize {
        match kind {
            RecordKind::LeaderboardFindResult => self.find_result.size,
            RecordKind::LeaderboardScoresDownloaded => self.scores_downloaded.size,
            RecordKind::LeaderboardScoreUploaded => self.score_uploaded.size,
        }
    }

    /// Every record's fields fit inside it without overlapping.
    pub fn is_consistent(&self) -> bool {
        let f = &self.find_result;
        let d = &self.scores_downloaded;
        let u = &self.score_uploaded;
        let e = &self.entry;

        invariant_fields_fit(f.size, &[(f.leaderboard, 8), (f.found, 1)])
            && invariant_fields_fit(
                d.size,
                &[(d.leaderboard, 8), (d.entries, 8), (d.entry_count, 4)],
            )
            && invariant_fields_fit(
                u.size,
                &[
                    (u.success, 1),
                    (u.leaderboard, 8),
                    (u.score, 4),
                    (u.score_changed, 1),
                    (u.global_rank_new, 4),
                    (u.global_rank_previous, 4),
                ],
            )
            && invariant_fields_fit(
                e.size,
                &[
                    (e.steam_id, 8),
                    (e.global_rank, 4),
                    (e.score, 4),
                    (e.details_count, 4),
                    (e.ugc, 8),
                ],
            )
    }
}

/// Operating systems the native library ships for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetOs {
    Windows,
    Linux,
    MacOs,
    FreeBsd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerWidth {
    Bits32,
    Bits64,
}

/// Key into the layout tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetPlatform {
    pub os: TargetOs,
    pub pointer_width: PointerWidth,
}

impl TargetPlatform {
    /// The platform this binary was compiled for, if the native library
    /// supports it.
    pub fn current() -> Option<Self> {
        let os = if cfg!(target_os = "windows") {
            TargetOs::Windows
        } else if cfg!(target_os = "linux") {
            TargetOs::Linux
        } else if cfg!(target_os = "macos") {
            TargetOs::MacOs
        } else if cfg!(target_os = "freebsd") {
            TargetOs::FreeBsd
        } else {
            return None;
        };

        let pointer_width = if cfg!(target_pointer_width = "64") {
            PointerWidth::Bits64
        } else {
            PointerWidth::Bits32
        };

        Some(Self { os, pointer_width })
    }

    /// Layout table for this platform.
    pub fn layout(self) -> &'static LayoutTable {
        match (self.os, self.pointer_width) {
            (TargetOs::Windows, PointerWidth::Bits64 | PointerWidth::Bits32) => &PACK_LARGE,
            (TargetOs::Linux | TargetOs::MacOs | TargetOs::FreeBsd, _) => &PACK_SMALL,
        }
    }
}

static NATIVE_LAYOUT: Lazy<&'static LayoutTable> = Lazy::new(|| {
    let platform = TargetPlatform::current();
    let table = platform.map_or(&PACK_SMALL, TargetPlatform::layout);
    debug!(?platform, layout = table.name, "Selected call-result layout table");
    table
});

/// Layout table for the running process.
pub fn native_layout() -> &'static LayoutTable {
    *NATIVE_LAYOUT
}
