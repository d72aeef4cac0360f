//! # Asynchronous Leaderboards
//!
//! Find, download and upload, each completing through the call-result bridge.
//!
//! Every operation starts the native call, hands the returned call handle to
//! the bridge and returns. The caller's closure then runs exactly once on the
//! bridge's driver thread with a typed outcome, including on timeout. When an
//! operation returns `Err` the closure is dropped without being called.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use sw_call_results::{
    BridgeError, BridgeHandle, CallResultError, CallResultRecord, LeaderboardEntry,
    LeaderboardScoreUploaded, PendingRequest, RecordKind, ResultDecoder, TimeoutInfo,
};
use sw_types::{
    LeaderboardDataRequest, LeaderboardUploadScoreMethod, SteamApiCall, SteamLeaderboard,
    SteamLeaderboardEntries,
};
use tracing::debug;

use crate::errors::{LeaderboardError, NativeError};
use crate::ffi::LEADERBOARD_DETAILS_MAX;
use crate::interfaces::UserStats;

/// One downloaded row with its detail values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadedEntry {
    pub entry: LeaderboardEntry,
    pub details: Vec<i32>,
}

/// Native entry points the leaderboard operations start calls with.
pub trait LeaderboardNative: Clone + Send + Sync + 'static {
    fn find_leaderboard(&self, name: &str) -> Result<SteamApiCall, NativeError>;

    fn download_leaderboard_entries(
        &self,
        leaderboard: SteamLeaderboard,
        request: LeaderboardDataRequest,
        range_start: i32,
        range_end: i32,
    ) -> SteamApiCall;

    fn upload_leaderboard_score(
        &self,
        leaderboard: SteamLeaderboard,
        method: LeaderboardUploadScoreMethod,
        score: i32,
        details: &[i32],
    ) -> SteamApiCall;

    /// Read back one row of a completed download.
    fn downloaded_leaderboard_entry(
        &self,
        entries: SteamLeaderboardEntries,
        index: i32,
        decoder: ResultDecoder,
    ) -> Option<(LeaderboardEntry, Vec<i32>)>;
}

impl LeaderboardNative for UserStats {
    fn find_leaderboard(&self, name: &str) -> Result<SteamApiCall, NativeError> {
        UserStats::find_leaderboard(self, name)
    }

    fn download_leaderboard_entries(
        &self,
        leaderboard: SteamLeaderboard,
        request: LeaderboardDataRequest,
        range_start: i32,
        range_end: i32,
    ) -> SteamApiCall {
        UserStats::download_leaderboard_entries(self, leaderboard, request, range_start, range_end)
    }

    fn upload_leaderboard_score(
        &self,
        leaderboard: SteamLeaderboard,
        method: LeaderboardUploadScoreMethod,
        score: i32,
        details: &[i32],
    ) -> SteamApiCall {
        UserStats::upload_leaderboard_score(self, leaderboard, method, score, details)
    }

    fn downloaded_leaderboard_entry(
        &self,
        entries: SteamLeaderboardEntries,
        index: i32,
        decoder: ResultDecoder,
    ) -> Option<(LeaderboardEntry, Vec<i32>)> {
        UserStats::downloaded_leaderboard_entry(self, entries, index, decoder)
    }
}

/// Leaderboard operations over one bridge.
#[derive(Debug, Clone)]
pub struct Leaderboards<N = UserStats> {
    native: N,
    bridge: BridgeHandle,
    decoder: ResultDecoder,
}

impl<N: LeaderboardNative> Leaderboards<N> {
    pub fn new(native: N, bridge: BridgeHandle) -> Self {
        Self {
            native,
            bridge,
            decoder: ResultDecoder::native(),
        }
    }

    /// Use a specific record layout instead of the running platform's.
    pub fn with_decoder(mut self, decoder: ResultDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn bridge(&self) -> &BridgeHandle {
        &self.bridge
    }

    /// Look a leaderboard up by name.
    ///
    /// Safe to call from plain threads, from async tasks and from the
    /// bridge's own continuations.
    pub fn find_leaderboard<F>(&self, name: &str, callback: F) -> Result<SteamApiCall, LeaderboardError>
    where
        F: FnOnce(Result<SteamLeaderboard, LeaderboardError>) + Send + 'static,
    {
        self.ensure_open()?;
        let call = started(self.native.find_leaderboard(name)?)?;

        let (on_complete, on_timeout) = reply_once(callback);
        let owned_name = name.to_string();
        let request = PendingRequest::for_record(
            call,
            RecordKind::LeaderboardFindResult,
            self.decoder,
            move |record| on_complete(find_outcome(&owned_name, record)),
            move |info| on_timeout(Err(timed_out(info))),
        );

        self.bridge.blocking_submit(request)?;
        debug!(%call, leaderboard = name, "Leaderboard lookup submitted");
        Ok(call)
    }

    /// Download a range of entries, each read back with its details.
    ///
    /// For [`LeaderboardDataRequest::GlobalAroundUser`] the range is relative
    /// to the current user, e.g. `-2..=2`.
    pub fn download_leaderboard_entries<F>(
        &self,
        leaderboard: SteamLeaderboard,
        request: LeaderboardDataRequest,
        range_start: i32,
        range_end: i32,
        callback: F,
    ) -> Result<SteamApiCall, LeaderboardError>
    where
        F: FnOnce(Result<Vec<DownloadedEntry>, LeaderboardError>) + Send + 'static,
    {
        self.ensure_open()?;
        let call = started(self.native.download_leaderboard_entries(
            leaderboard,
            request,
            range_start,
            range_end,
        ))?;

        let (on_complete, on_timeout) = reply_once(callback);
        let native = self.native.clone();
        let decoder = self.decoder;
        let pending = PendingRequest::for_record(
            call,
            RecordKind::LeaderboardScoresDownloaded,
            self.decoder,
            move |record| {
                on_complete(download_outcome(record, |entries, index| {
                    native.downloaded_leaderboard_entry(entries, index, decoder)
                }))
            },
            move |info| on_timeout(Err(timed_out(info))),
        );

        self.bridge.blocking_submit(pending)?;
        debug!(%call, %leaderboard, ?request, range_start, range_end, "Leaderboard download submitted");
        Ok(call)
    }

    /// Upload a score with up to 64 detail values.
    pub fn upload_leaderboard_score<F>(
        &self,
        leaderboard: SteamLeaderboard,
        method: LeaderboardUploadScoreMethod,
        score: i32,
        details: &[i32],
        callback: F,
    ) -> Result<SteamApiCall, LeaderboardError>
    where
        F: FnOnce(Result<LeaderboardScoreUploaded, LeaderboardError>) + Send + 'static,
    {
        if details.len() > LEADERBOARD_DETAILS_MAX {
            return Err(LeaderboardError::TooManyDetails {
                count: details.len(),
                max: LEADERBOARD_DETAILS_MAX,
            });
        }
        self.ensure_open()?;
        let call = started(
            self.native
                .upload_leaderboard_score(leaderboard, method, score, details),
        )?;

        let (on_complete, on_timeout) = reply_once(callback);
        let request = PendingRequest::for_record(
            call,
            RecordKind::LeaderboardScoreUploaded,
            self.decoder,
            move |record| on_complete(upload_outcome(record)),
            move |info| on_timeout(Err(timed_out(info))),
        );

        self.bridge.blocking_submit(request)?;
        debug!(%call, %leaderboard, score, ?method, "Score upload submitted");
        Ok(call)
    }

    fn ensure_open(&self) -> Result<(), LeaderboardError> {
        if self.bridge.is_closed() {
            return Err(BridgeError::Closed.into());
        }
        Ok(())
    }
}

/// Outcome of a completed lookup.
pub fn find_outcome(
    name: &str,
    record: Result<CallResultRecord, CallResultError>,
) -> Result<SteamLeaderboard, LeaderboardError> {
    let found = record?.into_find_result()?;
    if !found.found {
        return Err(LeaderboardError::NotFound(name.to_string()));
    }
    Ok(found.leaderboard)
}

/// Outcome of a completed download. Reads rows `0..entry_count` through
/// `read_entry`; the first unreadable row fails the whole download.
pub fn download_outcome<R>(
    record: Result<CallResultRecord, CallResultError>,
    mut read_entry: R,
) -> Result<Vec<DownloadedEntry>, LeaderboardError>
where
    R: FnMut(SteamLeaderboardEntries, i32) -> Option<(LeaderboardEntry, Vec<i32>)>,
{
    let downloaded = record?.into_scores_downloaded()?;
    (0..downloaded.entry_count.max(0))
        .map(|index| {
            read_entry(downloaded.entries, index)
                .map(|(entry, details)| DownloadedEntry { entry, details })
                .ok_or(LeaderboardError::EntryUnavailable(index))
        })
        .collect()
}

/// Outcome of a completed upload.
pub fn upload_outcome(
    record: Result<CallResultRecord, CallResultError>,
) -> Result<LeaderboardScoreUploaded, LeaderboardError> {
    let uploaded = record?.into_score_uploaded()?;
    if !uploaded.success {
        return Err(LeaderboardError::Rejected);
    }
    Ok(uploaded)
}

fn started(call: SteamApiCall) -> Result<SteamApiCall, LeaderboardError> {
    if !call.is_valid() {
        return Err(LeaderboardError::NotStarted);
    }
    Ok(call)
}

fn timed_out(info: TimeoutInfo) -> LeaderboardError {
    LeaderboardError::TimedOut {
        elapsed: info.elapsed,
    }
}

/// Split a one-shot callback between the completion and timeout paths.
/// Whichever runs first gets it.
fn reply_once<T, F>(
    callback: F,
) -> (impl FnOnce(T) + Send + 'static, impl FnOnce(T) + Send + 'static)
where
    T: 'static,
    F: FnOnce(T) + Send + 'static,
{
    let slot = Arc::new(Mutex::new(Some(callback)));
    let other = Arc::clone(&slot);
    let deliver = |slot: Arc<Mutex<Option<F>>>| {
        move |value: T| {
            let callback = slot.lock().take();
            if let Some(callback) = callback {
                callback(value);
            }
        }
    };
    (deliver(slot), deliver(other))
}
