use std::ffi::c_void;
use std::sync::Arc;
use sw_call_results::{LeaderboardEntry, ResultDecoder};
use sw_types::{
    LeaderboardDataRequest, LeaderboardUploadScoreMethod, SteamApiCall, SteamLeaderboard,
    SteamLeaderboardEntries,
};

use super::{acquire, RawInterface};
use crate::errors::NativeError;
use crate::ffi::LEADERBOARD_DETAILS_MAX;
use crate::loader::SteamApi;
use crate::marshal::{aligned_buffer, aligned_bytes, to_cstring};

/// `ISteamUserStats`: achievements plus the raw leaderboard entry points.
///
/// The leaderboard methods here only start native calls; see
/// [`Leaderboards`](crate::Leaderboards) for versions that wait for the result.
#[derive(Debug, Clone)]
pub struct UserStats {
    api: Arc<SteamApi>,
    this: RawInterface,
}

impl UserStats {
    pub(crate) fn new(api: Arc<SteamApi>) -> Result<Self, NativeError> {
        let this = acquire(api.steam_user_stats, "ISteamUserStats")?;
        Ok(Self { api, this })
    }

    /// Whether the achievement is unlocked. `None` if the name is unknown or
    /// stats have not been received yet.
    pub fn achievement(&self, name: &str) -> Result<Option<bool>, NativeError> {
        let name = to_cstring(name)?;
        let mut achieved = false;
        // SAFETY: the string and out flag outlive the call.
        let ok = unsafe {
            (self.api.user_stats_get_achievement)(self.this.as_ptr(), name.as_ptr(), &mut achieved)
        };
        Ok(ok.then_some(achieved))
    }

    pub fn set_achievement(&self, name: &str) -> Result<bool, NativeError> {
        let name = to_cstring(name)?;
        // SAFETY: the string outlives the call.
        Ok(unsafe { (self.api.user_stats_set_achievement)(self.this.as_ptr(), name.as_ptr()) })
    }

    pub fn clear_achievement(&self, name: &str) -> Result<bool, NativeError> {
        let name = to_cstring(name)?;
        // SAFETY: the string outlives the call.
        Ok(unsafe { (self.api.user_stats_clear_achievement)(self.this.as_ptr(), name.as_ptr()) })
    }

    /// Send changed stats and achievements to the server.
    pub fn store_stats(&self) -> bool {
        // SAFETY: no arguments besides the interface.
        unsafe { (self.api.user_stats_store_stats)(self.this.as_ptr()) }
    }

    /// Start a lookup by name. Completes with a `LeaderboardFindResult`.
    pub fn find_leaderboard(&self, name: &str) -> Result<SteamApiCall, NativeError> {
        let name = to_cstring(name)?;
        // SAFETY: the string outlives the call.
        let call =
            unsafe { (self.api.user_stats_find_leaderboard)(self.this.as_ptr(), name.as_ptr()) };
        Ok(SteamApiCall(call))
    }

    /// Start a download. Completes with a `LeaderboardScoresDownloaded`.
    pub fn download_leaderboard_entries(
        &self,
        leaderboard: SteamLeaderboard,
        request: LeaderboardDataRequest,
        range_start: i32,
        range_end: i32,
    ) -> SteamApiCall {
        // SAFETY: plain value arguments.
        SteamApiCall(unsafe {
            (self.api.user_stats_download_leaderboard_entries)(
                self.this.as_ptr(),
                leaderboard.raw(),
                request.raw(),
                range_start,
                range_end,
            )
        })
    }

    /// Start an upload. Completes with a `LeaderboardScoreUploaded`.
    ///
    /// `details` longer than 64 values are truncated by the caller
    /// ([`Leaderboards`](crate::Leaderboards) rejects them instead).
    pub fn upload_leaderboard_score(
        &self,
        leaderboard: SteamLeaderboard,
        method: LeaderboardUploadScoreMethod,
        score: i32,
        details: &[i32],
    ) -> SteamApiCall {
        let details = &details[..details.len().min(LEADERBOARD_DETAILS_MAX)];
        let details_ptr = if details.is_empty() {
            std::ptr::null()
        } else {
            details.as_ptr()
        };

        // SAFETY: the library reads `details.len()` values from `details_ptr`.
        SteamApiCall(unsafe {
            (self.api.user_stats_upload_leaderboard_score)(
                self.this.as_ptr(),
                leaderboard.raw(),
                method.raw(),
                score,
                details_ptr,
                details.len() as i32,
            )
        })
    }

    /// Read entry `index` of a completed download, with up to 64 detail
    /// values. `None` if the handle or index is invalid.
    pub fn downloaded_leaderboard_entry(
        &self,
        entries: SteamLeaderboardEntries,
        index: i32,
        decoder: ResultDecoder,
    ) -> Option<(LeaderboardEntry, Vec<i32>)> {
        let size = decoder.layout().entry.size;
        let mut raw = aligned_buffer(size);
        let mut details = [0i32; LEADERBOARD_DETAILS_MAX];

        // SAFETY: `raw` holds at least one native LeaderboardEntry_t and
        // `details` holds LEADERBOARD_DETAILS_MAX values.
        let ok = unsafe {
            (self.api.user_stats_get_downloaded_leaderboard_entry)(
                self.this.as_ptr(),
                entries.raw(),
                index,
                raw.as_mut_ptr().cast::<c_void>(),
                details.as_mut_ptr(),
                LEADERBOARD_DETAILS_MAX as i32,
            )
        };
        if !ok {
            return None;
        }

        let entry = decoder
            .decode_leaderboard_entry(&aligned_bytes(&raw, size))
            .ok()?;
        let count = usize::try_from(entry.details_count)
            .unwrap_or(0)
            .min(LEADERBOARD_DETAILS_MAX);
        Some((entry, details[..count].to_vec()))
    }
}
