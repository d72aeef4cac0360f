//! # Result Decoder
//!
//! Turns a completed call's raw buffer into a [`CallResultRecord`] using one
//! [`LayoutTable`]. Values are read in native byte order, since the buffer was
//! written by the native library in this same process.

use sw_types::{SteamApiCall, SteamId, SteamLeaderboard, SteamLeaderboardEntries, UgcHandle};

use super::layout::{native_layout, LayoutTable};
use crate::domain::{
    CallResultError, CallResultRecord, CallbackId, LeaderboardEntry, LeaderboardFindResult,
    LeaderboardScoreUploaded, LeaderboardScoresDownloaded, PendingRequest, RecordKind,
    TimeoutInfo,
};

/// Decodes and encodes records for one platform layout.
#[derive(Debug, Clone, Copy)]
pub struct ResultDecoder {
    layout: &'static LayoutTable,
}

impl ResultDecoder {
    /// Decoder for an explicit layout.
    pub const fn new(layout: &'static LayoutTable) -> Self {
        Self { layout }
    }

    /// Decoder for the running process.
    pub fn native() -> Self {
        Self::new(native_layout())
    }

    pub fn layout(&self) -> &'static LayoutTable {
        self.layout
    }

    /// Fixed size of `kind` under this layout.
    pub fn record_size(&self, kind: RecordKind) -> usize {
        self.layout.record_size(kind)
    }

    /// Decode `bytes` as a record of `kind`.
    ///
    /// Bytes beyond the record's size are ignored.
    pub fn decode(&self, kind: RecordKind, bytes: &[u8]) -> Result<CallResultRecord, CallResultError> {
        check_len(kind.name(), self.record_size(kind), bytes)?;

        let record = match kind {
            RecordKind::LeaderboardFindResult => {
                let l = &self.layout.find_result;
                CallResultRecord::LeaderboardFindResult(LeaderboardFindResult {
                    leaderboard: SteamLeaderboard(read_u64(bytes, l.leaderboard)),
                    found: read_bool(bytes, l.found),
                })
            }
            RecordKind::LeaderboardScoresDownloaded => {
                let l = &self.layout.scores_downloaded;
                CallResultRecord::LeaderboardScoresDownloaded(LeaderboardScoresDownloaded {
                    leaderboard: SteamLeaderboard(read_u64(bytes, l.leaderboard)),
                    entries: SteamLeaderboardEntries(read_u64(bytes, l.entries)),
                    entry_count: read_i32(bytes, l.entry_count),
                })
            }
            RecordKind::LeaderboardScoreUploaded => {
                let l = &self.layout.score_uploaded;
                CallResultRecord::LeaderboardScoreUploaded(LeaderboardScoreUploaded {
                    success: read_bool(bytes, l.success),
                    leaderboard: SteamLeaderboard(read_u64(bytes, l.leaderboard)),
                    score: read_i32(bytes, l.score),
                    score_changed: read_bool(bytes, l.score_changed),
                    global_rank_new: read_i32(bytes, l.global_rank_new),
                    global_rank_previous: read_i32(bytes, l.global_rank_previous),
                })
            }
        };

        Ok(record)
    }

    /// Decode by raw discriminator.
    pub fn decode_callback(
        &self,
        callback_id: CallbackId,
        bytes: &[u8],
    ) -> Result<CallResultRecord, CallResultError> {
        self.decode(RecordKind::try_from(callback_id)?, bytes)
    }

    pub fn decode_leaderboard_entry(&self, bytes: &[u8]) -> Result<LeaderboardEntry, CallResultError> {
        let l = &self.layout.entry;
        check_len("LeaderboardEntry", l.size, bytes)?;

        Ok(LeaderboardEntry {
            steam_id: SteamId(read_u64(bytes, l.steam_id)),
            global_rank: read_i32(bytes, l.global_rank),
            score: read_i32(bytes, l.score),
            details_count: read_i32(bytes, l.details_count),
            ugc: UgcHandle(read_u64(bytes, l.ugc)),
        })
    }

    /// Lay `record` out exactly as the native library would, padding zeroed.
    pub fn encode(&self, record: &CallResultRecord) -> Vec<u8> {
        let mut buf = vec![0u8; self.record_size(record.kind())];

        match record {
            CallResultRecord::LeaderboardFindResult(r) => {
                let l = &self.layout.find_result;
                write_u64(&mut buf, l.leaderboard, r.leaderboard.raw());
                write_bool(&mut buf, l.found, r.found);
            }
            CallResultRecord::LeaderboardScoresDownloaded(r) => {
                let l = &self.layout.scores_downloaded;
                write_u64(&mut buf, l.leaderboard, r.leaderboard.raw());
                write_u64(&mut buf, l.entries, r.entries.raw());
                write_i32(&mut buf, l.entry_count, r.entry_count);
            }
            CallResultRecord::LeaderboardScoreUploaded(r) => {
                let l = &self.layout.score_uploaded;
                write_bool(&mut buf, l.success, r.success);
                write_u64(&mut buf, l.leaderboard, r.leaderboard.raw());
                write_i32(&mut buf, l.score, r.score);
                write_bool(&mut buf, l.score_changed, r.score_changed);
                write_i32(&mut buf, l.global_rank_new, r.global_rank_new);
                write_i32(&mut buf, l.global_rank_previous, r.global_rank_previous);
            }
        }

        buf
    }

    pub fn encode_leaderboard_entry(&self, entry: &LeaderboardEntry) -> Vec<u8> {
        let l = &self.layout.entry;
        let mut buf = vec![0u8; l.size];
        write_u64(&mut buf, l.steam_id, entry.steam_id.raw());
        write_i32(&mut buf, l.global_rank, entry.global_rank);
        write_i32(&mut buf, l.score, entry.score);
        write_i32(&mut buf, l.details_count, entry.details_count);
        write_u64(&mut buf, l.ugc, entry.ugc.raw());
        buf
    }
}

impl PendingRequest {
    /// Create a request whose success continuation receives a decoded record
    /// of `kind` instead of raw bytes.
    ///
    /// The record size comes from `decoder`'s layout.
    pub fn for_record<C, T>(
        call: SteamApiCall,
        kind: RecordKind,
        decoder: ResultDecoder,
        on_complete: C,
        on_timeout: T,
    ) -> Self
    where
        C: FnOnce(Result<CallResultRecord, CallResultError>) + Send + 'static,
        T: FnOnce(TimeoutInfo) + Send + 'static,
    {
        PendingRequest::new(
            call,
            kind.callback_id(),
            decoder.record_size(kind),
            move |result| on_complete(result.and_then(|bytes| decoder.decode(kind, &bytes))),
            on_timeout,
        )
    }
}

fn check_len(kind: &'static str, expected: usize, bytes: &[u8]) -> Result<(), CallResultError> {
    if bytes.len() < expected {
        return Err(CallResultError::BufferTooShort {
            kind,
            expected,
            actual: bytes.len(),
        });
    }
    Ok(())
}

// Callers check the length against the layout first; the tables are tested
// to keep every field inside its record.

fn read_u64(bytes: &[u8], offset: usize) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&bytes[offset..offset + 8]);
    u64::from_ne_bytes(raw)
}

fn read_i32(bytes: &[u8], offset: usize) -> i32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[offset..offset + 4]);
    i32::from_ne_bytes(raw)
}

fn read_bool(bytes: &[u8], offset: usize) -> bool {
    bytes[offset] != 0
}

fn write_u64(buf: &mut [u8], offset: usize, value: u64) {
    buf[offset..offset + 8].copy_from_slice(&value.to_ne_bytes());
}

fn write_i32(buf: &mut [u8], offset: usize, value: i32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_ne_bytes());
}

fn write_bool(buf: &mut [u8], offset: usize, value: bool) {
    buf[offset] = u8::from(value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::layout::{PACK_LARGE, PACK_SMALL};
    use proptest::prelude::*;

    const DECODERS: [ResultDecoder; 2] = [
        ResultDecoder::new(&PACK_SMALL),
        ResultDecoder::new(&PACK_LARGE),
    ];

    #[test]
    fn test_decode_find_result_pack4_bytes() {
        let mut bytes = vec![0u8; 12];
        bytes[0..8].copy_from_slice(&0x1122_3344_5566_7788u64.to_ne_bytes());
        bytes[8] = 1;

        let record = DECODERS[0]
            .decode(RecordKind::LeaderboardFindResult, &bytes)
            .unwrap()
            .into_find_result()
            .unwrap();
        assert_eq!(record.leaderboard, SteamLeaderboard(0x1122_3344_5566_7788));
        assert!(record.found);
    }

    #[test]
    fn test_decode_score_uploaded_pack8_skips_padding() {
        let mut bytes = vec![0xAAu8; 32];
        bytes[0] = 1;
        bytes[8..16].copy_from_slice(&42u64.to_ne_bytes());
        bytes[16..20].copy_from_slice(&1500i32.to_ne_bytes());
        bytes[20] = 0;
        bytes[24..28].copy_from_slice(&3i32.to_ne_bytes());
        bytes[28..32].copy_from_slice(&7i32.to_ne_bytes());

        let record = DECODERS[1]
            .decode(RecordKind::LeaderboardScoreUploaded, &bytes)
            .unwrap()
            .into_score_uploaded()
            .unwrap();
        assert!(record.success);
        assert_eq!(record.leaderboard, SteamLeaderboard(42));
        assert_eq!(record.score, 1500);
        assert!(!record.score_changed);
        assert_eq!(record.global_rank_new, 3);
        assert_eq!(record.global_rank_previous, 7);
    }

    #[test]
    fn test_short_buffer_is_an_error() {
        let err = DECODERS[1]
            .decode(RecordKind::LeaderboardScoresDownloaded, &[0u8; 20])
            .unwrap_err();
        assert_eq!(
            err,
            CallResultError::BufferTooShort {
                kind: "LeaderboardScoresDownloaded",
                expected: 24,
                actual: 20,
            }
        );
    }

    #[test]
    fn test_unknown_callback() {
        assert_eq!(
            DECODERS[0].decode_callback(CallbackId(1), &[0u8; 64]),
            Err(CallResultError::UnknownCallback(1))
        );
    }

    #[test]
    fn test_for_record_decodes_before_continuation() {
        use std::sync::{Arc, Mutex};

        let decoder = DECODERS[0];
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();

        let request = PendingRequest::for_record(
            SteamApiCall(9),
            RecordKind::LeaderboardFindResult,
            decoder,
            move |record| *sink.lock().unwrap() = Some(record),
            |_| {},
        );
        assert_eq!(request.record_size(), 12);
        assert_eq!(request.callback_id(), CallbackId::LEADERBOARD_FIND_RESULT);

        let expected = CallResultRecord::LeaderboardFindResult(LeaderboardFindResult {
            leaderboard: SteamLeaderboard(77),
            found: true,
        });
        request.complete(Ok(decoder.encode(&expected)));
        assert_eq!(seen.lock().unwrap().take(), Some(Ok(expected)));
    }

    #[test]
    fn test_for_record_passes_native_failure_through() {
        use std::sync::{Arc, Mutex};

        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let request = PendingRequest::for_record(
            SteamApiCall(9),
            RecordKind::LeaderboardScoreUploaded,
            DECODERS[1],
            move |record| *sink.lock().unwrap() = Some(record),
            |_| {},
        );
        request.complete(Err(CallResultError::NativeFailure));
        assert_eq!(
            seen.lock().unwrap().take(),
            Some(Err(CallResultError::NativeFailure))
        );
    }

    fn any_record() -> impl Strategy<Value = CallResultRecord> {
        prop_oneof![
            (any::<u64>(), any::<bool>()).prop_map(|(board, found)| {
                CallResultRecord::LeaderboardFindResult(LeaderboardFindResult {
                    leaderboard: SteamLeaderboard(board),
                    found,
                })
            }),
            (any::<u64>(), any::<u64>(), any::<i32>()).prop_map(|(board, entries, count)| {
                CallResultRecord::LeaderboardScoresDownloaded(LeaderboardScoresDownloaded {
                    leaderboard: SteamLeaderboard(board),
                    entries: SteamLeaderboardEntries(entries),
                    entry_count: count,
                })
            }),
            (
                any::<bool>(),
                any::<u64>(),
                any::<i32>(),
                any::<bool>(),
                any::<i32>(),
                any::<i32>()
            )
                .prop_map(|(success, board, score, changed, new, prev)| {
                    CallResultRecord::LeaderboardScoreUploaded(LeaderboardScoreUploaded {
                        success,
                        leaderboard: SteamLeaderboard(board),
                        score,
                        score_changed: changed,
                        global_rank_new: new,
                        global_rank_previous: prev,
                    })
                }),
        ]
    }

    proptest! {
        #[test]
        fn prop_records_survive_every_layout(record in any_record()) {
            for decoder in DECODERS {
                let bytes = decoder.encode(&record);
                prop_assert_eq!(bytes.len(), decoder.record_size(record.kind()));
                prop_assert_eq!(decoder.decode(record.kind(), &bytes).unwrap(), record);
            }
        }

        #[test]
        fn prop_entries_survive_every_layout(
            steam_id in any::<u64>(),
            rank in any::<i32>(),
            score in any::<i32>(),
            details in 0i32..=64,
            ugc in any::<u64>(),
        ) {
            let entry = LeaderboardEntry {
                steam_id: SteamId(steam_id),
                global_rank: rank,
                score,
                details_count: details,
                ugc: UgcHandle(ugc),
            };
            for decoder in DECODERS {
                let bytes = decoder.encode_leaderboard_entry(&entry);
                prop_assert_eq!(decoder.decode_leaderboard_entry(&bytes).unwrap(), entry);
            }
        }
    }
}
