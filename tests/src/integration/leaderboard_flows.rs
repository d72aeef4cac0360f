//! # Leaderboard Flows
//!
//! `sw_native::Leaderboards` driven end to end: a scripted stand-in for the
//! native leaderboard entry points starts the calls, `MockNativeCallbacks`
//! completes them, and a dedicated bridge thread delivers the outcomes.

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{mpsc, Arc};
    use std::time::Duration;

    use sw_call_results::{
        BridgeConfig, BridgeHandle, CallResultBridge, CallResultRecord, LeaderboardEntry,
        LeaderboardFindResult, LeaderboardScoreUploaded, LeaderboardScoresDownloaded,
        MockNativeCallbacks, ResultDecoder,
    };
    use sw_native::{
        DownloadedEntry, LeaderboardError, LeaderboardNative, Leaderboards, NativeConfig,
        NativeError, SteamClient,
    };
    use sw_types::{
        LeaderboardDataRequest, LeaderboardUploadScoreMethod, SteamApiCall, SteamId,
        SteamLeaderboard, SteamLeaderboardEntries, UgcHandle,
    };

    const WAIT: Duration = Duration::from_secs(5);

    /// Hands out sequential call handles and pre-scripts each one on the mock.
    #[derive(Clone)]
    struct ScriptedLibrary {
        callbacks: Arc<MockNativeCallbacks>,
        decoder: ResultDecoder,
        next_call: Arc<AtomicU64>,
        boards: Arc<Mutex<Vec<(String, SteamLeaderboard)>>>,
        rows: Arc<Vec<(LeaderboardEntry, Vec<i32>)>>,
        best_score: Arc<Mutex<i32>>,
    }

    impl ScriptedLibrary {
        fn new(callbacks: Arc<MockNativeCallbacks>) -> Self {
            Self {
                callbacks,
                decoder: ResultDecoder::native(),
                next_call: Arc::new(AtomicU64::new(1)),
                boards: Arc::new(Mutex::new(vec![("Feet Traveled".to_string(), SteamLeaderboard(31))])),
                rows: Arc::new(
                    (1..=3)
                        .map(|rank| {
                            let entry = LeaderboardEntry {
                                steam_id: SteamId(76_561_197_960_265_728 + rank as u64),
                                global_rank: rank,
                                score: 1000 - rank * 100,
                                details_count: 1,
                                ugc: UgcHandle(0),
                            };
                            (entry, vec![rank * 7])
                        })
                        .collect(),
                ),
                best_score: Arc::new(Mutex::new(500)),
            }
        }

        fn complete(&self, record: CallResultRecord) -> SteamApiCall {
            let call = SteamApiCall(self.next_call.fetch_add(1, Ordering::SeqCst));
            self.callbacks.complete_after(call, 1, self.decoder.encode(&record));
            call
        }
    }

    impl LeaderboardNative for ScriptedLibrary {
        fn find_leaderboard(&self, name: &str) -> Result<SteamApiCall, NativeError> {
            let found = self
                .boards
                .lock()
                .iter()
                .find(|(board, _)| board == name)
                .map(|(_, handle)| *handle);
            Ok(self.complete(CallResultRecord::LeaderboardFindResult(LeaderboardFindResult {
                leaderboard: found.unwrap_or_default(),
                found: found.is_some(),
            })))
        }

        fn download_leaderboard_entries(
            &self,
            leaderboard: SteamLeaderboard,
            _request: LeaderboardDataRequest,
            range_start: i32,
            range_end: i32,
        ) -> SteamApiCall {
            let count = (range_end - range_start + 1).clamp(0, self.rows.len() as i32);
            self.complete(CallResultRecord::LeaderboardScoresDownloaded(
                LeaderboardScoresDownloaded {
                    leaderboard,
                    entries: SteamLeaderboardEntries(900),
                    entry_count: count,
                },
            ))
        }

        fn upload_leaderboard_score(
            &self,
            leaderboard: SteamLeaderboard,
            method: LeaderboardUploadScoreMethod,
            score: i32,
            _details: &[i32],
        ) -> SteamApiCall {
            let mut best = self.best_score.lock();
            let previous = *best;
            let changed = method == LeaderboardUploadScoreMethod::ForceUpdate || score > previous;
            if changed {
                *best = score;
            }
            self.complete(CallResultRecord::LeaderboardScoreUploaded(LeaderboardScoreUploaded {
                success: true,
                leaderboard,
                score,
                score_changed: changed,
                global_rank_new: if changed { 1 } else { 2 },
                global_rank_previous: 2,
            }))
        }

        fn downloaded_leaderboard_entry(
            &self,
            _entries: SteamLeaderboardEntries,
            index: i32,
            _decoder: ResultDecoder,
        ) -> Option<(LeaderboardEntry, Vec<i32>)> {
            self.rows.get(usize::try_from(index).ok()?).cloned()
        }
    }

    fn setup() -> (Leaderboards<ScriptedLibrary>, BridgeHandle, Arc<MockNativeCallbacks>) {
        let callbacks = Arc::new(MockNativeCallbacks::new());
        let bridge =
            CallResultBridge::spawn_dedicated(BridgeConfig::for_testing(), callbacks.clone())
                .unwrap();
        let boards = Leaderboards::new(ScriptedLibrary::new(Arc::clone(&callbacks)), bridge.clone());
        (boards, bridge, callbacks)
    }

    #[test]
    fn test_find_then_download_from_continuation() {
        let (boards, bridge, _callbacks) = setup();
        let (tx, rx) = mpsc::channel::<Result<Vec<DownloadedEntry>, LeaderboardError>>();

        let chained = boards.clone();
        boards
            .find_leaderboard("Feet Traveled", move |found| {
                let board = match found {
                    Ok(board) => board,
                    Err(e) => {
                        tx.send(Err(e)).unwrap();
                        return;
                    }
                };
                chained
                    .download_leaderboard_entries(
                        board,
                        LeaderboardDataRequest::Global,
                        1,
                        3,
                        move |rows| tx.send(rows).unwrap(),
                    )
                    .unwrap();
            })
            .unwrap();

        let rows = rx.recv_timeout(WAIT).unwrap().unwrap();
        let ranks: Vec<i32> = rows.iter().map(|row| row.entry.global_rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(rows[2].details, vec![21]);
        assert_eq!(bridge.stats().completed, 2);
        bridge.close();
    }

    #[test]
    fn test_unknown_board_is_not_found() {
        let (boards, bridge, _callbacks) = setup();
        let (tx, rx) = mpsc::channel();

        boards
            .find_leaderboard("Does Not Exist", move |result| tx.send(result).unwrap())
            .unwrap();

        match rx.recv_timeout(WAIT).unwrap() {
            Err(LeaderboardError::NotFound(name)) => assert_eq!(name, "Does Not Exist"),
            other => panic!("expected NotFound, got {other:?}"),
        }
        bridge.close();
    }

    #[test]
    fn test_keep_best_upload_reports_unchanged_score() {
        let (boards, bridge, _callbacks) = setup();
        let (tx, rx) = mpsc::channel();

        for score in [400, 650] {
            let tx = tx.clone();
            boards
                .upload_leaderboard_score(
                    SteamLeaderboard(31),
                    LeaderboardUploadScoreMethod::KeepBest,
                    score,
                    &[score / 10],
                    move |result| tx.send(result).unwrap(),
                )
                .unwrap();
        }

        let first = rx.recv_timeout(WAIT).unwrap().unwrap();
        let second = rx.recv_timeout(WAIT).unwrap().unwrap();
        assert_eq!((first.score, first.score_changed), (400, false));
        assert_eq!((second.score, second.score_changed), (650, true));
        assert_eq!(second.global_rank_new, 1);
        bridge.close();
    }

    #[test]
    fn test_failed_call_maps_to_call_failed() {
        let callbacks = Arc::new(MockNativeCallbacks::new());
        let bridge =
            CallResultBridge::spawn_dedicated(BridgeConfig::for_testing(), callbacks.clone())
                .unwrap();

        // A library whose next handle fails natively instead of completing.
        let library = ScriptedLibrary::new(Arc::clone(&callbacks));
        library.next_call.store(1000, Ordering::SeqCst);
        callbacks.fail_after(SteamApiCall(1000), 0);
        let boards = Leaderboards::new(library, bridge.clone());

        let (tx, rx) = mpsc::channel();
        boards
            .find_leaderboard("Feet Traveled", move |result| tx.send(result).unwrap())
            .unwrap();

        assert!(matches!(
            rx.recv_timeout(WAIT).unwrap(),
            Err(LeaderboardError::CallFailed(_))
        ));
        bridge.close();
    }

    #[test]
    fn test_client_without_library_reports_search_paths() {
        let missing = std::env::temp_dir()
            .join("sw-tests-no-steam")
            .join(sw_native::library_file_name());
        let config = NativeConfig {
            library_path: Some(missing.clone()),
            ..Default::default()
        };

        match SteamClient::load(config) {
            Err(NativeError::LibraryNotFound { searched }) => {
                assert_eq!(searched, vec![PathBuf::from(missing)])
            }
            other => panic!("expected LibraryNotFound, got {other:?}"),
        }
    }
}
