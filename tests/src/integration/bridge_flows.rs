//! # Bridge Flows
//!
//! Typed leaderboard records through a running bridge, with the native side
//! played by `MockNativeCallbacks` and the buffers laid out by the encoder.

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::sleep;

    use sw_call_results::{
        BridgeConfig, BridgeHandle, CallResultBridge, CallResultError, CallResultRecord,
        CallbackId, LeaderboardFindResult, LeaderboardScoreUploaded, LeaderboardScoresDownloaded,
        MockNativeCallbacks, PendingRequest, RecordKind, ResultDecoder, TimeoutInfo, PACK_LARGE,
        PACK_SMALL,
    };
    use sw_types::{SteamApiCall, SteamLeaderboard, SteamLeaderboardEntries};

    type Delivered = Arc<Mutex<Vec<(SteamApiCall, Result<CallResultRecord, CallResultError>)>>>;

    fn start(config: BridgeConfig) -> (BridgeHandle, Arc<MockNativeCallbacks>) {
        let native = Arc::new(MockNativeCallbacks::new());
        let handle = CallResultBridge::spawn(config, native.clone()).unwrap();
        (handle, native)
    }

    fn typed_request(
        call: SteamApiCall,
        kind: RecordKind,
        decoder: ResultDecoder,
        delivered: &Delivered,
    ) -> PendingRequest {
        let sink = Arc::clone(delivered);
        PendingRequest::for_record(
            call,
            kind,
            decoder,
            move |record| sink.lock().push((call, record)),
            |_| panic!("unexpected timeout"),
        )
    }

    fn sample_records() -> Vec<CallResultRecord> {
        vec![
            CallResultRecord::LeaderboardFindResult(LeaderboardFindResult {
                leaderboard: SteamLeaderboard(0x0102_0304_0506_0708),
                found: true,
            }),
            CallResultRecord::LeaderboardScoresDownloaded(LeaderboardScoresDownloaded {
                leaderboard: SteamLeaderboard(77),
                entries: SteamLeaderboardEntries(0xDEAD_BEEF),
                entry_count: 25,
            }),
            CallResultRecord::LeaderboardScoreUploaded(LeaderboardScoreUploaded {
                success: true,
                leaderboard: SteamLeaderboard(77),
                score: -15,
                score_changed: true,
                global_rank_new: 4,
                global_rank_previous: 0,
            }),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn test_typed_records_under_both_layouts() {
        for (offset, table) in [(0x100, &PACK_SMALL), (0x200, &PACK_LARGE)] {
            let decoder = ResultDecoder::new(table);
            let (handle, native) = start(BridgeConfig::for_testing());
            let delivered = Delivered::default();

            for (i, record) in sample_records().into_iter().enumerate() {
                let call = SteamApiCall(offset + i as u64);
                native.complete_after(call, i, decoder.encode(&record));
                handle
                    .submit(typed_request(call, record.kind(), decoder, &delivered))
                    .await
                    .unwrap();
            }
            sleep(Duration::from_millis(200)).await;

            let delivered = delivered.lock();
            assert_eq!(delivered.len(), 3, "layout {}", table.name);
            for ((_, got), expected) in delivered.iter().zip(sample_records()) {
                assert_eq!(got.as_ref().unwrap(), &expected, "layout {}", table.name);
            }
            handle.close();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_truncated_buffer_reports_short_record() {
        let (handle, native) = start(BridgeConfig::for_testing());
        let decoder = ResultDecoder::new(&PACK_SMALL);
        let delivered = Delivered::default();
        let call = SteamApiCall(0x300);

        native.complete_after(call, 0, vec![0; 8]);
        handle
            .submit(typed_request(
                call,
                RecordKind::LeaderboardScoreUploaded,
                decoder,
                &delivered,
            ))
            .await
            .unwrap();
        sleep(Duration::from_millis(100)).await;

        let delivered = delivered.lock();
        assert_eq!(
            delivered[0].1,
            Err(CallResultError::BufferTooShort {
                kind: "LeaderboardScoreUploaded",
                expected: 28,
                actual: 8,
            })
        );
        assert_eq!(handle.stats().failed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_continuation_chains_download() {
        let (handle, native) = start(BridgeConfig::for_testing());
        let decoder = ResultDecoder::native();
        let delivered = Delivered::default();
        let find_call = SteamApiCall(0x400);
        let download_call = SteamApiCall(0x401);

        native.complete_after(
            find_call,
            1,
            decoder.encode(&sample_records()[0]),
        );
        native.complete_after(
            download_call,
            1,
            decoder.encode(&sample_records()[1]),
        );

        let chain = handle.clone();
        let sink = Arc::clone(&delivered);
        let request = PendingRequest::for_record(
            find_call,
            RecordKind::LeaderboardFindResult,
            decoder,
            move |record| {
                let found = record.and_then(CallResultRecord::into_find_result).unwrap();
                assert!(found.found);
                chain
                    .blocking_submit(typed_request(
                        download_call,
                        RecordKind::LeaderboardScoresDownloaded,
                        decoder,
                        &sink,
                    ))
                    .unwrap();
            },
            |_| panic!("unexpected timeout"),
        );

        handle.submit(request).await.unwrap();
        sleep(Duration::from_millis(300)).await;

        let delivered = delivered.lock();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].0, download_call);
        let downloaded = delivered[0].1.clone().and_then(CallResultRecord::into_scores_downloaded);
        assert_eq!(downloaded.unwrap().entry_count, 25);
        assert_eq!(native.polls_for(download_call), 2);
        assert_eq!(handle.stats().completed, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_per_request_timeout_overrides_default() {
        let (handle, _native) = start(BridgeConfig::for_testing());
        let timeouts: Arc<Mutex<Vec<TimeoutInfo>>> = Arc::default();

        let sink = Arc::clone(&timeouts);
        let request = PendingRequest::new(
            SteamApiCall(0x500),
            CallbackId::LEADERBOARD_FIND_RESULT,
            12,
            |_| panic!("never ready"),
            move |info| sink.lock().push(info),
        )
        .with_timeout(Duration::from_millis(50));

        handle.submit(request).await.unwrap();
        sleep(Duration::from_millis(120)).await;

        let timeouts = timeouts.lock();
        assert_eq!(timeouts.len(), 1);
        assert!(timeouts[0].elapsed > Duration::from_millis(50));
        assert!(timeouts[0].elapsed < Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deferred_callback_runs_alongside_requests() {
        let (handle, native) = start(BridgeConfig::for_testing());
        let runs = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&runs);
        handle
            .register_deferred(Box::new(move || counter.fetch_add(1, Ordering::SeqCst) + 1 == 3))
            .unwrap();
        sleep(Duration::from_millis(500)).await;

        assert_eq!(runs.load(Ordering::SeqCst), 3);
        assert_eq!(native.run_callbacks_calls(), 3);
        assert_eq!(native.poll_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_abandons_pending_lookups() {
        let (handle, native) = start(BridgeConfig::for_testing());
        let delivered = Delivered::default();

        handle
            .submit(typed_request(
                SteamApiCall(0x600),
                RecordKind::LeaderboardFindResult,
                ResultDecoder::native(),
                &delivered,
            ))
            .await
            .unwrap();
        sleep(Duration::from_millis(50)).await;

        handle.close();
        handle.closed().await;

        let polls = native.poll_calls();
        sleep(Duration::from_secs(1)).await;
        assert_eq!(native.poll_calls(), polls);
        assert!(delivered.lock().is_empty());
        assert!(handle
            .submit(typed_request(
                SteamApiCall(0x601),
                RecordKind::LeaderboardFindResult,
                ResultDecoder::native(),
                &delivered,
            ))
            .await
            .is_err());
    }
}
