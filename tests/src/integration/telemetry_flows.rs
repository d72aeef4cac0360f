//! # Telemetry Flows
//!
//! Metrics recorded by a live bridge, read back through the Prometheus
//! registry the telemetry crate exposes.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::sleep;

    use sw_call_results::{
        BridgeConfig, CallResultBridge, CallbackId, MockNativeCallbacks, PendingRequest,
    };
    use sw_telemetry::{
        encode_metrics, init_logging, register_metrics, TelemetryConfig, CALL_RESULTS_FAILED,
        CALL_RESULTS_TIMED_OUT, CONTINUATION_PANICS,
    };
    use sw_types::SteamApiCall;

    #[tokio::test(start_paused = true)]
    async fn test_bridge_outcomes_show_up_in_metrics() {
        // Either call may have run already in this process.
        let _ = register_metrics();
        let _ = init_logging(&TelemetryConfig::for_testing());

        let timed_out_before = CALL_RESULTS_TIMED_OUT.with_label_values(&["1106"]).get();
        let failed_before = CALL_RESULTS_FAILED
            .with_label_values(&["1105", "native_failure"])
            .get();
        let panics_before = CONTINUATION_PANICS.get();

        let native = Arc::new(MockNativeCallbacks::new());
        let handle = CallResultBridge::spawn(BridgeConfig::for_testing(), native.clone()).unwrap();

        native.fail_after(SteamApiCall(1), 0);
        handle
            .submit(PendingRequest::new(
                SteamApiCall(1),
                CallbackId::LEADERBOARD_SCORES_DOWNLOADED,
                20,
                |result| assert!(result.is_err()),
                |_| {},
            ))
            .await
            .unwrap();
        handle
            .submit(PendingRequest::new(
                SteamApiCall(2),
                CallbackId::LEADERBOARD_SCORE_UPLOADED,
                28,
                |_| {},
                |_| panic!("timeout continuation blew up"),
            ))
            .await
            .unwrap();
        sleep(Duration::from_secs(1)).await;

        assert_eq!(
            CALL_RESULTS_TIMED_OUT.with_label_values(&["1106"]).get(),
            timed_out_before + 1.0
        );
        assert_eq!(
            CALL_RESULTS_FAILED
                .with_label_values(&["1105", "native_failure"])
                .get(),
            failed_before + 1.0
        );
        assert_eq!(CONTINUATION_PANICS.get(), panics_before + 1.0);
        assert_eq!(handle.stats().continuation_panics, 1);

        let text = encode_metrics().unwrap();
        assert!(text.contains("sw_call_results_timed_out_total"));
        assert!(text.contains("sw_bridge_tick_duration_seconds"));
    }
}
