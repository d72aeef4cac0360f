//! # Bridge Benchmarks
//!
//! | Path | Runs | Target |
//! |------|------|--------|
//! | Record decode | once per ready call | < 1µs |
//! | Per-request poll decision | once per pending call per tick | < 1µs |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;
use tokio::time::Instant;

use sw_call_results::algorithms::evaluate;
use sw_call_results::{
    CallResultRecord, CallbackId, LeaderboardScoreUploaded, NativeCallbacks, NativePoll,
    PendingRequest, RecordKind, ResultDecoder, PACK_LARGE, PACK_SMALL,
};
use sw_types::{SteamApiCall, SteamLeaderboard};

/// Library where nothing ever completes; records nothing, unlike the mock.
struct NeverReady;

impl NativeCallbacks for NeverReady {
    fn run_callbacks(&self) {}

    fn poll_call_result(&self, _call: SteamApiCall, _id: CallbackId, _size: usize) -> NativePoll {
        NativePoll::Pending
    }
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    let record = CallResultRecord::LeaderboardScoreUploaded(LeaderboardScoreUploaded {
        success: true,
        leaderboard: SteamLeaderboard(42),
        score: 1234,
        score_changed: true,
        global_rank_new: 7,
        global_rank_previous: 9,
    });

    for table in [&PACK_SMALL, &PACK_LARGE] {
        let decoder = ResultDecoder::new(table);
        let bytes = decoder.encode(&record);
        group.bench_with_input(BenchmarkId::new("score_uploaded", table.name), &bytes, |b, bytes| {
            b.iter(|| black_box(decoder.decode(RecordKind::LeaderboardScoreUploaded, bytes)))
        });
    }
    group.finish();
}

fn bench_poll_decisions(c: &mut Criterion) {
    let mut group = c.benchmark_group("poll_decision");
    let native = NeverReady;
    let timeout = Duration::from_secs(10);

    for pending in [10usize, 100, 1000] {
        let requests: Vec<PendingRequest> = (0..pending as u64)
            .map(|raw| {
                PendingRequest::new(
                    SteamApiCall(raw + 1),
                    CallbackId::LEADERBOARD_FIND_RESULT,
                    12,
                    |_| {},
                    |_| {},
                )
            })
            .collect();

        group.throughput(Throughput::Elements(pending as u64));
        group.bench_with_input(BenchmarkId::new("waiting", pending), &requests, |b, requests| {
            b.iter(|| {
                let now = Instant::now();
                for request in requests {
                    black_box(evaluate(request, now, timeout, &native));
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decode, bench_poll_decisions);
criterion_main!(benches);
