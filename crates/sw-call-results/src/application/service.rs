//! # Call-Result Bridge Driver
//!
//! One task owns the pending set and the deferred queue. Each tick it:
//!
//! 1. accepts submissions handed over since the last tick
//! 2. merges staged deferred callbacks into the live list
//! 3. invokes the native callback-processing entry point once
//! 4. runs the live deferred callbacks
//! 5. checks every pending request, in acceptance order, for timeout or
//!    readiness and runs the matching continuation
//!
//! With nothing pending and nothing deferred the interval timer is not
//! polled at all; the task sleeps until new work or shutdown arrives.

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use sw_telemetry::{
    log_call_event, metric_inc, time_histogram, BRIDGE_TICKS, BRIDGE_TICK_DURATION,
    CALL_RESULTS_COMPLETED, CALL_RESULTS_FAILED, CALL_RESULTS_PENDING, CALL_RESULTS_SUBMITTED,
    CALL_RESULTS_TIMED_OUT, CONTINUATION_PANICS,
};
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::handle::BridgeHandle;
use crate::algorithms::{evaluate, run_contained, DeferredQueue, PollDecision};
use crate::config::BridgeConfig;
use crate::domain::{
    BridgeError, BridgeStats, CallResultError, DeferredCallback, PendingRequest, TimeoutInfo,
};
use crate::ports::NativeCallbacks;

static NEXT_BRIDGE_ID: AtomicU64 = AtomicU64::new(1);

/// Work handed over from inside the driver's own continuations.
///
/// A continuation runs while the driver holds the pending set, so anything it
/// submits is kept here and accepted at the start of the next tick instead of
/// going through the channel.
struct DriverScope {
    bridge_id: u64,
    submissions: RefCell<Vec<PendingRequest>>,
    deferrals: RefCell<Vec<DeferredCallback>>,
}

tokio::task_local! {
    static DRIVER_SCOPE: DriverScope;
}

/// Keep `request` locally if we are running inside bridge `bridge_id`'s
/// driver. Gives it back otherwise.
pub(crate) fn stage_submission(
    bridge_id: u64,
    request: PendingRequest,
) -> Result<(), PendingRequest> {
    let mut slot = Some(request);
    let _ = DRIVER_SCOPE.try_with(|scope| {
        if scope.bridge_id == bridge_id {
            if let Some(request) = slot.take() {
                scope.submissions.borrow_mut().push(request);
            }
        }
    });
    slot.map_or(Ok(()), Err)
}

pub(crate) fn stage_deferral(
    bridge_id: u64,
    callback: DeferredCallback,
) -> Result<(), DeferredCallback> {
    let mut slot = Some(callback);
    let _ = DRIVER_SCOPE.try_with(|scope| {
        if scope.bridge_id == bridge_id {
            if let Some(callback) = slot.take() {
                scope.deferrals.borrow_mut().push(callback);
            }
        }
    });
    slot.map_or(Ok(()), Err)
}

/// The driver. Owned by exactly one task.
pub struct CallResultBridge {
    id: u64,
    config: BridgeConfig,
    native: Arc<dyn NativeCallbacks>,
    submissions: mpsc::Receiver<PendingRequest>,
    deferrals: mpsc::UnboundedReceiver<DeferredCallback>,
    shutdown: watch::Receiver<bool>,
    stopped: watch::Sender<bool>,
    stats: Arc<BridgeStats>,
    pending: Vec<PendingRequest>,
    deferred: DeferredQueue,
}

impl CallResultBridge {
    /// Build a driver and the handle that feeds it. Nothing runs until
    /// [`CallResultBridge::run`] is awaited.
    pub fn new(
        config: BridgeConfig,
        native: Arc<dyn NativeCallbacks>,
    ) -> Result<(BridgeHandle, Self), BridgeError> {
        config.validate()?;

        let id = NEXT_BRIDGE_ID.fetch_add(1, Ordering::Relaxed);
        let (submission_tx, submission_rx) = mpsc::channel(config.channel_capacity);
        let (deferral_tx, deferral_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (stopped_tx, stopped_rx) = watch::channel(false);
        let stats = Arc::new(BridgeStats::default());

        let handle = BridgeHandle::new(
            id,
            submission_tx,
            deferral_tx,
            shutdown_tx,
            stopped_rx,
            stats.clone(),
        );

        let driver = Self {
            id,
            config,
            native,
            submissions: submission_rx,
            deferrals: deferral_rx,
            shutdown: shutdown_rx,
            stopped: stopped_tx,
            stats,
            pending: Vec::new(),
            deferred: DeferredQueue::new(),
        };

        Ok((handle, driver))
    }

    /// Start the driver on the current tokio runtime.
    pub fn spawn(
        config: BridgeConfig,
        native: Arc<dyn NativeCallbacks>,
    ) -> Result<BridgeHandle, BridgeError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| BridgeError::Runtime(e.to_string()))?;
        let (handle, driver) = Self::new(config, native)?;
        runtime.spawn(driver.run());
        Ok(handle)
    }

    /// Start the driver on its own OS thread with a current-thread runtime,
    /// so every native call it makes comes from that one thread.
    pub fn spawn_dedicated(
        config: BridgeConfig,
        native: Arc<dyn NativeCallbacks>,
    ) -> Result<BridgeHandle, BridgeError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|e| BridgeError::Runtime(e.to_string()))?;
        let thread_name = config.thread_name.clone();
        let (handle, driver) = Self::new(config, native)?;

        std::thread::Builder::new()
            .name(thread_name)
            .spawn(move || runtime.block_on(driver.run()))
            .map_err(|e| BridgeError::Runtime(e.to_string()))?;

        Ok(handle)
    }

    /// Drive until closed or until every handle is dropped.
    pub async fn run(self) {
        let scope = DriverScope {
            bridge_id: self.id,
            submissions: RefCell::new(Vec::new()),
            deferrals: RefCell::new(Vec::new()),
        };
        DRIVER_SCOPE.scope(scope, self.drive()).await;
    }

    async fn drive(mut self) {
        info!(bridge = self.id, "Call-result driver started");

        let mut ticker = interval(self.config.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            if *self.shutdown.borrow() {
                break;
            }

            self.accept_new();

            if self.is_idle() {
                debug!(bridge = self.id, "Nothing pending; driver suspended");
                if !self.wait_for_work().await {
                    break;
                }
                ticker.reset_immediately();
                continue;
            }

            tokio::select! {
                biased;
                _ = self.shutdown.changed() => break,
                _ = ticker.tick() => {}
            }

            self.tick();
        }

        self.stop();
    }

    fn is_idle(&self) -> bool {
        self.pending.is_empty() && self.deferred.is_empty()
    }

    /// Block until new work or shutdown. Returns `false` on shutdown.
    async fn wait_for_work(&mut self) -> bool {
        tokio::select! {
            biased;
            _ = self.shutdown.changed() => false,
            request = self.submissions.recv() => match request {
                Some(request) => {
                    self.accept(request);
                    true
                }
                None => false,
            },
            callback = self.deferrals.recv() => match callback {
                Some(callback) => {
                    self.deferred.register(callback);
                    true
                }
                None => false,
            },
        }
    }

    fn accept_new(&mut self) {
        let (staged_requests, staged_deferrals) = DRIVER_SCOPE
            .try_with(|scope| (scope.submissions.take(), scope.deferrals.take()))
            .unwrap_or_default();

        for request in staged_requests {
            self.accept(request);
        }
        for callback in staged_deferrals {
            self.deferred.register(callback);
        }

        while let Ok(request) = self.submissions.try_recv() {
            self.accept(request);
        }
        while let Ok(callback) = self.deferrals.try_recv() {
            self.deferred.register(callback);
        }
    }

    fn accept(&mut self, request: PendingRequest) {
        debug!(
            bridge = self.id,
            call = %request.call(),
            callback_id = %request.callback_id(),
            record_size = request.record_size(),
            "Accepted call result"
        );
        self.stats.submitted.fetch_add(1, Ordering::Relaxed);
        self.stats.pending.fetch_add(1, Ordering::Relaxed);
        metric_inc!(CALL_RESULTS_SUBMITTED, &[&request.callback_id().to_string()]);
        metric_inc!(CALL_RESULTS_PENDING);
        self.pending.push(request);
    }

    fn tick(&mut self) {
        let _timer = time_histogram!(BRIDGE_TICK_DURATION);
        self.stats.ticks.fetch_add(1, Ordering::Relaxed);
        metric_inc!(BRIDGE_TICKS);

        self.accept_new();
        self.deferred.merge_staged();
        self.native.run_callbacks();

        let deferred = self.deferred.run_live();
        if deferred.panicked > 0 {
            self.stats
                .continuation_panics
                .fetch_add(deferred.panicked as u64, Ordering::Relaxed);
            CONTINUATION_PANICS.inc_by(deferred.panicked as f64);
        }

        let now = Instant::now();
        let default_timeout = self.config.call_timeout();

        for request in std::mem::take(&mut self.pending) {
            let decision = evaluate(&request, now, default_timeout, self.native.as_ref());
            if !matches!(decision, PollDecision::TimedOut(_)) {
                self.stats.native_polls.fetch_add(1, Ordering::Relaxed);
            }

            match decision {
                PollDecision::Waiting => self.pending.push(request),
                PollDecision::TimedOut(info) => self.deliver_timeout(request, info),
                PollDecision::Ready(result) => self.deliver_result(request, result),
            }
        }
    }

    fn deliver_result(&self, request: PendingRequest, result: Result<Vec<u8>, CallResultError>) {
        let call = request.call();
        let label = request.callback_id().to_string();
        self.resolved();

        match &result {
            Ok(bytes) => {
                debug!(call = %call, callback_id = %label, bytes = bytes.len(), "Call result ready");
                self.stats.completed.fetch_add(1, Ordering::Relaxed);
                metric_inc!(CALL_RESULTS_COMPLETED, &[&label]);
            }
            Err(err) => {
                log_call_event!(warn, call, "Call result delivered as error", callback_id = %label, error = %err);
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                metric_inc!(CALL_RESULTS_FAILED, &[&label, failure_reason(err)]);
            }
        }

        if let Err(message) = run_contained(move || request.complete(result)) {
            self.contained_panic(call, &message);
        }
    }

    fn deliver_timeout(&self, request: PendingRequest, info: TimeoutInfo) {
        let call = request.call();
        let label = request.callback_id().to_string();
        self.resolved();

        log_call_event!(
            warn,
            call,
            "Call result timed out",
            callback_id = %label,
            elapsed_ms = info.elapsed.as_millis() as u64
        );
        self.stats.timed_out.fetch_add(1, Ordering::Relaxed);
        metric_inc!(CALL_RESULTS_TIMED_OUT, &[&label]);

        if let Err(message) = run_contained(move || request.expire(info)) {
            self.contained_panic(call, &message);
        }
    }

    fn resolved(&self) {
        self.stats.pending.fetch_sub(1, Ordering::Relaxed);
        CALL_RESULTS_PENDING.dec();
    }

    fn contained_panic(&self, call: sw_types::SteamApiCall, message: &str) {
        error!(call = %call, panic = %message, "Continuation panicked; continuing tick");
        self.stats
            .continuation_panics
            .fetch_add(1, Ordering::Relaxed);
        metric_inc!(CONTINUATION_PANICS);
    }

    fn stop(mut self) {
        let abandoned = self.pending.len();
        if abandoned > 0 {
            warn!(
                bridge = self.id,
                abandoned, "Driver stopped with call results still pending; abandoning them"
            );
            CALL_RESULTS_PENDING.sub(abandoned as f64);
            self.stats.pending.store(0, Ordering::Relaxed);
        }
        self.pending.clear();
        self.stopped.send_replace(true);
        info!(bridge = self.id, "Call-result driver stopped");
    }
}

fn failure_reason(err: &CallResultError) -> &'static str {
    match err {
        CallResultError::NativeFailure => "native_failure",
        CallResultError::BufferTooShort { .. } => "buffer_too_short",
        CallResultError::UnknownCallback(_) => "unknown_callback",
        CallResultError::UnexpectedRecord { .. } => "unexpected_record",
    }
}
