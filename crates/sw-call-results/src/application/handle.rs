//! # Bridge Handle
//!
//! Cheap, cloneable front end of a running driver. Every method may be called
//! from any thread; continuations running on the driver may call them too.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use super::service::{stage_deferral, stage_submission};
use crate::domain::{BridgeError, BridgeStats, DeferredCallback, PendingRequest, StatsSnapshot};
use crate::ports::CallResultApi;

/// Handle to a call-result bridge.
#[derive(Clone)]
pub struct BridgeHandle {
    id: u64,
    submissions: mpsc::Sender<PendingRequest>,
    deferrals: mpsc::UnboundedSender<DeferredCallback>,
    shutdown: Arc<watch::Sender<bool>>,
    stopped: watch::Receiver<bool>,
    stats: Arc<BridgeStats>,
}

impl BridgeHandle {
    pub(crate) fn new(
        id: u64,
        submissions: mpsc::Sender<PendingRequest>,
        deferrals: mpsc::UnboundedSender<DeferredCallback>,
        shutdown: watch::Sender<bool>,
        stopped: watch::Receiver<bool>,
        stats: Arc<BridgeStats>,
    ) -> Self {
        Self {
            id,
            submissions,
            deferrals,
            shutdown: Arc::new(shutdown),
            stopped,
            stats,
        }
    }

    /// Process-unique bridge id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Hand `request` to the driver, waiting while the channel is full.
    ///
    /// Called from one of this bridge's own continuations, the request is
    /// staged locally and accepted on the next tick without waiting.
    pub async fn submit(&self, mut request: PendingRequest) -> Result<(), BridgeError> {
        if self.is_closed() {
            return Err(BridgeError::Closed);
        }
        request.mark_submitted();
        match stage_submission(self.id, request) {
            Ok(()) => Ok(()),
            Err(request) => self
                .submissions
                .send(request)
                .await
                .map_err(|_| BridgeError::Closed),
        }
    }

    /// Synchronous form of [`BridgeHandle::submit`].
    ///
    /// Never panics, whatever the caller's context. With room in the channel
    /// the request is handed over immediately. On a full channel the caller
    /// blocks, except on a current-thread runtime where blocking would stall
    /// the runtime; there the send is finished by a task on that runtime.
    pub fn blocking_submit(&self, mut request: PendingRequest) -> Result<(), BridgeError> {
        if self.is_closed() {
            return Err(BridgeError::Closed);
        }
        request.mark_submitted();
        let request = match stage_submission(self.id, request) {
            Ok(()) => return Ok(()),
            Err(request) => request,
        };

        let request = match self.submissions.try_send(request) {
            Ok(()) => return Ok(()),
            Err(TrySendError::Closed(_)) => return Err(BridgeError::Closed),
            Err(TrySendError::Full(request)) => request,
        };

        match Handle::try_current() {
            Err(_) => self
                .submissions
                .blocking_send(request)
                .map_err(|_| BridgeError::Closed),
            Ok(runtime) if matches!(runtime.runtime_flavor(), RuntimeFlavor::MultiThread) => {
                tokio::task::block_in_place(|| self.submissions.blocking_send(request))
                    .map_err(|_| BridgeError::Closed)
            }
            Ok(runtime) => {
                debug!(bridge = self.id, call = %request.call(), "Channel full; finishing submission on a task");
                let submissions = self.submissions.clone();
                runtime.spawn(async move {
                    let _ = submissions.send(request).await;
                });
                Ok(())
            }
        }
    }

    /// Queue a deferred callback. It is first invoked on a tick after the
    /// one in which it was registered.
    pub fn register_deferred(&self, callback: DeferredCallback) -> Result<(), BridgeError> {
        if self.is_closed() {
            return Err(BridgeError::Closed);
        }
        match stage_deferral(self.id, callback) {
            Ok(()) => Ok(()),
            Err(callback) => self
                .deferrals
                .send(callback)
                .map_err(|_| BridgeError::Closed),
        }
    }

    /// Ask the driver to stop. Idempotent.
    pub fn close(&self) {
        if !self.shutdown.send_replace(true) {
            info!(bridge = self.id, "Closing call-result bridge");
        }
    }

    /// `close` was called or the driver has already stopped.
    pub fn is_closed(&self) -> bool {
        *self.shutdown.borrow() || *self.stopped.borrow() || self.stopped.has_changed().is_err()
    }

    /// Wait until the driver has stopped.
    pub async fn closed(&self) {
        let mut stopped = self.stopped.clone();
        let _ = stopped.wait_for(|stopped| *stopped).await;
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

impl std::fmt::Debug for BridgeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeHandle")
            .field("id", &self.id)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CallResultApi for BridgeHandle {
    async fn submit(&self, request: PendingRequest) -> Result<(), BridgeError> {
        BridgeHandle::submit(self, request).await
    }

    fn register_deferred(&self, callback: DeferredCallback) -> Result<(), BridgeError> {
        BridgeHandle::register_deferred(self, callback)
    }

    fn close(&self) {
        BridgeHandle::close(self)
    }

    fn stats(&self) -> StatsSnapshot {
        BridgeHandle::stats(self)
    }
}
