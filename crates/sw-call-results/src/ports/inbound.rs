//! # Inbound Ports
//!
//! API the bridge exposes to typed wrappers.

use async_trait::async_trait;

use crate::domain::{BridgeError, DeferredCallback, PendingRequest, StatsSnapshot};

/// Call-result bridge API - inbound port.
#[async_trait]
pub trait CallResultApi: Send + Sync {
    /// Hand a pending request to the driver.
    ///
    /// Waits only while the submission channel is full.
    async fn submit(&self, request: PendingRequest) -> Result<(), BridgeError>;

    /// Queue one unit of generic callback processing for a later tick.
    fn register_deferred(&self, callback: DeferredCallback) -> Result<(), BridgeError>;

    /// Stop the driver. Pending requests are abandoned.
    fn close(&self);

    /// Current counters.
    fn stats(&self) -> StatsSnapshot;
}
