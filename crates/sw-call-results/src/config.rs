//! # Bridge Configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::{
    BridgeError, DEFAULT_CALL_TIMEOUT_MS, DEFAULT_CHANNEL_CAPACITY, DEFAULT_POLL_INTERVAL_MS,
};

/// Call-result bridge configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Interval between driver ticks while work is pending.
    pub poll_interval_ms: u64,

    /// Default time a request may stay pending.
    pub call_timeout_ms: u64,

    /// Capacity of the submission channel. Submitters wait when it is full.
    pub channel_capacity: usize,

    /// Name of the OS thread used by the dedicated driver.
    pub thread_name: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            call_timeout_ms: DEFAULT_CALL_TIMEOUT_MS,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            thread_name: "sw-call-results".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Create a config for testing (short timeout).
    pub fn for_testing() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            call_timeout_ms: 200,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            thread_name: "sw-call-results-test".to_string(),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    /// Reject values the driver cannot run with.
    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.poll_interval_ms == 0 {
            return Err(BridgeError::InvalidConfig(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.channel_capacity == 0 {
            return Err(BridgeError::InvalidConfig(
                "channel_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
