//! First-use lazy bridge behind a single-initialization guard.

use once_cell::sync::OnceCell;
use std::sync::Arc;

use super::handle::BridgeHandle;
use super::service::CallResultBridge;
use crate::config::BridgeConfig;
use crate::domain::BridgeError;
use crate::ports::NativeCallbacks;

/// Starts a dedicated driver the first time it is needed and hands out the
/// same handle afterwards. Closes the driver when dropped.
#[derive(Debug)]
pub struct SharedBridge {
    config: BridgeConfig,
    cell: OnceCell<BridgeHandle>,
}

impl SharedBridge {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            config,
            cell: OnceCell::new(),
        }
    }

    /// The running bridge, starting it with `native` on first use.
    ///
    /// `native` is only called if the bridge has not been started yet.
    pub fn get_or_start<F>(&self, native: F) -> Result<&BridgeHandle, BridgeError>
    where
        F: FnOnce() -> Arc<dyn NativeCallbacks>,
    {
        self.cell
            .get_or_try_init(|| CallResultBridge::spawn_dedicated(self.config.clone(), native()))
    }

    /// The bridge if it has been started.
    pub fn get(&self) -> Option<&BridgeHandle> {
        self.cell.get()
    }

    pub fn is_started(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl Drop for SharedBridge {
    fn drop(&mut self) {
        if let Some(handle) = self.cell.get() {
            handle.close();
        }
    }
}
