//! # Steam Client
//!
//! Entry point of the binding: owns the loaded library, runs the lifecycle
//! calls and hands out interface wrappers. The call-result bridge is started
//! the first time an asynchronous operation needs it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use sw_call_results::{BridgeError, BridgeHandle, SharedBridge};
use sw_types::{AppId, SteamApiInitResult};
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::{info, warn};

use crate::adapters::SteamCallbacks;
use crate::config::NativeConfig;
use crate::errors::NativeError;
use crate::ffi::{SteamErrMsg, STEAM_ERR_MSG_LEN};
use crate::interfaces::{Apps, Friends, Input, RemoteStorage, User, UserStats, Utils};
use crate::leaderboards::Leaderboards;
use crate::loader::SteamApi;
use crate::marshal::c_chars_to_string;
use crate::warnings::warning_trampoline;

/// How long `shutdown` waits for the bridge driver before unloading.
const BRIDGE_STOP_TIMEOUT: Duration = Duration::from_secs(2);

/// Loaded Steamworks library plus its lazily started bridge.
#[derive(Debug)]
pub struct SteamClient {
    api: Arc<SteamApi>,
    config: NativeConfig,
    bridge: SharedBridge,
    initialized: AtomicBool,
    shut_down: AtomicBool,
}

impl SteamClient {
    /// Locate and load the library. Does not initialize it.
    pub fn load(config: NativeConfig) -> Result<Self, NativeError> {
        config.bridge.validate()?;
        let api = Arc::new(SteamApi::from_config(&config)?);
        Ok(Self {
            api,
            bridge: SharedBridge::new(config.bridge.clone()),
            config,
            initialized: AtomicBool::new(false),
            shut_down: AtomicBool::new(false),
        })
    }

    /// [`SteamClient::load`] with [`NativeConfig::from_env`].
    pub fn from_env() -> Result<Self, NativeError> {
        Self::load(NativeConfig::from_env())
    }

    pub fn config(&self) -> &NativeConfig {
        &self.config
    }

    pub fn api(&self) -> &Arc<SteamApi> {
        &self.api
    }

    /// Whether the process should exit because Steam is relaunching it.
    pub fn restart_app_if_necessary(&self, app_id: AppId) -> bool {
        // SAFETY: plain value argument.
        let restart = unsafe { (self.api.restart_app_if_necessary)(app_id.raw()) };
        if restart {
            info!(%app_id, "Steam is relaunching the app");
        }
        restart
    }

    /// `SteamAPI_InitFlat`. On success also routes native warnings into the
    /// log.
    pub fn init(&self) -> Result<(), NativeError> {
        let mut message: SteamErrMsg = [0; STEAM_ERR_MSG_LEN];
        // SAFETY: `message` is exactly the SteamErrMsg buffer the call expects.
        let result = unsafe { (self.api.init_flat)(&mut message) };

        if !matches!(SteamApiInitResult::try_from(result), Ok(SteamApiInitResult::Ok)) {
            let message = c_chars_to_string(&message);
            warn!(result, %message, "Steamworks initialization failed");
            return Err(NativeError::InitFailed { result, message });
        }

        self.initialized.store(true, Ordering::SeqCst);
        match self.utils() {
            Ok(utils) => utils.set_warning_message_hook(Some(warning_trampoline)),
            Err(e) => warn!(error = %e, "Native warnings will not be logged"),
        }
        info!(path = %self.api.path().display(), "Steamworks initialized");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// `SteamAPI_RunCallbacks`.
    ///
    /// The bridge already calls this every tick while requests are pending;
    /// call it yourself only when no asynchronous operation is in use.
    pub fn run_callbacks(&self) {
        // SAFETY: no arguments.
        unsafe { (self.api.run_callbacks)() }
    }

    /// Stop the bridge, then `SteamAPI_Shutdown`.
    ///
    /// Pending asynchronous operations are abandoned; their callbacks never
    /// run. On a current-thread runtime the driver is closed but not waited
    /// for.
    pub fn shutdown(&self) {
        self.shut_down.store(true, Ordering::SeqCst);
        if let Some(bridge) = self.bridge.get() {
            bridge.close();
            wait_for_stop(bridge);
        }
        if self.initialized.swap(false, Ordering::SeqCst) {
            // SAFETY: no arguments; the bridge no longer calls into the library.
            unsafe { (self.api.shutdown)() }
            info!("Steamworks shut down");
        }
    }

    pub fn apps(&self) -> Result<Apps, NativeError> {
        Apps::new(Arc::clone(&self.api))
    }

    pub fn friends(&self) -> Result<Friends, NativeError> {
        Friends::new(Arc::clone(&self.api))
    }

    pub fn input(&self) -> Result<Input, NativeError> {
        Input::new(Arc::clone(&self.api))
    }

    pub fn remote_storage(&self) -> Result<RemoteStorage, NativeError> {
        RemoteStorage::new(Arc::clone(&self.api))
    }

    pub fn user(&self) -> Result<User, NativeError> {
        User::new(Arc::clone(&self.api))
    }

    pub fn user_stats(&self) -> Result<UserStats, NativeError> {
        UserStats::new(Arc::clone(&self.api))
    }

    pub fn utils(&self) -> Result<Utils, NativeError> {
        Utils::new(Arc::clone(&self.api))
    }

    /// The call-result bridge, started on first use.
    pub fn bridge(&self) -> Result<&BridgeHandle, NativeError> {
        if let Some(bridge) = self.bridge.get() {
            return Ok(bridge);
        }
        if self.shut_down.load(Ordering::SeqCst) {
            return Err(BridgeError::Closed.into());
        }
        let callbacks = SteamCallbacks::new(Arc::clone(&self.api))?;
        Ok(self.bridge.get_or_start(move || Arc::new(callbacks))?)
    }

    /// Leaderboard operations over this client's bridge.
    pub fn leaderboards(&self) -> Result<Leaderboards, NativeError> {
        Ok(Leaderboards::new(self.user_stats()?, self.bridge()?.clone()))
    }
}

/// Wait, bounded, for the driver to stop. Returns whether it did.
fn wait_for_stop(bridge: &BridgeHandle) -> bool {
    let stopped = match Handle::try_current() {
        Err(_) => {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    warn!(error = %e, "Cannot wait for the call-result bridge to stop");
                    return false;
                }
            };
            runtime
                .block_on(tokio::time::timeout(BRIDGE_STOP_TIMEOUT, bridge.closed()))
                .is_ok()
        }
        Ok(runtime) if matches!(runtime.runtime_flavor(), RuntimeFlavor::MultiThread) => {
            tokio::task::block_in_place(|| {
                runtime.block_on(tokio::time::timeout(BRIDGE_STOP_TIMEOUT, bridge.closed()))
            })
            .is_ok()
        }
        Ok(_) => {
            warn!("Shutdown on a current-thread runtime; not waiting for the call-result bridge");
            return false;
        }
    };

    if !stopped {
        warn!(timeout = ?BRIDGE_STOP_TIMEOUT, "Call-result bridge did not stop in time");
    }
    stopped
}

#[cfg(test)]
mod tests {
    use super::*;
    use sw_call_results::{BridgeConfig, CallResultBridge, MockNativeCallbacks};

    fn closed_bridge() -> BridgeHandle {
        let native = Arc::new(MockNativeCallbacks::new());
        let bridge =
            CallResultBridge::spawn_dedicated(BridgeConfig::for_testing(), native).unwrap();
        bridge.close();
        bridge
    }

    #[test]
    fn test_wait_for_stop_from_plain_thread() {
        assert!(wait_for_stop(&closed_bridge()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_wait_for_stop_inside_multi_thread_runtime() {
        assert!(wait_for_stop(&closed_bridge()));
    }

    #[tokio::test]
    async fn test_wait_for_stop_inside_current_thread_runtime() {
        let bridge = closed_bridge();
        assert!(!wait_for_stop(&bridge));
        bridge.closed().await;
        assert!(bridge.is_closed());
    }
}
