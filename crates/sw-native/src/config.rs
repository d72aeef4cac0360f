//! Native binding configuration from environment variables.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use sw_call_results::BridgeConfig;
use sw_types::AppId;
use tracing::warn;

/// Where to find the native library and how to run the call-result bridge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NativeConfig {
    /// Explicit library path. When unset the platform file name is searched
    /// next to the executable and in the current directory.
    pub library_path: Option<PathBuf>,

    /// App id for `restart_app_if_necessary`.
    pub app_id: Option<AppId>,

    /// Bridge started on first asynchronous call.
    pub bridge: BridgeConfig,
}

impl NativeConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `STEAMWORKS_LIB`: Library path override
    /// - `STEAMWORKS_APP_ID`: App id (ignored with a warning if not a number)
    pub fn from_env() -> Self {
        let app_id = env::var("STEAMWORKS_APP_ID").ok().and_then(|raw| {
            let parsed = parse_app_id(&raw);
            if parsed.is_none() {
                warn!(value = %raw, "Ignoring STEAMWORKS_APP_ID that is not an app id");
            }
            parsed
        });

        Self {
            library_path: env::var_os("STEAMWORKS_LIB").map(PathBuf::from),
            app_id,
            bridge: BridgeConfig::default(),
        }
    }
}

fn parse_app_id(raw: &str) -> Option<AppId> {
    raw.trim().parse::<u32>().ok().map(AppId)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_app_id() {
        assert_eq!(parse_app_id(" 480 "), Some(AppId(480)));
        assert_eq!(parse_app_id("spacewar"), None);
        assert_eq!(parse_app_id("-1"), None);
    }

    #[test]
    fn test_default_has_no_overrides() {
        let config = NativeConfig::default();
        assert!(config.library_path.is_none());
        assert!(config.app_id.is_none());
        assert_eq!(config.bridge.poll_interval_ms, 20);
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let config = NativeConfig {
            library_path: Some(PathBuf::from("/opt/steam/libsteam_api.so")),
            app_id: Some(AppId(480)),
            bridge: BridgeConfig::for_testing(),
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: NativeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.app_id, Some(AppId(480)));
        assert_eq!(back.bridge.call_timeout_ms, 200);
    }
}
