//! Telemetry configuration from environment variables.

use serde::{Deserialize, Serialize};
use std::env;

/// Configuration for logging and metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Service name attached to every log line.
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or a full
    /// `EnvFilter` directive string.
    pub log_level: String,

    /// Whether to write logs to stdout at all.
    pub console_output: bool,

    /// Whether to emit JSON formatted logs instead of the pretty format.
    pub json_logs: bool,

    /// Whether to register the Prometheus collectors.
    pub metrics_enabled: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "steamworks-bridge".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            metrics_enabled: true,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SW_SERVICE_NAME`: Service name (default: steamworks-bridge)
    /// - `SW_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `SW_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `SW_JSON_LOGS`: Enable JSON logs (default: false)
    /// - `SW_METRICS`: Register Prometheus collectors (default: true)
    pub fn from_env() -> Self {
        Self {
            service_name: env::var("SW_SERVICE_NAME")
                .unwrap_or_else(|_| "steamworks-bridge".to_string()),

            log_level: env::var("SW_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("SW_CONSOLE_OUTPUT")
                .map(|v| parse_flag(&v, true))
                .unwrap_or(true),

            json_logs: env::var("SW_JSON_LOGS")
                .map(|v| parse_flag(&v, false))
                .unwrap_or(false),

            metrics_enabled: env::var("SW_METRICS")
                .map(|v| parse_flag(&v, true))
                .unwrap_or(true),
        }
    }

    /// Quiet configuration for tests: warnings only, no metrics registration.
    pub fn for_testing() -> Self {
        Self {
            service_name: "steamworks-bridge-test".to_string(),
            log_level: "warn".to_string(),
            console_output: true,
            json_logs: false,
            metrics_enabled: false,
        }
    }
}

/// Parse a boolean-ish environment value, falling back to `default` when the
/// value is not recognised.
fn parse_flag(value: &str, default: bool) -> bool {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}
