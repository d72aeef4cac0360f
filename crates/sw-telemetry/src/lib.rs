//! # Steamworks Bridge Telemetry
//!
//! Structured logging and Prometheus metrics shared by the bridge crates.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sw_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_telemetry(&config).expect("Failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SW_SERVICE_NAME` | `steamworks-bridge` | Service name on log lines |
//! | `SW_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `SW_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `SW_JSON_LOGS` | `false` | JSON instead of pretty logs |
//! | `SW_METRICS` | `true` | Register Prometheus collectors |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, BRIDGE_TICKS, BRIDGE_TICK_DURATION,
    CALL_RESULTS_COMPLETED, CALL_RESULTS_FAILED, CALL_RESULTS_PENDING, CALL_RESULTS_SUBMITTED,
    CALL_RESULTS_TIMED_OUT, CONTINUATION_PANICS, REGISTRY,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// A global subscriber was already installed.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and, when enabled, register the metrics collectors.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    if config.metrics_enabled {
        register_metrics()?;
    }
    init_logging(config)
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
