//! Structured logging setup.
//!
//! Installs a global `tracing` subscriber with:
//! - an `EnvFilter` built from `RUST_LOG` or the configured level
//! - either a JSON `fmt` layer (machine-readable) or a pretty one (development)
//!
//! Every line carries the target, so bridge logs can be filtered with
//! `sw_call_results=debug` without touching the rest of the process.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Initialize the global `tracing` subscriber.
///
/// # Errors
///
/// - `TelemetryError::Config` if the filter directive does not parse
/// - `TelemetryError::LoggingInit` if a global subscriber is already installed
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::Config(e.to_string()))?;

    let json_layer = (config.console_output && config.json_logs).then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
    });

    let pretty_layer = (config.console_output && !config.json_logs).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_names(true)
            .with_ansi(true)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Logging initialized"
    );

    Ok(())
}

/// Log an event about a specific native call with standard fields.
///
/// ```rust,ignore
/// log_call_event!(warn, request.call(), "Call result timed out", elapsed_ms = 10_000);
/// ```
#[macro_export]
macro_rules! log_call_event {
    ($level:ident, $call:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            call = %$call,
            $($($field)*,)?
            $msg
        )
    };
}
