//! Prometheus metrics for the call-result bridge.
//!
//! All metrics follow the naming convention: `sw_<component>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g. call results completed)
//! - **Gauge**: Value that can go up or down (e.g. pending call results)
//! - **Histogram**: Distribution of values (e.g. tick duration)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // CALL RESULT METRICS
    // =========================================================================

    /// Call results submitted to the bridge, by callback id.
    pub static ref CALL_RESULTS_SUBMITTED: CounterVec = CounterVec::new(
        Opts::new("sw_call_results_submitted_total", "Total call results submitted to the bridge"),
        &["callback_id"]
    ).expect("metric creation failed");

    /// Call results delivered successfully, by callback id.
    pub static ref CALL_RESULTS_COMPLETED: CounterVec = CounterVec::new(
        Opts::new("sw_call_results_completed_total", "Total call results completed successfully"),
        &["callback_id"]
    ).expect("metric creation failed");

    /// Call results the native side flagged as failed or that did not decode.
    pub static ref CALL_RESULTS_FAILED: CounterVec = CounterVec::new(
        Opts::new("sw_call_results_failed_total", "Total call results delivered as errors"),
        &["callback_id", "reason"]
    ).expect("metric creation failed");

    /// Call results that ran out of time.
    pub static ref CALL_RESULTS_TIMED_OUT: CounterVec = CounterVec::new(
        Opts::new("sw_call_results_timed_out_total", "Total call results that timed out"),
        &["callback_id"]
    ).expect("metric creation failed");

    /// Call results currently awaiting completion.
    pub static ref CALL_RESULTS_PENDING: Gauge = Gauge::new(
        "sw_call_results_pending",
        "Call results currently awaiting completion"
    ).expect("metric creation failed");

    // =========================================================================
    // DRIVER METRICS
    // =========================================================================

    /// Driver ticks executed.
    pub static ref BRIDGE_TICKS: Counter = Counter::new(
        "sw_bridge_ticks_total",
        "Total polling ticks executed by the bridge driver"
    ).expect("metric creation failed");

    /// Continuations that panicked and were contained.
    pub static ref CONTINUATION_PANICS: Counter = Counter::new(
        "sw_continuation_panics_total",
        "Total continuations that panicked inside the driver"
    ).expect("metric creation failed");

    /// Wall time spent in a single tick.
    pub static ref BRIDGE_TICK_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "sw_bridge_tick_duration_seconds",
            "Time spent in one polling tick"
        ).buckets(exponential_buckets(0.00001, 2.0, 16).expect("valid buckets"))
    ).expect("metric creation failed");
}

/// Register every collector with the global registry.
///
/// # Errors
///
/// Returns `TelemetryError::MetricsInit` if a collector is already registered.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(CALL_RESULTS_SUBMITTED.clone()),
        Box::new(CALL_RESULTS_COMPLETED.clone()),
        Box::new(CALL_RESULTS_FAILED.clone()),
        Box::new(CALL_RESULTS_TIMED_OUT.clone()),
        Box::new(CALL_RESULTS_PENDING.clone()),
        Box::new(BRIDGE_TICKS.clone()),
        Box::new(CONTINUATION_PANICS.clone()),
        Box::new(BRIDGE_TICK_DURATION.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
