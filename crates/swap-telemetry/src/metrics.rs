//! Prometheus metrics for the swap engine.
//!
//! All metrics follow the naming convention: `swap_engine_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Confirmation feed items by outcome
    pub static ref FEED_ITEMS: CounterVec = CounterVec::new(
        Opts::new("swap_engine_feed_items_total", "Confirmation feed items processed"),
        &["network", "outcome"]  // outcome: applied/ignored/failed
    ).expect("metric creation failed");

    /// Time spent draining one confirmation batch
    pub static ref FEED_DRAIN_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "swap_engine_feed_drain_duration_seconds",
            "Time spent applying one batch of confirmations"
        ).buckets(exponential_buckets(0.0001, 2.0, 14).expect("bucket layout"))
    ).expect("metric creation failed");
}

/// Handle returned once the metrics are registered.
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
///
/// Fails when called a second time in the same process.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(FEED_ITEMS.clone()),
        Box::new(FEED_DRAIN_DURATION.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
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

/// Count one drained feed batch for `network`.
pub fn record_feed(network: &str, applied: usize, ignored: usize, failed: usize) {
    for (outcome, count) in [("applied", applied), ("ignored", ignored), ("failed", failed)] {
        FEED_ITEMS
            .with_label_values(&[network, outcome])
            .inc_by(count as f64);
    }
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
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
