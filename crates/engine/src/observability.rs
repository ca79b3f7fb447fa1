//! Observability infrastructure for the capacity engine
//!
//! Provides:
//! - Prometheus metrics (scoring latency, batch sizes, fallback and item
//!   failure counts, label distribution)
//! - Structured event logging with tracing

use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Histogram, IntCounter,
    IntCounterVec,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<EngineMetricsInner> = OnceLock::new();

struct EngineMetricsInner {
    scoring_latency_seconds: Histogram,
    batch_latency_seconds: Histogram,
    scores_computed: IntCounter,
    fallback_scores: IntCounter,
    batch_item_errors: IntCounter,
    recommendations_generated: IntCounter,
    scores_by_label: IntCounterVec,
}

impl EngineMetricsInner {
    fn new() -> Self {
        Self {
            scoring_latency_seconds: register_histogram!(
                "capacity_engine_scoring_latency_seconds",
                "Time spent computing a single capacity score",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register scoring_latency_seconds"),

            batch_latency_seconds: register_histogram!(
                "capacity_engine_batch_latency_seconds",
                "Time spent processing a scoring batch",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register batch_latency_seconds"),

            scores_computed: register_int_counter!(
                "capacity_engine_scores_computed_total",
                "Total number of capacity scores computed"
            )
            .expect("Failed to register scores_computed"),

            fallback_scores: register_int_counter!(
                "capacity_engine_fallback_scores_total",
                "Scores produced by the degraded fallback path"
            )
            .expect("Failed to register fallback_scores"),

            batch_item_errors: register_int_counter!(
                "capacity_engine_batch_item_errors_total",
                "Per-combination failures recorded during batch scoring"
            )
            .expect("Failed to register batch_item_errors"),

            recommendations_generated: register_int_counter!(
                "capacity_engine_recommendations_generated_total",
                "Total number of recommendation lookups served"
            )
            .expect("Failed to register recommendations_generated"),

            scores_by_label: register_int_counter_vec!(
                "capacity_engine_scores_by_label_total",
                "Computed scores partitioned by availability label",
                &["label"]
            )
            .expect("Failed to register scores_by_label"),
        }
    }
}

/// Engine metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance; clones share the same
/// underlying metrics.
#[derive(Clone)]
pub struct EngineMetrics {
    _private: (),
}

impl Default for EngineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(EngineMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &EngineMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    pub fn observe_scoring_latency(&self, duration_secs: f64) {
        self.inner().scoring_latency_seconds.observe(duration_secs);
    }

    pub fn observe_batch_latency(&self, duration_secs: f64) {
        self.inner().batch_latency_seconds.observe(duration_secs);
    }

    pub fn inc_scores_computed(&self, label: &str) {
        self.inner().scores_computed.inc();
        self.inner().scores_by_label.with_label_values(&[label]).inc();
    }

    pub fn inc_fallback_scores(&self) {
        self.inner().fallback_scores.inc();
    }

    pub fn inc_batch_item_errors(&self, count: u64) {
        self.inner().batch_item_errors.inc_by(count);
    }

    pub fn inc_recommendations_generated(&self) {
        self.inner().recommendations_generated.inc();
    }
}

/// Structured logger for significant engine events
#[derive(Clone)]
pub struct EventLogger {
    service_name: String,
}

impl EventLogger {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    /// Log a computed capacity score
    pub fn log_score(
        &self,
        region: &str,
        sku: &str,
        score: u8,
        label: &str,
        confidence: f64,
        sample_count: u64,
    ) {
        info!(
            event = "score_computed",
            service = %self.service_name,
            region = %region,
            sku = %sku,
            score = score,
            label = %label,
            confidence = confidence,
            sample_count = sample_count,
            "Computed capacity score"
        );
    }

    /// Log a fallback score produced after a provider failure or empty window
    pub fn log_fallback(&self, region: &str, sku: &str, cause: &str) {
        warn!(
            event = "fallback_score",
            service = %self.service_name,
            region = %region,
            sku = %sku,
            cause = %cause,
            "Degraded to fallback capacity score"
        );
    }

    /// Log completion of a batch run
    pub fn log_batch(&self, requested: usize, scored: usize, failed: usize, duration_ms: u64) {
        info!(
            event = "batch_completed",
            service = %self.service_name,
            requested = requested,
            scored = scored,
            failed = failed,
            duration_ms = duration_ms,
            "Batch scoring completed"
        );
    }

    /// Log a recommendation lookup
    pub fn log_recommendation(
        &self,
        region: &str,
        sku: &str,
        region_alternatives: usize,
        sku_alternatives: usize,
        strength: &str,
    ) {
        info!(
            event = "recommendation_generated",
            service = %self.service_name,
            region = %region,
            sku = %sku,
            region_alternatives = region_alternatives,
            sku_alternatives = sku_alternatives,
            strength = %strength,
            "Generated alternative recommendations"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_metrics_creation() {
        // Metrics live in the Prometheus global registry, so exercise the
        // handle rather than asserting registry contents.
        let metrics = EngineMetrics::new();

        metrics.observe_scoring_latency(0.002);
        metrics.observe_batch_latency(0.5);
        metrics.inc_scores_computed("AVAILABLE");
        metrics.inc_fallback_scores();
        metrics.inc_batch_item_errors(3);
        metrics.inc_recommendations_generated();
    }

    #[test]
    fn test_event_logger_creation() {
        let logger = EventLogger::new("test-engine");
        assert_eq!(logger.service_name, "test-engine");
    }
}
