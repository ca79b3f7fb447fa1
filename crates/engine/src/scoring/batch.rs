//! Batched scoring
//!
//! Fans the score calculator out over many (region, SKU) combinations with a
//! bounded worker pool, per-worker request spacing for upstream quota limits,
//! and partial-failure tolerance: one bad combination never aborts the batch.

use super::ScoreCalculator;
use crate::config::BatchConfig;
use crate::error::{EngineError, ItemError};
use crate::models::CapacityScore;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Partial results of a batch run
#[derive(Debug)]
pub struct BatchOutcome {
    /// Successful scores, sorted descending by score
    pub scores: Vec<CapacityScore>,
    /// Per-combination failures
    pub errors: Vec<ItemError>,
}

/// Schedules score computations across many combinations
pub struct BatchScheduler {
    calculator: Arc<ScoreCalculator>,
    config: BatchConfig,
}

impl BatchScheduler {
    pub fn new(calculator: Arc<ScoreCalculator>, config: BatchConfig) -> Self {
        Self { calculator, config }
    }

    /// Score every combination, tolerating per-item failures
    pub async fn compute_batch(
        &self,
        combinations: &[(String, String)],
        window_hours: u32,
    ) -> Result<BatchOutcome, EngineError> {
        self.compute_batch_until(combinations, window_hours, None)
            .await
    }

    /// Score combinations until an optional deadline fires
    ///
    /// Once the deadline passes, no new work is launched; computations
    /// already in flight finish and their results are included.
    pub async fn compute_batch_until(
        &self,
        combinations: &[(String, String)],
        window_hours: u32,
        deadline: Option<Instant>,
    ) -> Result<BatchOutcome, EngineError> {
        if combinations.len() > self.config.max_combinations {
            return Err(EngineError::BatchSizeExceeded {
                requested: combinations.len(),
                max: self.config.max_combinations,
            });
        }
        if window_hours == 0 {
            return Err(EngineError::InvalidWindow(0));
        }

        info!(
            combinations = combinations.len(),
            window_hours,
            workers = self.config.worker_count,
            "Starting batch scoring"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.worker_count.max(1)));
        let delay = self.config.inter_request_delay();
        let mut join_set = JoinSet::new();
        let mut launched = 0usize;

        for (region, sku) in combinations.iter().cloned() {
            if deadline_passed(deadline) {
                warn!(
                    launched,
                    remaining = combinations.len() - launched,
                    "Batch deadline reached, not launching remaining combinations"
                );
                break;
            }

            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(p) => p,
                Err(_) => break,
            };
            if deadline_passed(deadline) {
                warn!(launched, "Batch deadline reached while waiting for a worker slot");
                break;
            }

            let calculator = Arc::clone(&self.calculator);
            launched += 1;
            join_set.spawn(async move {
                let result = calculator
                    .try_compute(&region, &sku, window_hours, None)
                    .await;
                // Hold the worker slot through the spacing delay so the
                // minimum inter-request interval is kept per worker.
                tokio::time::sleep(delay).await;
                drop(permit);
                (region, sku, result)
            });
        }

        let mut scores = Vec::new();
        let mut errors = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((region, sku, Ok(score))) => {
                    debug!(region = %region, sku = %sku, score = score.score, "Scored combination");
                    scores.push(score);
                }
                Ok((region, sku, Err(e))) => {
                    warn!(region = %region, sku = %sku, error = %e, "Combination failed, continuing batch");
                    errors.push(ItemError::new(region, sku, e.to_string()));
                }
                Err(e) => {
                    warn!(error = %e, "Batch worker task failed");
                }
            }
        }

        scores.sort_by(|a, b| b.score.cmp(&a.score));

        info!(
            scored = scores.len(),
            failed = errors.len(),
            "Batch scoring finished"
        );

        Ok(BatchOutcome { scores, errors })
    }
}

fn deadline_passed(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|d| Instant::now() >= d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;
    use crate::models::{PriceRecord, ProbeMetricsWindow, SpotMetricsWindow};
    use crate::provider::MetricsProvider;
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::collections::HashSet;

    /// Provider with deterministic windows and a configurable failure set
    struct FlakyProvider {
        failing_regions: HashSet<String>,
    }

    impl FlakyProvider {
        fn new(failing: &[&str]) -> Self {
            Self {
                failing_regions: failing.iter().map(|r| r.to_string()).collect(),
            }
        }
    }

    #[async_trait]
    impl MetricsProvider for FlakyProvider {
        async fn fetch_probe_window(
            &self,
            region: &str,
            sku: &str,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> Result<ProbeMetricsWindow> {
            if self.failing_regions.contains(region) {
                bail!("probe backend unavailable for {region}");
            }
            Ok(ProbeMetricsWindow {
                region: region.to_string(),
                sku: sku.to_string(),
                window_start: start,
                window_end: end,
                total_probes: 40,
                successful_probes: 36,
                success_rate: 0.9,
                avg_provision_millis: 4_000.0,
                error_rate: 0.1,
                last_probe_timestamp: Some(end),
            })
        }

        async fn fetch_spot_window(
            &self,
            region: &str,
            sku: &str,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> Result<SpotMetricsWindow> {
            Ok(SpotMetricsWindow {
                region: region.to_string(),
                sku: sku.to_string(),
                window_start: start,
                window_end: end,
                total_signals: 24,
                avg_price_ratio: 0.4,
                avg_volatility: 0.1,
                avg_eviction_rate: 0.05,
                avg_market_stress: 0.2,
                last_signal_timestamp: Some(end),
            })
        }

        async fn fetch_price(&self, _region: &str, _sku: &str) -> Result<Option<PriceRecord>> {
            Ok(None)
        }
    }

    fn scheduler_with(provider: FlakyProvider, config: BatchConfig) -> BatchScheduler {
        let calculator = Arc::new(ScoreCalculator::new(
            Arc::new(provider),
            ScoringConfig::default(),
        ));
        BatchScheduler::new(calculator, config)
    }

    fn fast_config() -> BatchConfig {
        BatchConfig {
            max_combinations: 20,
            worker_count: 4,
            inter_request_delay_ms: 1,
        }
    }

    fn combos(n: usize) -> Vec<(String, String)> {
        (0..n)
            .map(|i| (format!("region{i}"), "Standard_NC6s_v3".to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_partial_failures_do_not_abort() {
        let provider = FlakyProvider::new(&["region3", "region7", "region11"]);
        let scheduler = scheduler_with(provider, fast_config());

        let outcome = scheduler.compute_batch(&combos(20), 24).await.unwrap();

        assert_eq!(outcome.scores.len(), 17);
        assert_eq!(outcome.errors.len(), 3);
        let failed: HashSet<&str> = outcome.errors.iter().map(|e| e.region.as_str()).collect();
        assert!(failed.contains("region3"));
        assert!(failed.contains("region7"));
        assert!(failed.contains("region11"));
    }

    #[tokio::test]
    async fn test_results_sorted_descending() {
        let provider = FlakyProvider::new(&[]);
        let scheduler = scheduler_with(provider, fast_config());

        let outcome = scheduler.compute_batch(&combos(6), 24).await.unwrap();

        assert_eq!(outcome.scores.len(), 6);
        for pair in outcome.scores.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[tokio::test]
    async fn test_batch_size_cap_rejected_upfront() {
        let provider = FlakyProvider::new(&[]);
        let scheduler = scheduler_with(provider, fast_config());

        let err = scheduler.compute_batch(&combos(21), 24).await.unwrap_err();
        match err {
            EngineError::BatchSizeExceeded { requested, max } => {
                assert_eq!(requested, 21);
                assert_eq!(max, 20);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_zero_window_rejected() {
        let provider = FlakyProvider::new(&[]);
        let scheduler = scheduler_with(provider, fast_config());

        let err = scheduler.compute_batch(&combos(2), 0).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidWindow(0)));
    }

    #[tokio::test]
    async fn test_expired_deadline_launches_nothing() {
        let provider = FlakyProvider::new(&[]);
        let scheduler = scheduler_with(provider, fast_config());

        let past = Instant::now() - std::time::Duration::from_millis(10);
        let outcome = scheduler
            .compute_batch_until(&combos(5), 24, Some(past))
            .await
            .unwrap();

        assert!(outcome.scores.is_empty());
        assert!(outcome.errors.is_empty());
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let provider = FlakyProvider::new(&[]);
        let scheduler = scheduler_with(provider, fast_config());

        let outcome = scheduler.compute_batch(&[], 24).await.unwrap();
        assert!(outcome.scores.is_empty());
        assert!(outcome.errors.is_empty());
    }
}
