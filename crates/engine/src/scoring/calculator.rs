//! Score calculation
//!
//! Four sub-scores (provisioning success, provisioning speed, capacity
//! stability, spot-market health) are each mapped to 0-100, weighted, and
//! classified against configured thresholds. Confidence is derived from
//! sample volume and telemetry age.

use crate::config::ScoringConfig;
use crate::error::EngineError;
use crate::models::{AvailabilityLabel, CapacityScore, ProbeMetricsWindow, SpotMetricsWindow};
use crate::provider::MetricsProvider;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Score assigned when the provider fails or the window is empty
pub const FALLBACK_SCORE: u8 = 50;

/// Confidence assigned alongside the fallback score
pub const FALLBACK_CONFIDENCE: f64 = 0.3;

/// Neutral sub-score used when a window carries no samples for that signal
const NEUTRAL_SUB_SCORE: f64 = 50.0;

/// Relative weight of each sub-score in the aggregate
///
/// Caller-supplied weights are used as-is even when they do not sum to 1.0;
/// this lets callers experiment with emphasis but silently rescales the
/// 0-100 range, so overrides should be chosen deliberately.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub success_rate: f64,
    pub provision_speed: f64,
    pub capacity_stability: f64,
    pub spot_market_health: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            success_rate: 0.40,
            provision_speed: 0.25,
            capacity_stability: 0.20,
            spot_market_health: 0.15,
        }
    }
}

/// Computes availability scores for (region, SKU) combinations
pub struct ScoreCalculator {
    provider: Arc<dyn MetricsProvider>,
    config: ScoringConfig,
}

impl ScoreCalculator {
    pub fn new(provider: Arc<dyn MetricsProvider>, config: ScoringConfig) -> Self {
        Self { provider, config }
    }

    /// Compute a score, degrading provider failures to the fallback score
    ///
    /// Scoring is advisory, not transactional: a failed or empty telemetry
    /// fetch yields the named fallback rather than an error.
    pub async fn compute(
        &self,
        region: &str,
        sku: &str,
        window_hours: u32,
        weights: Option<ScoreWeights>,
    ) -> Result<CapacityScore, EngineError> {
        match self.try_compute(region, sku, window_hours, weights).await {
            Ok(score) => Ok(score),
            Err(EngineError::Provider(e)) => {
                warn!(region = %region, sku = %sku, error = %e, "Provider failed, using fallback score");
                let now = Utc::now();
                let start = now - Duration::hours(i64::from(window_hours));
                Ok(fallback_score(region, sku, start, now, &self.config))
            }
            Err(other) => Err(other),
        }
    }

    /// Compute a score, surfacing provider failures to the caller
    ///
    /// The batch scheduler uses this variant so a failed combination is
    /// recorded as a per-item error instead of a silent fallback score.
    pub async fn try_compute(
        &self,
        region: &str,
        sku: &str,
        window_hours: u32,
        weights: Option<ScoreWeights>,
    ) -> Result<CapacityScore, EngineError> {
        if window_hours == 0 {
            return Err(EngineError::InvalidWindow(0));
        }

        let now = Utc::now();
        let start = now - Duration::hours(i64::from(window_hours));

        let probe = self
            .provider
            .fetch_probe_window(region, sku, start, now)
            .await
            .map_err(EngineError::Provider)?;
        let spot = self
            .provider
            .fetch_spot_window(region, sku, start, now)
            .await
            .map_err(EngineError::Provider)?;

        if probe.total_probes == 0 && spot.total_signals == 0 {
            debug!(region = %region, sku = %sku, "Empty telemetry window, using fallback score");
            return Ok(fallback_score(region, sku, start, now, &self.config));
        }

        let weights = weights.unwrap_or_default();
        Ok(score_window(
            &probe,
            &spot,
            &weights,
            &self.config,
            window_hours,
            now,
        ))
    }
}

/// Pure scoring core: deterministic for a fixed clock value
pub fn score_window(
    probe: &ProbeMetricsWindow,
    spot: &SpotMetricsWindow,
    weights: &ScoreWeights,
    config: &ScoringConfig,
    window_hours: u32,
    now: DateTime<Utc>,
) -> CapacityScore {
    let success_score = probe.effective_success_rate() * 100.0;
    let speed_score = if probe.successful_probes == 0 {
        NEUTRAL_SUB_SCORE
    } else {
        speed_sub_score(probe.avg_provision_millis, config)
    };
    let stability_score = if probe.total_probes == 0 {
        NEUTRAL_SUB_SCORE
    } else {
        (1.0 - probe.error_rate.clamp(0.0, 1.0)) * 100.0
    };
    let spot_score = if spot.total_signals == 0 {
        NEUTRAL_SUB_SCORE
    } else {
        (1.0 - spot.avg_market_stress.clamp(0.0, 1.0)) * 100.0
    };

    let raw = success_score * weights.success_rate
        + speed_score * weights.provision_speed
        + stability_score * weights.capacity_stability
        + spot_score * weights.spot_market_health;
    let score = raw.round().clamp(0.0, 100.0) as u8;

    let sample_count = probe.total_probes + spot.total_signals;
    let confidence = confidence_for(
        sample_count,
        window_hours,
        probe.last_probe_timestamp,
        spot.last_signal_timestamp,
        now,
    );
    let label = label_for(score, config);
    let data_freshness =
        freshness_for(probe.last_probe_timestamp, spot.last_signal_timestamp, now);

    CapacityScore {
        region: probe.region.clone(),
        sku: probe.sku.clone(),
        score,
        label,
        confidence,
        success_rate: probe.effective_success_rate(),
        avg_provision_millis: probe.avg_provision_millis,
        error_rate: probe.error_rate,
        market_stress: spot.avg_market_stress,
        sample_count,
        data_freshness,
        window_start: probe.window_start,
        window_end: probe.window_end,
        calculated_at: now,
        recommendation_text: Some(recommendation_text(score, config)),
        alternative_hints: alternative_hints(score, &probe.region, &probe.sku, config),
    }
}

/// Well-defined degraded score for failed or empty telemetry fetches
pub fn fallback_score(
    region: &str,
    sku: &str,
    window_start: DateTime<Utc>,
    now: DateTime<Utc>,
    config: &ScoringConfig,
) -> CapacityScore {
    CapacityScore {
        region: region.to_string(),
        sku: sku.to_string(),
        score: FALLBACK_SCORE,
        label: AvailabilityLabel::Limited,
        confidence: FALLBACK_CONFIDENCE,
        success_rate: 0.0,
        avg_provision_millis: 0.0,
        error_rate: 0.0,
        market_stress: 0.0,
        sample_count: 0,
        data_freshness: 0.0,
        window_start,
        window_end: now,
        calculated_at: now,
        recommendation_text: Some(recommendation_text(FALLBACK_SCORE, config)),
        alternative_hints: alternative_hints(FALLBACK_SCORE, region, sku, config),
    }
}

/// Linear inverse mapping of provision latency between the fast and slow bounds
fn speed_sub_score(avg_provision_millis: f64, config: &ScoringConfig) -> f64 {
    let span = config.slow_provision_millis - config.fast_provision_millis;
    ((config.slow_provision_millis - avg_provision_millis) / span).clamp(0.0, 1.0) * 100.0
}

/// Classify a score against the configured thresholds
pub fn label_for(score: u8, config: &ScoringConfig) -> AvailabilityLabel {
    if score >= config.available_threshold {
        AvailabilityLabel::Available
    } else if score >= config.limited_threshold {
        AvailabilityLabel::Limited
    } else {
        AvailabilityLabel::Unavailable
    }
}

/// Sample-volume and freshness based confidence, 0.0..=1.0
fn confidence_for(
    sample_count: u64,
    window_hours: u32,
    last_probe: Option<DateTime<Utc>>,
    last_signal: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> f64 {
    let expected = f64::from(window_hours) * 2.0;
    let sample_component = (sample_count as f64 / expected).min(1.0);

    let freshness_component = match avg_age_seconds(last_probe, last_signal, now) {
        Some(age_secs) => (1.0 - (age_secs / 3600.0) / 2.0).max(0.0),
        None => 0.0,
    };

    (0.6 * sample_component + 0.4 * freshness_component).clamp(0.0, 1.0)
}

/// Minute-granularity staleness indicator, separate from confidence
fn freshness_for(
    last_probe: Option<DateTime<Utc>>,
    last_signal: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> f64 {
    match avg_age_seconds(last_probe, last_signal, now) {
        Some(age_secs) => (1.0 - (age_secs / 60.0) / 60.0).max(0.0),
        None => 0.0,
    }
}

/// Mean age of the available telemetry timestamps, in seconds
fn avg_age_seconds(
    last_probe: Option<DateTime<Utc>>,
    last_signal: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<f64> {
    let ages: Vec<f64> = [last_probe, last_signal]
        .iter()
        .flatten()
        .map(|ts| (now - *ts).num_seconds().max(0) as f64)
        .collect();
    if ages.is_empty() {
        None
    } else {
        Some(ages.iter().sum::<f64>() / ages.len() as f64)
    }
}

/// Human-readable guidance, a pure function of the score band
fn recommendation_text(score: u8, config: &ScoringConfig) -> String {
    if score >= config.available_threshold {
        "Capacity is healthy; provisioning should succeed on the first attempt.".to_string()
    } else if score >= config.hint_threshold {
        "Capacity is generally available; occasional retries may be needed.".to_string()
    } else if score >= config.limited_threshold {
        "Capacity is constrained; consider an alternative region or SKU.".to_string()
    } else {
        "Capacity is severely constrained; switching region or SKU is strongly recommended."
            .to_string()
    }
}

/// Short textual hints attached to poorly scoring combinations
fn alternative_hints(
    score: u8,
    region: &str,
    sku: &str,
    config: &ScoringConfig,
) -> Option<Vec<String>> {
    if score >= config.hint_threshold {
        return None;
    }
    Some(vec![
        format!("Check nearby regions for {sku} availability"),
        format!("Consider a similar GPU SKU in {region}"),
    ])
}
