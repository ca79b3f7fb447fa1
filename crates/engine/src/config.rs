//! Engine configuration
//!
//! Thresholds and batch limits are configuration rather than literals in the
//! scoring code; defaults mirror the documented contract values.

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

/// Score at or above which a combination is labeled AVAILABLE
pub const DEFAULT_AVAILABLE_THRESHOLD: u8 = 75;

/// Score at or above which a combination is labeled LIMITED
pub const DEFAULT_LIMITED_THRESHOLD: u8 = 40;

/// Provision latency mapped to a speed score of 100
pub const DEFAULT_FAST_PROVISION_MILLIS: f64 = 3_000.0;

/// Provision latency mapped to a speed score of 0
pub const DEFAULT_SLOW_PROVISION_MILLIS: f64 = 10_000.0;

/// Scores below this band get alternative hints attached
pub const DEFAULT_HINT_THRESHOLD: u8 = 60;

/// Scoring thresholds and bounds
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_available_threshold")]
    pub available_threshold: u8,

    #[serde(default = "default_limited_threshold")]
    pub limited_threshold: u8,

    #[serde(default = "default_fast_provision_millis")]
    pub fast_provision_millis: f64,

    #[serde(default = "default_slow_provision_millis")]
    pub slow_provision_millis: f64,

    #[serde(default = "default_hint_threshold")]
    pub hint_threshold: u8,
}

fn default_available_threshold() -> u8 {
    DEFAULT_AVAILABLE_THRESHOLD
}

fn default_limited_threshold() -> u8 {
    DEFAULT_LIMITED_THRESHOLD
}

fn default_fast_provision_millis() -> f64 {
    DEFAULT_FAST_PROVISION_MILLIS
}

fn default_slow_provision_millis() -> f64 {
    DEFAULT_SLOW_PROVISION_MILLIS
}

fn default_hint_threshold() -> u8 {
    DEFAULT_HINT_THRESHOLD
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            available_threshold: DEFAULT_AVAILABLE_THRESHOLD,
            limited_threshold: DEFAULT_LIMITED_THRESHOLD,
            fast_provision_millis: DEFAULT_FAST_PROVISION_MILLIS,
            slow_provision_millis: DEFAULT_SLOW_PROVISION_MILLIS,
            hint_threshold: DEFAULT_HINT_THRESHOLD,
        }
    }
}

/// Batch scheduler limits
#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    /// Upfront cap on combinations per batch; guardrail against runaway cost
    #[serde(default = "default_max_combinations")]
    pub max_combinations: usize,

    /// Bounded worker pool width
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// Minimum spacing between provider calls per worker, in milliseconds
    #[serde(default = "default_inter_request_delay_ms")]
    pub inter_request_delay_ms: u64,
}

fn default_max_combinations() -> usize {
    20
}

fn default_worker_count() -> usize {
    3
}

fn default_inter_request_delay_ms() -> u64 {
    250
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_combinations: default_max_combinations(),
            worker_count: default_worker_count(),
            inter_request_delay_ms: default_inter_request_delay_ms(),
        }
    }
}

impl BatchConfig {
    pub fn inter_request_delay(&self) -> Duration {
        Duration::from_millis(self.inter_request_delay_ms)
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub batch: BatchConfig,
}

impl EngineConfig {
    /// Load configuration from the environment (ENGINE_ prefix)
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("ENGINE").separator("__"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_default())
    }
}
