//! Core data models for the capacity health engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregated capacity-probe outcomes for one (region, SKU) over a window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeMetricsWindow {
    pub region: String,
    pub sku: String,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub total_probes: u64,
    pub successful_probes: u64,
    /// Fraction of probes that provisioned successfully, 0.0..=1.0.
    /// Undefined when `total_probes == 0`; use [`effective_success_rate`].
    ///
    /// [`effective_success_rate`]: ProbeMetricsWindow::effective_success_rate
    pub success_rate: f64,
    /// Mean provisioning latency of successful probes, in milliseconds
    pub avg_provision_millis: f64,
    pub error_rate: f64,
    pub last_probe_timestamp: Option<DateTime<Utc>>,
}

impl ProbeMetricsWindow {
    /// Success rate with a neutral 0.5 default for empty windows
    pub fn effective_success_rate(&self) -> f64 {
        if self.total_probes == 0 {
            0.5
        } else {
            self.success_rate.clamp(0.0, 1.0)
        }
    }

    /// An empty window carrying no probe outcomes
    pub fn empty(
        region: impl Into<String>,
        sku: impl Into<String>,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Self {
        Self {
            region: region.into(),
            sku: sku.into(),
            window_start,
            window_end,
            total_probes: 0,
            successful_probes: 0,
            success_rate: 0.0,
            avg_provision_millis: 0.0,
            error_rate: 0.0,
            last_probe_timestamp: None,
        }
    }
}

/// Aggregated spot-market signals for one (region, SKU) over a window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotMetricsWindow {
    pub region: String,
    pub sku: String,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub total_signals: u64,
    /// Mean spot/on-demand price ratio, typically in (0, 1]
    pub avg_price_ratio: f64,
    pub avg_volatility: f64,
    pub avg_eviction_rate: f64,
    /// Composite 0-1 market congestion indicator
    pub avg_market_stress: f64,
    pub last_signal_timestamp: Option<DateTime<Utc>>,
}

impl SpotMetricsWindow {
    /// An empty window carrying no spot signals
    pub fn empty(
        region: impl Into<String>,
        sku: impl Into<String>,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Self {
        Self {
            region: region.into(),
            sku: sku.into(),
            window_start,
            window_end,
            total_signals: 0,
            avg_price_ratio: 0.0,
            avg_volatility: 0.0,
            avg_eviction_rate: 0.0,
            avg_market_stress: 0.0,
            last_signal_timestamp: None,
        }
    }
}

/// Three-way availability classification
///
/// Downstream consumers branch on the serialized strings, so the uppercase
/// wire form is a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AvailabilityLabel {
    Available,
    Limited,
    Unavailable,
}

impl std::fmt::Display for AvailabilityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AvailabilityLabel::Available => write!(f, "AVAILABLE"),
            AvailabilityLabel::Limited => write!(f, "LIMITED"),
            AvailabilityLabel::Unavailable => write!(f, "UNAVAILABLE"),
        }
    }
}

/// Computed availability score for one (region, SKU) combination
///
/// Immutable once created; a newer computation for the same key supersedes
/// the old value rather than mutating it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityScore {
    pub region: String,
    pub sku: String,
    /// Weighted availability score, 0-100
    pub score: u8,
    pub label: AvailabilityLabel,
    /// How much to trust the score, 0.0..=1.0
    pub confidence: f64,
    pub success_rate: f64,
    pub avg_provision_millis: f64,
    pub error_rate: f64,
    pub market_stress: f64,
    pub sample_count: u64,
    /// 0.0..=1.0, minute-granularity staleness of the underlying telemetry
    pub data_freshness: f64,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub calculated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_hints: Option<Vec<String>>,
}

/// Hourly on-demand price observation for a (region, SKU)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRecord {
    pub region: String,
    pub sku: String,
    pub price_per_hour: f64,
    pub observed_at: DateTime<Utc>,
}

/// Static hardware specification for a VM SKU
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuSpec {
    pub name: String,
    pub gpu_model: String,
    pub gpu_count: u32,
    pub gpu_memory_gb: u32,
    pub vcpus: u32,
    pub ram_gb: u32,
}

impl SkuSpec {
    /// Aggregate GPU capacity proxy used for compatibility classification
    pub fn performance(&self) -> f64 {
        f64::from(self.gpu_count) * f64::from(self.gpu_memory_gb)
    }
}

/// Compatibility of a candidate SKU relative to the original
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compatibility {
    Exact,
    Upgrade,
    Similar,
    Downgrade,
}

impl Compatibility {
    /// Sort rank: exact < similar < upgrade < downgrade
    pub fn rank(&self) -> u8 {
        match self {
            Compatibility::Exact => 0,
            Compatibility::Similar => 1,
            Compatibility::Upgrade => 2,
            Compatibility::Downgrade => 3,
        }
    }
}

impl std::fmt::Display for Compatibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Compatibility::Exact => write!(f, "exact"),
            Compatibility::Upgrade => write!(f, "upgrade"),
            Compatibility::Similar => write!(f, "similar"),
            Compatibility::Downgrade => write!(f, "downgrade"),
        }
    }
}

/// Same SKU in a different region
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionAlternative {
    pub region: String,
    pub sku: String,
    pub score: u8,
    pub label: AvailabilityLabel,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_hour: Option<f64>,
    /// Hand-curated hop cost from the original region, 1-5 (5 = unknown pair)
    pub distance: u8,
    pub reason: String,
}

/// Different SKU in the same region
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuAlternative {
    pub region: String,
    pub sku: String,
    pub score: u8,
    pub label: AvailabilityLabel,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_hour: Option<f64>,
    /// Candidate GPU capacity relative to the original (1.0 = identical)
    pub performance_ratio: f64,
    /// Candidate price relative to the original (1.0 when either is unknown)
    pub price_ratio: f64,
    pub compatibility: Compatibility,
    pub reason: String,
}

/// Parameters for an alternative-recommendation lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub original_region: String,
    pub original_sku: String,
    #[serde(default = "default_max_alternatives")]
    pub max_alternatives: usize,
    #[serde(default = "default_true")]
    pub include_higher_tier: bool,
    #[serde(default)]
    pub include_lower_tier: bool,
    #[serde(default = "default_max_price_increase")]
    pub max_price_increase_ratio: f64,
    #[serde(default = "default_min_score")]
    pub min_availability_score: u8,
}

fn default_max_alternatives() -> usize {
    5
}

fn default_true() -> bool {
    true
}

fn default_max_price_increase() -> f64 {
    2.0
}

fn default_min_score() -> u8 {
    40
}

impl RecommendationRequest {
    pub fn new(original_region: impl Into<String>, original_sku: impl Into<String>) -> Self {
        Self {
            original_region: original_region.into(),
            original_sku: original_sku.into(),
            max_alternatives: default_max_alternatives(),
            include_higher_tier: true,
            include_lower_tier: false,
            max_price_increase_ratio: default_max_price_increase(),
            min_availability_score: default_min_score(),
        }
    }
}

/// Overall quality of a recommendation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationStrength {
    Strong,
    Moderate,
    Weak,
}

/// Aggregate view of both alternative lists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationSummary {
    pub total_alternatives: usize,
    /// Alternatives scoring at least 70
    pub high_score_alternatives: usize,
    pub recommendation_strength: RecommendationStrength,
}

/// Request-scoped result of an alternative lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub original_request: RecommendationRequest,
    pub region_alternatives: Vec<RegionAlternative>,
    pub sku_alternatives: Vec<SkuAlternative>,
    pub summary: RecommendationSummary,
}
