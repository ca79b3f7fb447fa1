//! Alternative recommendations
//!
//! Given one poorly scoring (region, SKU) combination and the pool of
//! already-computed scores, ranks alternative regions for the same SKU and
//! alternative SKUs in the same region, bounded by price and performance
//! constraints.

mod reference;

pub use reference::{ReferenceData, StaticReferenceData, DEFAULT_REGION_DISTANCE};

use crate::models::{
    CapacityScore, Compatibility, PriceRecord, RecommendationRequest, RecommendationResult,
    RecommendationStrength, RecommendationSummary, RegionAlternative, SkuAlternative, SkuSpec,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Score at or above which an alternative counts toward summary strength
const HIGH_SCORE_THRESHOLD: u8 = 70;

/// Score gap beyond which a higher score outranks a shorter distance
const SCORE_GAP_OVERRIDE: i16 = 10;

/// Upgrade when the candidate exceeds this multiple of the original capacity
const UPGRADE_PERF_RATIO: f64 = 1.5;

/// Downgrade when the candidate falls below this fraction of the original
const DOWNGRADE_PERF_RATIO: f64 = 0.7;

/// Ranks alternative regions and SKUs from computed scores
pub struct RecommendationEngine {
    reference: Arc<dyn ReferenceData>,
}

impl RecommendationEngine {
    pub fn new(reference: Arc<dyn ReferenceData>) -> Self {
        Self { reference }
    }

    /// Build ranked alternatives for a scored combination
    ///
    /// `all_scores` is the candidate pool (the caller keeps it fresh);
    /// `prices` may be empty, which only degrades price-aware fields. Empty
    /// result lists are a valid outcome, not an error.
    pub fn recommend(
        &self,
        request: &RecommendationRequest,
        all_scores: &[CapacityScore],
        prices: &[PriceRecord],
    ) -> RecommendationResult {
        let price_map: HashMap<(&str, &str), f64> = prices
            .iter()
            .map(|p| ((p.region.as_str(), p.sku.as_str()), p.price_per_hour))
            .collect();

        let region_alternatives = self.region_alternatives(request, all_scores, &price_map);
        let sku_alternatives = self.sku_alternatives(request, all_scores, &price_map);
        let summary = summarize(&region_alternatives, &sku_alternatives);

        debug!(
            region = %request.original_region,
            sku = %request.original_sku,
            region_alternatives = region_alternatives.len(),
            sku_alternatives = sku_alternatives.len(),
            strength = ?summary.recommendation_strength,
            "Built recommendations"
        );

        RecommendationResult {
            original_request: request.clone(),
            region_alternatives,
            sku_alternatives,
            summary,
        }
    }

    /// Same SKU, other regions
    fn region_alternatives(
        &self,
        request: &RecommendationRequest,
        all_scores: &[CapacityScore],
        price_map: &HashMap<(&str, &str), f64>,
    ) -> Vec<RegionAlternative> {
        let mut candidates: Vec<(&CapacityScore, u8)> = all_scores
            .iter()
            .filter(|s| {
                s.sku == request.original_sku
                    && s.region != request.original_region
                    && s.score >= request.min_availability_score
            })
            .map(|s| {
                let distance = self
                    .reference
                    .region_distance(&request.original_region, &s.region);
                (s, distance)
            })
            .collect();

        // Two-level rule, not a single weighted key: a clear score win
        // (>10 points) takes priority; close scores rank by distance. The
        // gap override makes the rule intransitive, and std sorts require a
        // total order, so an insertion pass applies the rule pairwise.
        for i in 1..candidates.len() {
            let mut j = i;
            while j > 0 && region_precedes(&candidates[j], &candidates[j - 1]) {
                candidates.swap(j, j - 1);
                j -= 1;
            }
        }
        candidates.truncate(request.max_alternatives);

        candidates
            .into_iter()
            .map(|(s, distance)| {
                let price_per_hour = price_map.get(&(s.region.as_str(), s.sku.as_str())).copied();
                let reason = region_reason(s, distance);
                RegionAlternative {
                    region: s.region.clone(),
                    sku: s.sku.clone(),
                    score: s.score,
                    label: s.label,
                    confidence: s.confidence,
                    price_per_hour,
                    distance,
                    reason,
                }
            })
            .collect()
    }

    /// Same region, other SKUs
    fn sku_alternatives(
        &self,
        request: &RecommendationRequest,
        all_scores: &[CapacityScore],
        price_map: &HashMap<(&str, &str), f64>,
    ) -> Vec<SkuAlternative> {
        let original_spec = match self.reference.sku_spec(&request.original_sku) {
            Some(spec) => spec,
            None => {
                debug!(sku = %request.original_sku, "Original SKU has no known spec, skipping SKU alternatives");
                return Vec::new();
            }
        };
        let original_perf = original_spec.performance();
        let original_price = price_map
            .get(&(
                request.original_region.as_str(),
                request.original_sku.as_str(),
            ))
            .copied();

        let mut candidates: Vec<SkuAlternative> = all_scores
            .iter()
            .filter(|s| {
                s.region == request.original_region
                    && s.sku != request.original_sku
                    && s.score >= request.min_availability_score
            })
            .filter_map(|s| {
                let spec = self.reference.sku_spec(&s.sku)?;
                let perf = spec.performance();
                let compatibility = classify(original_spec, spec, original_perf, perf);

                match compatibility {
                    Compatibility::Upgrade if !request.include_higher_tier => return None,
                    Compatibility::Downgrade if !request.include_lower_tier => return None,
                    _ => {}
                }

                let price_per_hour =
                    price_map.get(&(s.region.as_str(), s.sku.as_str())).copied();
                let price_ratio = match (price_per_hour, original_price) {
                    (Some(candidate), Some(original)) if original > 0.0 => candidate / original,
                    _ => 1.0,
                };
                if price_ratio > request.max_price_increase_ratio {
                    return None;
                }

                let performance_ratio = perf / original_perf;
                let reason = sku_reason(s, compatibility, performance_ratio, price_ratio);
                Some(SkuAlternative {
                    region: s.region.clone(),
                    sku: s.sku.clone(),
                    score: s.score,
                    label: s.label,
                    confidence: s.confidence,
                    price_per_hour,
                    performance_ratio,
                    price_ratio,
                    compatibility,
                    reason,
                })
            })
            .collect();

        candidates.sort_by(|a, b| {
            a.compatibility
                .rank()
                .cmp(&b.compatibility.rank())
                .then_with(|| {
                    let da = (a.performance_ratio - 1.0).abs();
                    let db = (b.performance_ratio - 1.0).abs();
                    da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
                })
                .then(b.score.cmp(&a.score))
        });
        candidates.truncate(request.max_alternatives);
        candidates
    }
}

/// Pairwise ranking rule for region alternatives
///
/// A score gap wider than the override wins outright; close scores rank by
/// distance, then score. Deliberately not a total order.
fn region_precedes(a: &(&CapacityScore, u8), b: &(&CapacityScore, u8)) -> bool {
    let (a, da) = a;
    let (b, db) = b;
    let gap = (i16::from(a.score) - i16::from(b.score)).abs();
    if gap > SCORE_GAP_OVERRIDE {
        a.score > b.score
    } else {
        da.cmp(db).then(b.score.cmp(&a.score)).is_lt()
    }
}

/// Classify a candidate SKU relative to the original by GPU capacity
fn classify(
    original: &SkuSpec,
    candidate: &SkuSpec,
    original_perf: f64,
    candidate_perf: f64,
) -> Compatibility {
    if candidate.gpu_model == original.gpu_model && candidate.gpu_count == original.gpu_count {
        Compatibility::Exact
    } else if candidate_perf > original_perf * UPGRADE_PERF_RATIO {
        Compatibility::Upgrade
    } else if candidate_perf < original_perf * DOWNGRADE_PERF_RATIO {
        Compatibility::Downgrade
    } else {
        Compatibility::Similar
    }
}

/// Fixed decision table over alternative counts and quality
fn summarize(
    region_alternatives: &[RegionAlternative],
    sku_alternatives: &[SkuAlternative],
) -> RecommendationSummary {
    let total = region_alternatives.len() + sku_alternatives.len();
    let high = region_alternatives
        .iter()
        .filter(|a| a.score >= HIGH_SCORE_THRESHOLD)
        .count()
        + sku_alternatives
            .iter()
            .filter(|a| a.score >= HIGH_SCORE_THRESHOLD)
            .count();

    let recommendation_strength = if total >= 3 && high >= 2 {
        RecommendationStrength::Strong
    } else if total >= 2 && high >= 1 {
        RecommendationStrength::Moderate
    } else {
        RecommendationStrength::Weak
    };

    RecommendationSummary {
        total_alternatives: total,
        high_score_alternatives: high,
        recommendation_strength,
    }
}

/// Free text; consumers must branch on structured fields, never on this
fn region_reason(score: &CapacityScore, distance: u8) -> String {
    let band = if score.score >= 75 {
        "Strong availability"
    } else if score.score >= 60 {
        "Good availability"
    } else {
        "Moderate availability"
    };
    let mut reason = format!("{} in {} (score {})", band, score.region, score.score);
    if distance <= 2 {
        reason.push_str("; low network distance from the original region");
    }
    reason
}

fn sku_reason(
    score: &CapacityScore,
    compatibility: Compatibility,
    performance_ratio: f64,
    price_ratio: f64,
) -> String {
    let perf_phrase = if performance_ratio > 1.05 {
        format!("{:.1}x the GPU capacity", performance_ratio)
    } else if performance_ratio < 0.95 {
        format!("{:.0}% of the GPU capacity", performance_ratio * 100.0)
    } else {
        "comparable GPU capacity".to_string()
    };
    let price_phrase = if price_ratio > 1.05 {
        format!("{:.0}% higher price", (price_ratio - 1.0) * 100.0)
    } else if price_ratio < 0.95 {
        format!("{:.0}% lower price", (1.0 - price_ratio) * 100.0)
    } else {
        "similar price".to_string()
    };
    format!(
        "{} match with {} at {} (score {})",
        compatibility, perf_phrase, price_phrase, score.score
    )
}
