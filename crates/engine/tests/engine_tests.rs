//! End-to-end tests: simulated provider -> scoring -> store -> recommendations

use anyhow::bail;
use async_trait::async_trait;
use capacity_engine::{
    AvailabilityLabel, BatchConfig, BatchScheduler, CapacityScore, EngineError,
    InMemoryScoreStore, MetricsProvider, PriceRecord, ProbeMetricsWindow, RecommendationEngine,
    RecommendationRequest, ReferenceData, ScoreCalculator, ScoreStore, ScoringConfig,
    SimulatedMetricsProvider, SpotMetricsWindow, StaticReferenceData,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

fn simulated_calculator(seed: u64) -> ScoreCalculator {
    let reference = Arc::new(StaticReferenceData::new());
    let provider = Arc::new(SimulatedMetricsProvider::new(reference, seed));
    ScoreCalculator::new(provider, ScoringConfig::default())
}

/// Provider that always fails, for exercising the fallback contract
struct DownProvider;

#[async_trait]
impl MetricsProvider for DownProvider {
    async fn fetch_probe_window(
        &self,
        _region: &str,
        _sku: &str,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> anyhow::Result<ProbeMetricsWindow> {
        bail!("telemetry backend offline")
    }

    async fn fetch_spot_window(
        &self,
        _region: &str,
        _sku: &str,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> anyhow::Result<SpotMetricsWindow> {
        bail!("telemetry backend offline")
    }

    async fn fetch_price(&self, _region: &str, _sku: &str) -> anyhow::Result<Option<PriceRecord>> {
        Ok(None)
    }
}

#[tokio::test]
async fn test_single_score_bounds_and_fields() {
    let calculator = simulated_calculator(11);

    let score = calculator
        .compute("eastus", "Standard_NC24ads_A100_v4", 24, None)
        .await
        .unwrap();

    assert!(score.score <= 100);
    assert!((0.0..=1.0).contains(&score.confidence));
    assert!((0.0..=1.0).contains(&score.data_freshness));
    assert!(score.sample_count > 0);
    assert_eq!(score.region, "eastus");
    assert_eq!(score.sku, "Standard_NC24ads_A100_v4");
    assert!(score.recommendation_text.is_some());
    assert!(score.window_start < score.window_end);
}

#[tokio::test]
async fn test_provider_outage_degrades_to_fallback() {
    let calculator = ScoreCalculator::new(Arc::new(DownProvider), ScoringConfig::default());

    let score = calculator
        .compute("eastus", "Standard_NC6s_v3", 24, None)
        .await
        .unwrap();

    assert_eq!(score.score, 50);
    assert_eq!(score.label, AvailabilityLabel::Limited);
    assert_eq!(score.confidence, 0.3);
    assert_eq!(score.sample_count, 0);
}

#[tokio::test]
async fn test_invalid_window_is_rejected_even_with_dead_provider() {
    let calculator = ScoreCalculator::new(Arc::new(DownProvider), ScoringConfig::default());

    let err = calculator
        .compute("eastus", "Standard_NC6s_v3", 0, None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidWindow(0)));
}

#[tokio::test]
async fn test_label_serialization_contract() {
    let calculator = simulated_calculator(11);
    let score = calculator
        .compute("eastus", "Standard_NC4as_T4_v3", 24, None)
        .await
        .unwrap();

    let json = serde_json::to_string(&score).unwrap();
    // Downstream consumers branch on the uppercase label strings.
    assert!(
        json.contains("\"label\":\"AVAILABLE\"")
            || json.contains("\"label\":\"LIMITED\"")
            || json.contains("\"label\":\"UNAVAILABLE\"")
    );

    let parsed: CapacityScore = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.score, score.score);
    assert_eq!(parsed.label, score.label);
}

#[tokio::test]
async fn test_batch_to_recommendation_pipeline() {
    let reference = Arc::new(StaticReferenceData::new());
    let provider = Arc::new(SimulatedMetricsProvider::new(Arc::clone(&reference) as _, 42));
    let calculator = Arc::new(ScoreCalculator::new(
        Arc::clone(&provider) as _,
        ScoringConfig::default(),
    ));
    let scheduler = BatchScheduler::new(
        Arc::clone(&calculator),
        BatchConfig {
            max_combinations: 20,
            worker_count: 4,
            inter_request_delay_ms: 1,
        },
    );

    // Score one SKU across several regions plus sibling SKUs at home.
    let sku = "Standard_NC24ads_A100_v4".to_string();
    let mut combinations: Vec<(String, String)> = ["eastus", "eastus2", "westus2", "northeurope"]
        .iter()
        .map(|r| (r.to_string(), sku.clone()))
        .collect();
    combinations.push(("eastus".to_string(), "Standard_NC48ads_A100_v4".to_string()));
    combinations.push(("eastus".to_string(), "Standard_NC40ads_H100_v5".to_string()));

    let outcome = scheduler.compute_batch(&combinations, 24).await.unwrap();
    assert_eq!(outcome.scores.len(), combinations.len());
    assert!(outcome.errors.is_empty());
    for pair in outcome.scores.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }

    // Persist through the delegate and read the candidate pool back.
    let store = InMemoryScoreStore::new();
    for score in &outcome.scores {
        store.put(score.clone());
    }
    let pool = store.recent(100);
    assert_eq!(pool.len(), combinations.len());

    let mut prices = Vec::new();
    for (region, sku) in &combinations {
        if let Some(price) = provider.fetch_price(region, sku).await.unwrap() {
            prices.push(price);
        }
    }

    let engine = RecommendationEngine::new(reference);
    let request = RecommendationRequest::new("eastus", sku.as_str());
    let result = engine.recommend(&request, &pool, &prices);

    for alt in &result.region_alternatives {
        assert_eq!(alt.sku, sku);
        assert_ne!(alt.region, "eastus");
        assert!(alt.score >= request.min_availability_score);
        assert!(alt.price_per_hour.is_some());
    }
    for alt in &result.sku_alternatives {
        assert_eq!(alt.region, "eastus");
        assert_ne!(alt.sku, sku);
        assert!(alt.price_ratio <= request.max_price_increase_ratio);
        assert!(alt.performance_ratio > 0.0);
    }
    assert_eq!(
        result.summary.total_alternatives,
        result.region_alternatives.len() + result.sku_alternatives.len()
    );
}

#[tokio::test]
async fn test_repeated_computation_supersedes_in_store() {
    let calculator = simulated_calculator(5);
    let store = InMemoryScoreStore::new();

    let first = calculator
        .compute("westus2", "Standard_NC6s_v3", 24, None)
        .await
        .unwrap();
    store.put(first.clone());
    let second = calculator
        .compute("westus2", "Standard_NC6s_v3", 24, None)
        .await
        .unwrap();
    store.put(second.clone());

    assert_eq!(store.len(), 1);
    let latest = store.latest("westus2", "Standard_NC6s_v3").unwrap();
    assert_eq!(latest.calculated_at, second.calculated_at);
}

#[tokio::test]
async fn test_reference_data_reachable_through_trait_object() {
    let reference: Arc<dyn ReferenceData> = Arc::new(StaticReferenceData::new());
    assert!(!reference.regions().is_empty());
    assert!(!reference.skus().is_empty());
    assert_eq!(reference.region_distance("eastus", "no-such-region"), 5);
}
