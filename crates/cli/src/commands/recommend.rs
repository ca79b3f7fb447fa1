//! Alternative-recommendation command
//!
//! Builds the candidate pool with two scoring sweeps (the original SKU across
//! all known regions, then sibling SKUs in the original region) so each sweep
//! stays under the batch combination cap, then ranks alternatives.

use anyhow::Result;
use capacity_engine::{
    BatchScheduler, EngineMetrics, EventLogger, MetricsProvider, RecommendationEngine,
    RecommendationRequest, RecommendationStrength, ReferenceData, RegionAlternative,
    SkuAlternative,
};
use std::sync::Arc;
use tabled::Tabled;

use crate::output::{
    color_confidence, color_label, color_strength, format_price, print_info, print_warning,
    OutputFormat,
};

/// Row for the region alternatives table
#[derive(Tabled)]
struct RegionRow {
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
    #[tabled(rename = "Distance")]
    distance: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

impl RegionRow {
    fn from_alternative(a: &RegionAlternative) -> Self {
        Self {
            region: a.region.clone(),
            score: a.score.to_string(),
            label: color_label(&a.label.to_string()),
            confidence: color_confidence(a.confidence),
            distance: a.distance.to_string(),
            price: format_price(a.price_per_hour),
            reason: a.reason.clone(),
        }
    }
}

/// Row for the SKU alternatives table
#[derive(Tabled)]
struct SkuRow {
    #[tabled(rename = "SKU")]
    sku: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Compatibility")]
    compatibility: String,
    #[tabled(rename = "Perf")]
    performance: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

impl SkuRow {
    fn from_alternative(a: &SkuAlternative) -> Self {
        Self {
            sku: a.sku.clone(),
            score: a.score.to_string(),
            label: color_label(&a.label.to_string()),
            compatibility: a.compatibility.to_string(),
            performance: format!("{:.2}x", a.performance_ratio),
            price: format_price(a.price_per_hour),
            reason: a.reason.clone(),
        }
    }
}

/// Score candidates and rank alternatives for the original combination
pub async fn run(
    request: RecommendationRequest,
    window_hours: u32,
    seed: u64,
    format: OutputFormat,
) -> Result<()> {
    let stack = super::engine_stack(seed)?;
    let scheduler = BatchScheduler::new(Arc::clone(&stack.calculator), stack.config.batch.clone());
    let metrics = EngineMetrics::new();
    let logger = EventLogger::new("capctl");

    let region_sweep: Vec<(String, String)> = stack
        .reference
        .regions()
        .iter()
        .map(|r| (r.to_string(), request.original_sku.clone()))
        .collect();
    let sku_sweep: Vec<(String, String)> = stack
        .reference
        .skus()
        .iter()
        .filter(|s| **s != request.original_sku)
        .map(|s| (request.original_region.clone(), s.to_string()))
        .collect();

    let mut pool = scheduler
        .compute_batch(&region_sweep, window_hours)
        .await?
        .scores;
    pool.extend(
        scheduler
            .compute_batch(&sku_sweep, window_hours)
            .await?
            .scores,
    );

    let mut prices = Vec::new();
    for score in &pool {
        if let Some(price) = stack.provider.fetch_price(&score.region, &score.sku).await? {
            prices.push(price);
        }
    }

    let engine = RecommendationEngine::new(Arc::clone(&stack.reference) as _);
    let result = engine.recommend(&request, &pool, &prices);
    metrics.inc_recommendations_generated();
    logger.log_recommendation(
        &request.original_region,
        &request.original_sku,
        result.region_alternatives.len(),
        result.sku_alternatives.len(),
        strength_str(result.summary.recommendation_strength),
    );

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Table => {
            print_info(&format!(
                "Alternatives for {} in {}",
                request.original_sku, request.original_region
            ));

            if result.region_alternatives.is_empty() && result.sku_alternatives.is_empty() {
                print_warning("No viable alternatives found");
                return Ok(());
            }

            if !result.region_alternatives.is_empty() {
                println!("\nOther regions, same SKU:");
                let rows: Vec<RegionRow> = result
                    .region_alternatives
                    .iter()
                    .map(RegionRow::from_alternative)
                    .collect();
                let table = tabled::Table::new(rows)
                    .with(tabled::settings::Style::rounded())
                    .to_string();
                println!("{}", table);
            }

            if !result.sku_alternatives.is_empty() {
                println!("\nOther SKUs in {}:", request.original_region);
                let rows: Vec<SkuRow> = result
                    .sku_alternatives
                    .iter()
                    .map(SkuRow::from_alternative)
                    .collect();
                let table = tabled::Table::new(rows)
                    .with(tabled::settings::Style::rounded())
                    .to_string();
                println!("{}", table);
            }

            println!(
                "\nTotal: {} alternatives ({} scoring 70+), recommendation strength: {}",
                result.summary.total_alternatives,
                result.summary.high_score_alternatives,
                color_strength(strength_str(result.summary.recommendation_strength)),
            );
        }
    }

    Ok(())
}

fn strength_str(strength: RecommendationStrength) -> &'static str {
    match strength {
        RecommendationStrength::Strong => "strong",
        RecommendationStrength::Moderate => "moderate",
        RecommendationStrength::Weak => "weak",
    }
}
