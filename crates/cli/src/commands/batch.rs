//! Batch scoring command

use anyhow::Result;
use capacity_engine::{BatchScheduler, CapacityScore, EngineMetrics, EventLogger};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tabled::Tabled;

use crate::output::{color_confidence, color_label, print_error, OutputFormat};

/// Row for the batch results table
#[derive(Tabled, Serialize)]
struct BatchRow {
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "SKU")]
    sku: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
    #[tabled(rename = "Samples")]
    samples: String,
}

impl BatchRow {
    fn from_score(s: &CapacityScore) -> Self {
        Self {
            region: s.region.clone(),
            sku: s.sku.clone(),
            score: s.score.to_string(),
            label: color_label(&s.label.to_string()),
            confidence: color_confidence(s.confidence),
            samples: s.sample_count.to_string(),
        }
    }
}

/// Score the cross product of regions and SKUs
pub async fn run(
    regions: &[String],
    skus: &[String],
    window_hours: u32,
    timeout_secs: Option<u64>,
    seed: u64,
    format: OutputFormat,
) -> Result<()> {
    let stack = super::engine_stack(seed)?;
    let scheduler = BatchScheduler::new(Arc::clone(&stack.calculator), stack.config.batch.clone());
    let metrics = EngineMetrics::new();
    let logger = EventLogger::new("capctl");

    let combinations: Vec<(String, String)> = regions
        .iter()
        .flat_map(|r| skus.iter().map(move |s| (r.clone(), s.clone())))
        .collect();

    let deadline =
        timeout_secs.map(|secs| tokio::time::Instant::now() + Duration::from_secs(secs));

    let started = std::time::Instant::now();
    let outcome = scheduler
        .compute_batch_until(&combinations, window_hours, deadline)
        .await?;
    metrics.observe_batch_latency(started.elapsed().as_secs_f64());
    metrics.inc_batch_item_errors(outcome.errors.len() as u64);
    logger.log_batch(
        combinations.len(),
        outcome.scores.len(),
        outcome.errors.len(),
        started.elapsed().as_millis() as u64,
    );

    match format {
        OutputFormat::Json => {
            let payload = json!({
                "scores": outcome.scores,
                "errors": outcome.errors,
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        OutputFormat::Table => {
            let rows: Vec<BatchRow> = outcome.scores.iter().map(BatchRow::from_score).collect();
            crate::output::print_table(&rows, OutputFormat::Table);
            println!(
                "\nScored {} of {} combinations",
                outcome.scores.len(),
                combinations.len()
            );

            for item in &outcome.errors {
                print_error(&format!("{}/{}: {}", item.region, item.sku, item.error));
            }
        }
    }

    Ok(())
}
