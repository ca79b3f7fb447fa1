//! Single-combination scoring command

use anyhow::Result;
use capacity_engine::{CapacityScore, EngineMetrics, EventLogger};
use tabled::Tabled;

use crate::output::{
    color_confidence, color_label, format_latency, print_info, print_warning, OutputFormat,
};

/// Row for the score table
#[derive(Tabled)]
struct ScoreRow {
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
    #[tabled(rename = "Success")]
    success_rate: String,
    #[tabled(rename = "Provision")]
    provision: String,
    #[tabled(rename = "Samples")]
    samples: String,
    #[tabled(rename = "Freshness")]
    freshness: String,
}

impl ScoreRow {
    fn from_score(s: &CapacityScore) -> Self {
        Self {
            region: s.region.clone(),
            sku: s.sku.clone(),
            score: s.score.to_string(),
            label: color_label(&s.label.to_string()),
            confidence: color_confidence(s.confidence),
            success_rate: format!("{:.0}%", s.success_rate * 100.0),
            provision: format_latency(s.avg_provision_millis),
            samples: s.sample_count.to_string(),
            freshness: format!("{:.0}%", s.data_freshness * 100.0),
        }
    }
}

/// Score a single (region, SKU) combination
pub async fn run(
    region: &str,
    sku: &str,
    window_hours: u32,
    seed: u64,
    format: OutputFormat,
) -> Result<()> {
    let stack = super::engine_stack(seed)?;
    let metrics = EngineMetrics::new();
    let logger = EventLogger::new("capctl");

    let started = std::time::Instant::now();
    let score = stack
        .calculator
        .compute(region, sku, window_hours, None)
        .await?;
    metrics.observe_scoring_latency(started.elapsed().as_secs_f64());
    metrics.inc_scores_computed(&score.label.to_string());
    logger.log_score(
        region,
        sku,
        score.score,
        &score.label.to_string(),
        score.confidence,
        score.sample_count,
    );

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&score)?);
        }
        OutputFormat::Table => {
            let rows = vec![ScoreRow::from_score(&score)];
            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);

            print_info(&format!(
                "Telemetry window {} to {} UTC",
                score.window_start.format("%Y-%m-%d %H:%M"),
                score.window_end.format("%Y-%m-%d %H:%M")
            ));
            if let Some(text) = &score.recommendation_text {
                print_info(text);
            }
            if let Some(hints) = &score.alternative_hints {
                for hint in hints {
                    print_warning(hint);
                }
            }
        }
    }

    Ok(())
}
