//! CLI command implementations

pub mod batch;
pub mod list;
pub mod recommend;
pub mod score;

use anyhow::Result;
use capacity_engine::{
    EngineConfig, ScoreCalculator, SimulatedMetricsProvider, StaticReferenceData,
};
use std::sync::Arc;

/// Shared wiring for commands that score combinations
pub(crate) struct EngineStack {
    pub reference: Arc<StaticReferenceData>,
    pub provider: Arc<SimulatedMetricsProvider>,
    pub calculator: Arc<ScoreCalculator>,
    pub config: EngineConfig,
}

/// Build the engine stack backed by the simulated telemetry provider
pub(crate) fn engine_stack(seed: u64) -> Result<EngineStack> {
    let config = EngineConfig::load()?;
    let reference = Arc::new(StaticReferenceData::new());
    let provider = Arc::new(SimulatedMetricsProvider::new(
        Arc::clone(&reference) as _,
        seed,
    ));
    let calculator = Arc::new(ScoreCalculator::new(
        Arc::clone(&provider) as _,
        config.scoring.clone(),
    ));
    Ok(EngineStack {
        reference,
        provider,
        calculator,
        config,
    })
}
