//! Error taxonomy for the capacity engine
//!
//! Data sparsity is deliberately absent here: a sparse or missing metrics
//! window degrades to the fallback score instead of surfacing as an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    /// The requested window length is not a positive number of hours
    #[error("window hours must be positive, got {0}")]
    InvalidWindow(i64),

    /// A batch request exceeded the configured combination cap
    #[error("batch of {requested} combinations exceeds configured maximum of {max}")]
    BatchSizeExceeded { requested: usize, max: usize },

    /// The metrics provider failed for a single combination
    ///
    /// Only `ScoreCalculator::try_compute` and the batch scheduler surface
    /// this; `ScoreCalculator::compute` converts it into the fallback score.
    #[error("metrics provider error: {0}")]
    Provider(#[source] anyhow::Error),
}

/// Per-combination failure recorded during batch scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemError {
    pub region: String,
    pub sku: String,
    pub error: String,
}

impl ItemError {
    pub fn new(region: impl Into<String>, sku: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            sku: sku.into(),
            error: error.into(),
        }
    }
}
