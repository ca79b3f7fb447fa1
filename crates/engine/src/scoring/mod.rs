//! Availability scoring
//!
//! Turns telemetry windows into `CapacityScore` records. The scoring core is
//! a pure function of the windows, the weights, and a clock value; metrics
//! acquisition lives behind the `MetricsProvider` trait and is never mixed
//! into the arithmetic.

mod batch;
mod calculator;

pub use batch::{BatchOutcome, BatchScheduler};
pub use calculator::{
    score_window, ScoreCalculator, ScoreWeights, FALLBACK_CONFIDENCE, FALLBACK_SCORE,
};
