//! Capacity health engine for GPU VM SKUs
//!
//! This crate provides the core functionality for:
//! - Availability scoring of (region, SKU) combinations from probe and
//!   spot-market telemetry windows
//! - Confidence estimation and three-way availability classification
//! - Batched scoring with bounded concurrency and rate limiting
//! - Alternative-region and alternative-SKU recommendations

pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod provider;
pub mod recommend;
pub mod scoring;
pub mod simulated;
pub mod store;

pub use config::{BatchConfig, EngineConfig, ScoringConfig};
pub use error::{EngineError, ItemError};
pub use models::*;
pub use observability::{EngineMetrics, EventLogger};
pub use provider::MetricsProvider;
pub use recommend::{RecommendationEngine, ReferenceData, StaticReferenceData};
pub use scoring::{BatchOutcome, BatchScheduler, ScoreCalculator, ScoreWeights};
pub use simulated::SimulatedMetricsProvider;
pub use store::{InMemoryScoreStore, ScoreStore};
