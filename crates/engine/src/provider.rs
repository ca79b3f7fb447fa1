//! Metrics provider interface
//!
//! The engine consumes aggregated telemetry windows from an external
//! collaborator; it never probes or collects raw data itself. Provider
//! failures are opaque (`anyhow`), and the scoring layer decides whether to
//! degrade to a fallback score or surface the failure per item.

use crate::models::{PriceRecord, ProbeMetricsWindow, SpotMetricsWindow};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Source of aggregated probe and spot-market telemetry
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    /// Fetch aggregated capacity-probe outcomes for `[start, end)`
    async fn fetch_probe_window(
        &self,
        region: &str,
        sku: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<ProbeMetricsWindow>;

    /// Fetch aggregated spot-market signals for `[start, end)`
    async fn fetch_spot_window(
        &self,
        region: &str,
        sku: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<SpotMetricsWindow>;

    /// Fetch the current on-demand price, if one is known
    ///
    /// Absence is not a failure; price-aware fields simply degrade to
    /// unknown.
    async fn fetch_price(&self, region: &str, sku: &str) -> Result<Option<PriceRecord>>;
}
