//! Simulated metrics provider
//!
//! Generates plausible probe and spot windows shaped by the static reference
//! tables, for demos and integration tests. Telemetry synthesis lives here,
//! on the acquisition side of the provider boundary; the scoring core stays
//! pure. Windows are a deterministic function of (seed, region, sku, window
//! bounds), so a fixed seed reproduces a run exactly.

use crate::models::{PriceRecord, ProbeMetricsWindow, SpotMetricsWindow};
use crate::provider::MetricsProvider;
use crate::recommend::ReferenceData;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Success rate assumed for combinations absent from the reference tables
const UNKNOWN_BASELINE_SUCCESS: f64 = 0.7;

/// Synthetic telemetry source shaped by reference data
pub struct SimulatedMetricsProvider {
    reference: Arc<dyn ReferenceData>,
    seed: u64,
}

impl SimulatedMetricsProvider {
    pub fn new(reference: Arc<dyn ReferenceData>, seed: u64) -> Self {
        Self { reference, seed }
    }

    fn rng_for(&self, region: &str, sku: &str, salt: &str) -> StdRng {
        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        region.hash(&mut hasher);
        sku.hash(&mut hasher);
        salt.hash(&mut hasher);
        StdRng::seed_from_u64(hasher.finish())
    }

    fn baseline(&self, region: &str, sku: &str) -> f64 {
        self.reference
            .baseline_success_rate(region, sku)
            .unwrap_or(UNKNOWN_BASELINE_SUCCESS)
    }
}

#[async_trait]
impl MetricsProvider for SimulatedMetricsProvider {
    async fn fetch_probe_window(
        &self,
        region: &str,
        sku: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<ProbeMetricsWindow> {
        let mut rng = self.rng_for(region, sku, "probe");
        let window_hours = ((end - start).num_hours().max(1)) as u64;

        let baseline = self.baseline(region, sku);
        let success_rate = (baseline + rng.gen_range(-0.05..0.05)).clamp(0.0, 1.0);

        // Roughly two probes per hour, with some scheduler drift.
        let total_probes = window_hours * 2 - rng.gen_range(0..=window_hours / 4);
        let successful_probes = (total_probes as f64 * success_rate).round() as u64;

        // Tight capacity provisions slowly.
        let avg_provision_millis =
            3_500.0 + (1.0 - success_rate) * 6_000.0 + rng.gen_range(-400.0..400.0);
        let error_rate = ((1.0 - success_rate) * rng.gen_range(0.8..1.0)).clamp(0.0, 1.0);

        let last_probe_timestamp = Some(end - Duration::minutes(rng.gen_range(1..30)));

        Ok(ProbeMetricsWindow {
            region: region.to_string(),
            sku: sku.to_string(),
            window_start: start,
            window_end: end,
            total_probes,
            successful_probes,
            success_rate,
            avg_provision_millis: avg_provision_millis.max(500.0),
            error_rate,
            last_probe_timestamp,
        })
    }

    async fn fetch_spot_window(
        &self,
        region: &str,
        sku: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<SpotMetricsWindow> {
        let mut rng = self.rng_for(region, sku, "spot");
        let window_hours = ((end - start).num_hours().max(1)) as u64;

        let baseline = self.baseline(region, sku);
        let scarcity = 1.0 - baseline;

        let total_signals = window_hours + rng.gen_range(0..=window_hours / 2);
        let avg_price_ratio = (0.25 + scarcity * 0.5 + rng.gen_range(-0.05..0.05)).clamp(0.05, 1.0);
        let avg_volatility = (scarcity * 0.4 + rng.gen_range(0.0..0.1)).clamp(0.0, 1.0);
        let avg_eviction_rate = (scarcity * 0.3 + rng.gen_range(0.0..0.05)).clamp(0.0, 1.0);
        let avg_market_stress =
            (0.5 * avg_price_ratio + 0.3 * avg_volatility + 0.2 * avg_eviction_rate)
                .clamp(0.0, 1.0);

        let last_signal_timestamp = Some(end - Duration::minutes(rng.gen_range(1..20)));

        Ok(SpotMetricsWindow {
            region: region.to_string(),
            sku: sku.to_string(),
            window_start: start,
            window_end: end,
            total_signals,
            avg_price_ratio,
            avg_volatility,
            avg_eviction_rate,
            avg_market_stress,
            last_signal_timestamp,
        })
    }

    async fn fetch_price(&self, region: &str, sku: &str) -> Result<Option<PriceRecord>> {
        Ok(self
            .reference
            .price_per_hour(region, sku)
            .map(|price_per_hour| PriceRecord {
                region: region.to_string(),
                sku: sku.to_string(),
                price_per_hour,
                observed_at: Utc::now(),
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::StaticReferenceData;

    fn provider(seed: u64) -> SimulatedMetricsProvider {
        SimulatedMetricsProvider::new(Arc::new(StaticReferenceData::new()), seed)
    }

    #[tokio::test]
    async fn test_same_seed_is_reproducible() {
        let now = Utc::now();
        let start = now - Duration::hours(24);

        let a = provider(7)
            .fetch_probe_window("eastus", "Standard_NC6s_v3", start, now)
            .await
            .unwrap();
        let b = provider(7)
            .fetch_probe_window("eastus", "Standard_NC6s_v3", start, now)
            .await
            .unwrap();

        assert_eq!(a.total_probes, b.total_probes);
        assert_eq!(a.success_rate, b.success_rate);
        assert_eq!(a.avg_provision_millis, b.avg_provision_millis);
    }

    #[tokio::test]
    async fn test_different_combinations_differ() {
        let now = Utc::now();
        let start = now - Duration::hours(24);
        let p = provider(7);

        let a = p
            .fetch_probe_window("eastus", "Standard_NC6s_v3", start, now)
            .await
            .unwrap();
        let b = p
            .fetch_probe_window("westus2", "Standard_NC6s_v3", start, now)
            .await
            .unwrap();

        assert_ne!(
            (a.total_probes, a.success_rate.to_bits()),
            (b.total_probes, b.success_rate.to_bits())
        );
    }

    #[tokio::test]
    async fn test_windows_are_plausible() {
        let now = Utc::now();
        let start = now - Duration::hours(24);
        let p = provider(42);

        for sku in ["Standard_NC6s_v3", "Standard_ND96isr_H100_v5"] {
            let probe = p.fetch_probe_window("eastus", sku, start, now).await.unwrap();
            assert!(probe.total_probes > 0);
            assert!(probe.successful_probes <= probe.total_probes);
            assert!((0.0..=1.0).contains(&probe.success_rate));
            assert!(probe.avg_provision_millis >= 500.0);

            let spot = p.fetch_spot_window("eastus", sku, start, now).await.unwrap();
            assert!(spot.total_signals > 0);
            assert!((0.0..=1.0).contains(&spot.avg_market_stress));
        }
    }

    #[tokio::test]
    async fn test_scarce_sku_scores_worse_than_common() {
        let now = Utc::now();
        let start = now - Duration::hours(24);
        let p = provider(42);

        let t4 = p
            .fetch_probe_window("eastus", "Standard_NC4as_T4_v3", start, now)
            .await
            .unwrap();
        let h100 = p
            .fetch_probe_window("eastus", "Standard_ND96isr_H100_v5", start, now)
            .await
            .unwrap();
        assert!(t4.success_rate > h100.success_rate);
    }

    #[tokio::test]
    async fn test_price_lookup_passthrough() {
        let p = provider(1);
        let known = p.fetch_price("eastus", "Standard_NC6s_v3").await.unwrap();
        assert!(known.is_some());

        let unknown = p.fetch_price("eastus", "Standard_Mystery_GPU").await.unwrap();
        assert!(unknown.is_none());
    }
}
