//! Static reference data
//!
//! Region hop-costs and SKU hardware specs are hand-curated lookups, not
//! computed metrics. The distance table is asymmetric in places and must be
//! consumed as authored; unknown pairs fall back to the documented default.
//! Everything is injectable behind the `ReferenceData` trait so a real
//! catalog backend can replace the static tables without touching the
//! recommendation logic.

use crate::models::SkuSpec;
use std::collections::HashMap;

/// Hop-cost assumed for region pairs absent from the table
pub const DEFAULT_REGION_DISTANCE: u8 = 5;

/// Injectable source of region and SKU reference data
pub trait ReferenceData: Send + Sync {
    /// Hand-curated hop cost from one region to another, 1-5
    ///
    /// Not a true distance metric: the table is asymmetric in places, so
    /// `distance(a, b)` may differ from `distance(b, a)`.
    fn region_distance(&self, from: &str, to: &str) -> u8;

    /// Hardware spec for a SKU, if known
    fn sku_spec(&self, sku: &str) -> Option<&SkuSpec>;

    /// Reference on-demand hourly price for a (region, SKU), if known
    fn price_per_hour(&self, region: &str, sku: &str) -> Option<f64>;

    /// Baseline provisioning success rate used to shape synthetic telemetry
    fn baseline_success_rate(&self, region: &str, sku: &str) -> Option<f64>;

    /// Known region names
    fn regions(&self) -> Vec<&str>;

    /// Known SKU names
    fn skus(&self) -> Vec<&str>;
}

/// Hand-curated in-crate tables for common GPU regions and SKUs
pub struct StaticReferenceData {
    distances: HashMap<(&'static str, &'static str), u8>,
    specs: HashMap<&'static str, SkuSpec>,
    base_prices: HashMap<&'static str, f64>,
    region_price_factor: HashMap<&'static str, f64>,
    sku_base_success: HashMap<&'static str, f64>,
    region_success_factor: HashMap<&'static str, f64>,
    region_names: Vec<&'static str>,
    sku_names: Vec<&'static str>,
}

impl Default for StaticReferenceData {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticReferenceData {
    pub fn new() -> Self {
        Self {
            distances: region_distances(),
            specs: sku_specs(),
            base_prices: sku_base_prices(),
            region_price_factor: region_price_factors(),
            sku_base_success: sku_base_success_rates(),
            region_success_factor: region_success_factors(),
            region_names: REGIONS.to_vec(),
            sku_names: SKUS.to_vec(),
        }
    }
}

impl ReferenceData for StaticReferenceData {
    fn region_distance(&self, from: &str, to: &str) -> u8 {
        if from == to {
            return 0;
        }
        self.distances
            .get(&(from, to))
            .copied()
            .unwrap_or(DEFAULT_REGION_DISTANCE)
    }

    fn sku_spec(&self, sku: &str) -> Option<&SkuSpec> {
        self.specs.get(sku)
    }

    fn price_per_hour(&self, region: &str, sku: &str) -> Option<f64> {
        let base = self.base_prices.get(sku)?;
        let factor = self.region_price_factor.get(region).copied()?;
        Some(base * factor)
    }

    fn baseline_success_rate(&self, region: &str, sku: &str) -> Option<f64> {
        let base = self.sku_base_success.get(sku)?;
        let factor = self.region_success_factor.get(region).copied()?;
        Some((base * factor).clamp(0.0, 1.0))
    }

    fn regions(&self) -> Vec<&str> {
        self.region_names.clone()
    }

    fn skus(&self) -> Vec<&str> {
        self.sku_names.clone()
    }
}

const REGIONS: &[&str] = &[
    "eastus",
    "eastus2",
    "southcentralus",
    "westus2",
    "westus3",
    "northeurope",
    "westeurope",
    "uksouth",
    "swedencentral",
    "japaneast",
    "koreacentral",
    "southeastasia",
    "australiaeast",
];

const SKUS: &[&str] = &[
    "Standard_NC4as_T4_v3",
    "Standard_NC16as_T4_v3",
    "Standard_NC64as_T4_v3",
    "Standard_NC6s_v3",
    "Standard_NC12s_v3",
    "Standard_NC24s_v3",
    "Standard_NV36ads_A10_v5",
    "Standard_NC24ads_A100_v4",
    "Standard_NC48ads_A100_v4",
    "Standard_NC96ads_A100_v4",
    "Standard_ND96asr_v4",
    "Standard_NC40ads_H100_v5",
    "Standard_ND96isr_H100_v5",
];

fn region_distances() -> HashMap<(&'static str, &'static str), u8> {
    // Curated hop costs, 1 = same geography, 5 = far / unknown.
    // Deliberately asymmetric where backbone routing differs by direction.
    let entries: &[(&str, &str, u8)] = &[
        ("eastus", "eastus2", 1),
        ("eastus2", "eastus", 1),
        ("eastus", "southcentralus", 2),
        ("southcentralus", "eastus", 2),
        ("eastus", "westus2", 3),
        ("westus2", "eastus", 3),
        ("eastus", "westus3", 3),
        ("westus3", "eastus", 3),
        ("westus2", "westus3", 1),
        ("westus3", "westus2", 1),
        ("southcentralus", "westus2", 2),
        ("westus2", "southcentralus", 2),
        ("eastus", "northeurope", 4),
        ("northeurope", "eastus", 3),
        ("eastus", "westeurope", 4),
        ("westeurope", "eastus", 4),
        ("northeurope", "westeurope", 1),
        ("westeurope", "northeurope", 1),
        ("uksouth", "northeurope", 1),
        ("northeurope", "uksouth", 1),
        ("uksouth", "westeurope", 1),
        ("westeurope", "uksouth", 1),
        ("swedencentral", "northeurope", 2),
        ("northeurope", "swedencentral", 2),
        ("swedencentral", "westeurope", 2),
        ("westeurope", "swedencentral", 2),
        ("japaneast", "koreacentral", 1),
        ("koreacentral", "japaneast", 1),
        ("japaneast", "southeastasia", 2),
        ("southeastasia", "japaneast", 2),
        ("southeastasia", "australiaeast", 2),
        ("australiaeast", "southeastasia", 3),
        ("japaneast", "australiaeast", 3),
        ("australiaeast", "japaneast", 3),
        ("westus2", "japaneast", 4),
        ("japaneast", "westus2", 4),
        ("westus2", "australiaeast", 4),
        ("australiaeast", "westus2", 4),
    ];
    entries
        .iter()
        .map(|&(from, to, cost)| ((from, to), cost))
        .collect()
}

fn sku_specs() -> HashMap<&'static str, SkuSpec> {
    let rows: &[(&str, &str, u32, u32, u32, u32)] = &[
        // (name, gpu_model, gpu_count, gpu_memory_gb per GPU, vcpus, ram_gb)
        ("Standard_NC4as_T4_v3", "T4", 1, 16, 4, 28),
        ("Standard_NC16as_T4_v3", "T4", 1, 16, 16, 110),
        ("Standard_NC64as_T4_v3", "T4", 4, 16, 64, 440),
        ("Standard_NC6s_v3", "V100", 1, 16, 6, 112),
        ("Standard_NC12s_v3", "V100", 2, 16, 12, 224),
        ("Standard_NC24s_v3", "V100", 4, 16, 24, 448),
        ("Standard_NV36ads_A10_v5", "A10", 1, 24, 36, 440),
        ("Standard_NC24ads_A100_v4", "A100", 1, 80, 24, 220),
        ("Standard_NC48ads_A100_v4", "A100", 2, 80, 48, 440),
        ("Standard_NC96ads_A100_v4", "A100", 4, 80, 96, 880),
        ("Standard_ND96asr_v4", "A100", 8, 40, 96, 900),
        ("Standard_NC40ads_H100_v5", "H100", 1, 94, 40, 320),
        ("Standard_ND96isr_H100_v5", "H100", 8, 80, 96, 1900),
    ];
    rows.iter()
        .map(|&(name, gpu_model, gpu_count, gpu_memory_gb, vcpus, ram_gb)| {
            (
                name,
                SkuSpec {
                    name: name.to_string(),
                    gpu_model: gpu_model.to_string(),
                    gpu_count,
                    gpu_memory_gb,
                    vcpus,
                    ram_gb,
                },
            )
        })
        .collect()
}

fn sku_base_prices() -> HashMap<&'static str, f64> {
    [
        ("Standard_NC4as_T4_v3", 0.53),
        ("Standard_NC16as_T4_v3", 1.20),
        ("Standard_NC64as_T4_v3", 4.35),
        ("Standard_NC6s_v3", 3.06),
        ("Standard_NC12s_v3", 6.12),
        ("Standard_NC24s_v3", 12.24),
        ("Standard_NV36ads_A10_v5", 3.20),
        ("Standard_NC24ads_A100_v4", 3.67),
        ("Standard_NC48ads_A100_v4", 7.35),
        ("Standard_NC96ads_A100_v4", 14.69),
        ("Standard_ND96asr_v4", 27.20),
        ("Standard_NC40ads_H100_v5", 6.98),
        ("Standard_ND96isr_H100_v5", 98.32),
    ]
    .into_iter()
    .collect()
}

fn region_price_factors() -> HashMap<&'static str, f64> {
    [
        ("eastus", 1.0),
        ("eastus2", 1.0),
        ("southcentralus", 1.02),
        ("westus2", 1.0),
        ("westus3", 0.98),
        ("northeurope", 1.06),
        ("westeurope", 1.08),
        ("uksouth", 1.10),
        ("swedencentral", 1.04),
        ("japaneast", 1.18),
        ("koreacentral", 1.12),
        ("southeastasia", 1.14),
        ("australiaeast", 1.16),
    ]
    .into_iter()
    .collect()
}

fn sku_base_success_rates() -> HashMap<&'static str, f64> {
    // Scarcer silicon provisions less reliably.
    [
        ("Standard_NC4as_T4_v3", 0.94),
        ("Standard_NC16as_T4_v3", 0.92),
        ("Standard_NC64as_T4_v3", 0.88),
        ("Standard_NC6s_v3", 0.86),
        ("Standard_NC12s_v3", 0.84),
        ("Standard_NC24s_v3", 0.80),
        ("Standard_NV36ads_A10_v5", 0.88),
        ("Standard_NC24ads_A100_v4", 0.72),
        ("Standard_NC48ads_A100_v4", 0.68),
        ("Standard_NC96ads_A100_v4", 0.62),
        ("Standard_ND96asr_v4", 0.58),
        ("Standard_NC40ads_H100_v5", 0.55),
        ("Standard_ND96isr_H100_v5", 0.45),
    ]
    .into_iter()
    .collect()
}

fn region_success_factors() -> HashMap<&'static str, f64> {
    [
        ("eastus", 0.95),
        ("eastus2", 1.0),
        ("southcentralus", 1.05),
        ("westus2", 0.90),
        ("westus3", 1.02),
        ("northeurope", 1.0),
        ("westeurope", 0.92),
        ("uksouth", 0.98),
        ("swedencentral", 1.08),
        ("japaneast", 0.94),
        ("koreacentral", 1.0),
        ("southeastasia", 0.96),
        ("australiaeast", 1.02),
    ]
    .into_iter()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_pair_defaults_to_five() {
        let reference = StaticReferenceData::new();
        assert_eq!(reference.region_distance("eastus", "australiaeast"), 5);
        assert_eq!(reference.region_distance("nowhere", "eastus"), 5);
    }

    #[test]
    fn test_distance_table_is_asymmetric_where_authored() {
        let reference = StaticReferenceData::new();
        assert_eq!(reference.region_distance("eastus", "northeurope"), 4);
        assert_eq!(reference.region_distance("northeurope", "eastus"), 3);
        assert_eq!(reference.region_distance("southeastasia", "australiaeast"), 2);
        assert_eq!(reference.region_distance("australiaeast", "southeastasia"), 3);
    }

    #[test]
    fn test_same_region_distance_zero() {
        let reference = StaticReferenceData::new();
        assert_eq!(reference.region_distance("eastus", "eastus"), 0);
    }

    #[test]
    fn test_every_sku_has_spec_and_price() {
        let reference = StaticReferenceData::new();
        for sku in reference.skus() {
            let spec = reference.sku_spec(sku).unwrap_or_else(|| panic!("no spec for {sku}"));
            assert!(spec.gpu_count >= 1);
            assert!(spec.gpu_memory_gb >= 16);
            assert!(reference.price_per_hour("eastus", sku).is_some());
            assert!(reference.baseline_success_rate("eastus", sku).is_some());
        }
    }

    #[test]
    fn test_regional_price_factor_applied() {
        let reference = StaticReferenceData::new();
        let east = reference.price_per_hour("eastus", "Standard_NC6s_v3").unwrap();
        let japan = reference.price_per_hour("japaneast", "Standard_NC6s_v3").unwrap();
        assert!(japan > east);
    }

    #[test]
    fn test_baseline_success_rate_clamped() {
        let reference = StaticReferenceData::new();
        for region in reference.regions() {
            for sku in reference.skus() {
                let rate = reference.baseline_success_rate(region, sku).unwrap();
                assert!((0.0..=1.0).contains(&rate));
            }
        }
    }
}
