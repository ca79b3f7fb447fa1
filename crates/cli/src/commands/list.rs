//! Reference data listing commands

use anyhow::Result;
use capacity_engine::{ReferenceData, StaticReferenceData};
use tabled::Tabled;

use crate::output::{format_price, OutputFormat};

/// Row for the SKU listing table
#[derive(Tabled)]
struct SkuSpecRow {
    #[tabled(rename = "SKU")]
    sku: String,
    #[tabled(rename = "GPU")]
    gpu_model: String,
    #[tabled(rename = "GPUs")]
    gpu_count: String,
    #[tabled(rename = "GPU Mem")]
    gpu_memory: String,
    #[tabled(rename = "vCPUs")]
    vcpus: String,
    #[tabled(rename = "RAM")]
    ram: String,
    #[tabled(rename = "Price (eastus)")]
    price: String,
}

/// List known regions
pub fn regions(format: OutputFormat) -> Result<()> {
    let reference = StaticReferenceData::new();
    let names: Vec<String> = reference.regions().iter().map(|r| r.to_string()).collect();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&names)?);
        }
        OutputFormat::Table => {
            for name in &names {
                println!("{}", name);
            }
            println!("\nTotal: {} regions", names.len());
        }
    }

    Ok(())
}

/// List known GPU SKUs with specs and eastus reference prices
pub fn skus(format: OutputFormat) -> Result<()> {
    let reference = StaticReferenceData::new();
    let specs: Vec<_> = reference
        .skus()
        .iter()
        .filter_map(|sku| reference.sku_spec(sku).cloned())
        .collect();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&specs)?);
        }
        OutputFormat::Table => {
            let rows: Vec<SkuSpecRow> = specs
                .iter()
                .map(|spec| SkuSpecRow {
                    sku: spec.name.clone(),
                    gpu_model: spec.gpu_model.clone(),
                    gpu_count: spec.gpu_count.to_string(),
                    gpu_memory: format!("{}GB", spec.gpu_memory_gb),
                    vcpus: spec.vcpus.to_string(),
                    ram: format!("{}GB", spec.ram_gb),
                    price: format_price(reference.price_per_hour("eastus", &spec.name)),
                })
                .collect();
            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
        }
    }

    Ok(())
}
