//! GPU Capacity Health CLI
//!
//! A command-line tool for scoring (region, SKU) capacity, running bounded
//! scoring sweeps, and looking up alternative-region and alternative-SKU
//! recommendations.

mod commands;
mod output;

use anyhow::Result;
use capacity_engine::RecommendationRequest;
use clap::{Parser, Subcommand};

/// GPU Capacity Health CLI
#[derive(Parser)]
#[command(name = "capctl")]
#[command(author, version, about = "CLI for the GPU Capacity Health engine", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, short, global = true, default_value = "table")]
    pub format: output::OutputFormat,

    /// Seed for the simulated telemetry provider (can also be set via CAPCTL_SEED)
    #[arg(long, env = "CAPCTL_SEED", global = true, default_value_t = 42)]
    pub seed: u64,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a single (region, SKU) combination
    Score {
        /// Region name (e.g. eastus)
        region: String,

        /// VM SKU name (e.g. Standard_NC24ads_A100_v4)
        sku: String,

        /// Telemetry window length in hours
        #[arg(long, default_value_t = 24)]
        window_hours: u32,
    },

    /// Score the cross product of regions and SKUs in one bounded batch
    Batch {
        /// Region to include (repeatable)
        #[arg(long = "region", short, required = true)]
        regions: Vec<String>,

        /// SKU to include (repeatable)
        #[arg(long = "sku", short, required = true)]
        skus: Vec<String>,

        /// Telemetry window length in hours
        #[arg(long, default_value_t = 24)]
        window_hours: u32,

        /// Stop launching new combinations after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Recommend alternative regions and SKUs for a combination
    Recommend {
        /// Region of the original combination
        region: String,

        /// SKU of the original combination
        sku: String,

        /// Telemetry window length in hours
        #[arg(long, default_value_t = 24)]
        window_hours: u32,

        /// Maximum alternatives per list
        #[arg(long, default_value_t = 5)]
        max_alternatives: usize,

        /// Exclude higher-tier SKU alternatives
        #[arg(long)]
        no_higher_tier: bool,

        /// Include lower-tier SKU alternatives
        #[arg(long)]
        include_lower_tier: bool,

        /// Reject SKU alternatives priced above this multiple of the original
        #[arg(long, default_value_t = 2.0)]
        max_price_ratio: f64,

        /// Minimum score for an alternative to qualify
        #[arg(long, default_value_t = 40)]
        min_score: u8,
    },

    /// List known regions and SKUs
    #[command(subcommand)]
    List(ListCommands),
}

#[derive(Subcommand)]
pub enum ListCommands {
    /// List known regions
    Regions,

    /// List known GPU SKUs with hardware specs and reference prices
    Skus,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Score {
            region,
            sku,
            window_hours,
        } => {
            commands::score::run(&region, &sku, window_hours, cli.seed, cli.format).await?;
        }
        Commands::Batch {
            regions,
            skus,
            window_hours,
            timeout_secs,
        } => {
            commands::batch::run(
                &regions,
                &skus,
                window_hours,
                timeout_secs,
                cli.seed,
                cli.format,
            )
            .await?;
        }
        Commands::Recommend {
            region,
            sku,
            window_hours,
            max_alternatives,
            no_higher_tier,
            include_lower_tier,
            max_price_ratio,
            min_score,
        } => {
            let request = RecommendationRequest {
                original_region: region,
                original_sku: sku,
                max_alternatives,
                include_higher_tier: !no_higher_tier,
                include_lower_tier,
                max_price_increase_ratio: max_price_ratio,
                min_availability_score: min_score,
            };
            commands::recommend::run(request, window_hours, cli.seed, cli.format).await?;
        }
        Commands::List(list_cmd) => match list_cmd {
            ListCommands::Regions => commands::list::regions(cli.format)?,
            ListCommands::Skus => commands::list::skus(cli.format)?,
        },
    }

    Ok(())
}

/// Send structured logs to stderr so they never interleave with table output
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
