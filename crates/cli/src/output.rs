//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a table from a list of items
pub fn print_table<T: Tabled + Serialize>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("{}", "No items found".yellow());
                return;
            }
            let table = Table::new(items).with(Style::rounded()).to_string();
            println!("{}", table);
        }
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(&items) {
                println!("{}", json);
            }
        }
    }
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format confidence as percentage
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.0}%", confidence * 100.0)
}

/// Format an hourly price, or a dash when unknown
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) => format!("${:.2}/hr", p),
        None => "-".to_string(),
    }
}

/// Format provisioning latency in seconds
pub fn format_latency(millis: f64) -> String {
    format!("{:.1}s", millis / 1000.0)
}

/// Color an availability label based on its value
pub fn color_label(label: &str) -> String {
    match label {
        "AVAILABLE" => label.green().to_string(),
        "LIMITED" => label.yellow().to_string(),
        "UNAVAILABLE" => label.red().to_string(),
        _ => label.to_string(),
    }
}

/// Color confidence based on value
pub fn color_confidence(confidence: f64) -> String {
    let formatted = format_confidence(confidence);
    if confidence >= 0.8 {
        formatted.green().to_string()
    } else if confidence >= 0.5 {
        formatted.yellow().to_string()
    } else {
        formatted.red().to_string()
    }
}

/// Color a recommendation strength based on its value
pub fn color_strength(strength: &str) -> String {
    match strength {
        "strong" => strength.green().to_string(),
        "moderate" => strength.yellow().to_string(),
        "weak" => strength.red().to_string(),
        _ => strength.to_string(),
    }
}
