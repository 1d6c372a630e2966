//! Output formatting utilities

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use datagen_lib::dataset::{DatasetSummary, NamedColumn};
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

/// Output format for the run summary
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// One row of the column statistics table
#[derive(Tabled)]
struct ColumnRow {
    #[tabled(rename = "Column")]
    name: String,
    #[tabled(rename = "Mean")]
    mean: String,
    #[tabled(rename = "Std")]
    std_dev: String,
    #[tabled(rename = "Min")]
    min: String,
    #[tabled(rename = "Max")]
    max: String,
}

impl From<&NamedColumn> for ColumnRow {
    fn from(column: &NamedColumn) -> Self {
        Self {
            name: column.name.clone(),
            mean: format_value(column.stats.mean),
            std_dev: format_value(column.stats.std_dev),
            min: format_value(column.stats.min),
            max: format_value(column.stats.max),
        }
    }
}

/// Print the summary of a finished run
pub fn print_summary(summary: &DatasetSummary, path: &Path, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            print_success(&format!(
                "Saved {} samples to {}",
                summary.total_samples(),
                path.display()
            ));
            print_info(&format!(
                "Splits: train {}, val {}, test {} (mode {}, seq_len {}, seed {})",
                summary.train_samples,
                summary.validation_samples,
                summary.test_samples,
                summary.mode,
                summary.seq_len,
                summary.seed
            ));
            print_info(&format!(
                "Anomalous samples: {} ({})",
                summary.anomalous_samples,
                format_counts(&summary.by_anomaly)
            ));
            print_info(&format!(
                "Archetypes: {}",
                format_counts(&summary.by_archetype)
            ));
            if summary.validation_samples == 0 || summary.test_samples == 0 {
                print_warning("Validation or test split is empty; generate more samples");
            }

            print_columns("Features", &summary.features);
            print_columns("Labels", &summary.labels);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(summary)?);
        }
    }
    Ok(())
}

fn print_columns(title: &str, columns: &[NamedColumn]) {
    let rows: Vec<ColumnRow> = columns.iter().map(ColumnRow::from).collect();
    println!("\n{}", title.bold());
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
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

fn format_value(value: f64) -> String {
    format!("{:.4}", value)
}

/// `name=count` pairs, or `none`
fn format_counts(counts: &std::collections::BTreeMap<String, usize>) -> String {
    if counts.is_empty() {
        return "none".to_string();
    }
    counts
        .iter()
        .map(|(name, count)| format!("{}={}", name, count))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(0.123456), "0.1235");
        assert_eq!(format_value(1.0), "1.0000");
    }

    #[test]
    fn test_format_counts() {
        let mut counts = BTreeMap::new();
        assert_eq!(format_counts(&counts), "none");
        counts.insert("web".to_string(), 3);
        counts.insert("cron".to_string(), 1);
        assert_eq!(format_counts(&counts), "cron=1, web=3");
    }
}
