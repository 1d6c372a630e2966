//! Container Resource Predictor training data generator
//!
//! Generates a labelled synthetic dataset of container resource usage
//! sequences and writes it as a NumPy `.npz` archive plus a JSON manifest.

mod config;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use crate::config::{DatagenSettings, Overrides};
use datagen_lib::dataset::{DatasetAssembler, DatasetSummary, DatasetWriter};
use datagen_lib::{GeneratorMetrics, StructuredLogger};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DATAGEN_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Training data generator CLI
#[derive(Parser)]
#[command(name = "resource-datagen")]
#[command(author, version, about = "Synthetic training data generator for Container Resource Predictor", long_about = None)]
pub struct Cli {
    /// Configuration file (toml, yaml or json)
    #[arg(long, short, env = "DATAGEN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    /// Output format of the run summary
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Write Prometheus metrics in text format to this file after the run
    #[arg(long)]
    pub metrics_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // JSON logs on stderr; stdout carries the summary
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .init();

    let logger = StructuredLogger::new(&format!("datagen-{}", std::process::id()));
    logger.log_startup(DATAGEN_VERSION);

    match run(&cli, &logger) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, logger: &StructuredLogger) -> Result<()> {
    let mut settings =
        DatagenSettings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    settings.apply(&cli.overrides);

    let config = match settings.generator_config() {
        Ok(config) => config,
        Err(e) => {
            logger.log_config_rejected(&e.to_string());
            return Err(e).context("Invalid generator configuration");
        }
    };
    info!(output = %settings.output.display(), "Generator configured");

    let metrics = GeneratorMetrics::new();
    let assembler = DatasetAssembler::new(config)
        .context("Invalid generator configuration")?
        .with_metrics(metrics.clone())
        .with_logger(StructuredLogger::new(logger.run_id()));

    let dataset = assembler.generate();
    let summary = DatasetSummary::from_dataset(&dataset, assembler.config());

    let writer = DatasetWriter::new(&settings.output);
    let started = Instant::now();
    writer
        .write(&dataset, &summary)
        .with_context(|| format!("Failed to write dataset to {}", writer.path().display()))?;
    let elapsed = started.elapsed().as_secs_f64();
    metrics.observe_write_latency(elapsed);
    logger.log_dataset_written(writer.path(), dataset.len(), elapsed);

    output::print_summary(&summary, writer.path(), cli.format)?;

    if let Some(path) = &cli.metrics_file {
        std::fs::write(path, metrics.encode_text()?)
            .with_context(|| format!("Failed to write metrics to {}", path.display()))?;
    }
    Ok(())
}
