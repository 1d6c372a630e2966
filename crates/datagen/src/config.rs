//! Generator settings
//!
//! Layered lowest to highest precedence: optional config file, `DATAGEN_*`
//! environment variables, command-line flags.

use anyhow::Result;
use clap::Args;
use datagen_lib::anomaly::AnomalyKind;
use datagen_lib::dataset::{
    GenerationMode, GeneratorConfig, DEFAULT_ANOMALY_RATIO, DEFAULT_NUM_SAMPLES, DEFAULT_SEED,
    DEFAULT_SEQ_LEN,
};
use datagen_lib::simulator::DEFAULT_STEP_HOURS;
use datagen_lib::workload::WorkloadArchetype;
use datagen_lib::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable prefix (`DATAGEN_NUM_SAMPLES`, `DATAGEN_ARCHETYPES`, ...)
const ENV_PREFIX: &str = "DATAGEN";

/// Raw generator settings as read from file and environment
#[derive(Debug, Clone, Deserialize)]
pub struct DatagenSettings {
    #[serde(default = "default_num_samples")]
    pub num_samples: usize,

    #[serde(default = "default_seq_len")]
    pub seq_len: usize,

    #[serde(default = "default_anomaly_ratio")]
    pub anomaly_ratio: f64,

    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Wall-clock hours between timesteps
    #[serde(default = "default_step_hours")]
    pub step_hours: f64,

    /// `sequence` or `flat`
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Archetype names to draw from (empty means all)
    #[serde(default)]
    pub archetypes: Vec<String>,

    /// Anomaly kind names to draw from (empty means all)
    #[serde(default)]
    pub anomaly_kinds: Vec<String>,

    /// Path of the `.npz` artifact
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_num_samples() -> usize {
    DEFAULT_NUM_SAMPLES
}

fn default_seq_len() -> usize {
    DEFAULT_SEQ_LEN
}

fn default_anomaly_ratio() -> f64 {
    DEFAULT_ANOMALY_RATIO
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_step_hours() -> f64 {
    DEFAULT_STEP_HOURS
}

fn default_mode() -> String {
    GenerationMode::default().to_string()
}

fn default_output() -> PathBuf {
    PathBuf::from("data/training_data.npz")
}

/// Command-line overrides; every flag left unset keeps the layered value
#[derive(Debug, Clone, Default, Args)]
pub struct Overrides {
    /// Number of samples to generate
    #[arg(long, short = 'n')]
    pub samples: Option<usize>,

    /// Timesteps per sequence
    #[arg(long)]
    pub seq_len: Option<usize>,

    /// Fraction of samples carrying an anomaly, in [0, 1]
    #[arg(long)]
    pub anomaly_ratio: Option<f64>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Hours between timesteps
    #[arg(long)]
    pub step_hours: Option<f64>,

    /// Generation mode (sequence, flat)
    #[arg(long)]
    pub mode: Option<String>,

    /// Comma-separated archetypes to draw from (web, batch, database, microservice, cron)
    #[arg(long, value_delimiter = ',')]
    pub archetypes: Option<Vec<String>>,

    /// Comma-separated anomaly kinds to draw from (memory_leak, cpu_spike, noisy)
    #[arg(long, value_delimiter = ',')]
    pub anomaly_kinds: Option<Vec<String>>,

    /// Output path of the .npz dataset
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

impl DatagenSettings {
    /// Load settings from an optional config file and the environment
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = config_file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("archetypes")
                    .with_list_parse_key("anomaly_kinds"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Apply command-line flags on top of the loaded settings
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(samples) = overrides.samples {
            self.num_samples = samples;
        }
        if let Some(seq_len) = overrides.seq_len {
            self.seq_len = seq_len;
        }
        if let Some(ratio) = overrides.anomaly_ratio {
            self.anomaly_ratio = ratio;
        }
        if let Some(seed) = overrides.seed {
            self.seed = seed;
        }
        if let Some(step_hours) = overrides.step_hours {
            self.step_hours = step_hours;
        }
        if let Some(mode) = &overrides.mode {
            self.mode = mode.clone();
        }
        if let Some(archetypes) = &overrides.archetypes {
            self.archetypes = archetypes.clone();
        }
        if let Some(kinds) = &overrides.anomaly_kinds {
            self.anomaly_kinds = kinds.clone();
        }
        if let Some(output) = &overrides.output {
            self.output = output.clone();
        }
    }

    /// Resolve names and validate into a generator configuration
    pub fn generator_config(&self) -> Result<GeneratorConfig, ConfigError> {
        let archetypes = if self.archetypes.is_empty() {
            WorkloadArchetype::ALL.to_vec()
        } else {
            parse_names(&self.archetypes)?
        };
        let anomaly_kinds = if self.anomaly_kinds.is_empty() {
            AnomalyKind::ALL.to_vec()
        } else {
            parse_names(&self.anomaly_kinds)?
        };

        let config = GeneratorConfig {
            num_samples: self.num_samples,
            seq_len: self.seq_len,
            anomaly_ratio: self.anomaly_ratio,
            seed: self.seed,
            step_hours: self.step_hours,
            mode: self.mode.parse()?,
            archetypes,
            anomaly_kinds,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Parse names, dropping blanks and duplicates while keeping first-seen order
fn parse_names<T>(names: &[String]) -> Result<Vec<T>, ConfigError>
where
    T: std::str::FromStr<Err = ConfigError> + PartialEq,
{
    let mut parsed = Vec::with_capacity(names.len());
    for name in names.iter().filter(|n| !n.trim().is_empty()) {
        let value = name.parse::<T>()?;
        if !parsed.contains(&value) {
            parsed.push(value);
        }
    }
    Ok(parsed)
}
