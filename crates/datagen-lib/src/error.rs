//! Error types for configuration validation and dataset persistence

use thiserror::Error;

/// Rejected generator configuration
///
/// Every variant is raised before the first sample is drawn, so a rejected
/// configuration never produces a partial dataset.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("num_samples must be at least 1, got {0}")]
    InvalidSampleCount(usize),

    #[error("seq_len must be at least 1, got {0}")]
    InvalidSequenceLength(usize),

    #[error("anomaly_ratio must be within [0, 1], got {0}")]
    InvalidAnomalyRatio(f64),

    #[error("step_hours must be in (0, 168], got {0}")]
    InvalidStepHours(f64),

    #[error("at least one workload archetype must be enabled")]
    NoArchetypes,

    #[error("anomaly_ratio is {0} but no anomaly kinds are enabled")]
    NoAnomalyKinds(f64),

    #[error("unknown workload archetype '{0}' (expected one of: web, batch, database, microservice, cron)")]
    UnknownArchetype(String),

    #[error("unknown anomaly kind '{0}' (expected one of: memory_leak, cpu_spike, noisy)")]
    UnknownAnomalyKind(String),

    #[error("unknown generation mode '{0}' (expected one of: sequence, flat)")]
    UnknownMode(String),
}

/// Failure while writing the dataset artifacts
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode npz archive: {0}")]
    Npz(#[from] ndarray_npy::WriteNpzError),

    #[error("array shape mismatch: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("failed to serialize manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}
