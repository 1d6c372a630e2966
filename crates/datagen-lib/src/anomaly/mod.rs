//! Anomaly injection for generated sequences
//!
//! This module provides:
//! - The closed set of anomaly kinds (memory leak, CPU spike, noisy)
//! - Anomaly events confined to the back half of a sequence
//! - The injector that perturbs features in place

mod injector;

pub use injector::AnomalyInjector;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of anomaly carried by a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Strong positive memory trend, inflated memory tail
    MemoryLeak,
    /// Doubled CPU tail, variance and throttling
    CpuSpike,
    /// Tripled CPU variance
    Noisy,
}

impl AnomalyKind {
    pub const ALL: [AnomalyKind; 3] = [
        AnomalyKind::MemoryLeak,
        AnomalyKind::CpuSpike,
        AnomalyKind::Noisy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AnomalyKind::MemoryLeak => "memory_leak",
            AnomalyKind::CpuSpike => "cpu_spike",
            AnomalyKind::Noisy => "noisy",
        }
    }

    /// Confidence multiplier applied to single-point labels
    pub fn point_confidence_factor(self) -> f64 {
        match self {
            AnomalyKind::MemoryLeak => 0.7,
            AnomalyKind::CpuSpike => 0.75,
            AnomalyKind::Noisy => 0.6,
        }
    }
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnomalyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        AnomalyKind::ALL
            .into_iter()
            .find(|k| k.as_str() == normalized)
            .ok_or_else(|| ConfigError::UnknownAnomalyKind(s.to_string()))
    }
}

/// An anomaly attached to one sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyEvent {
    pub kind: AnomalyKind,
    /// First timestep index the anomaly affects
    pub onset: usize,
}

impl AnomalyEvent {
    /// Event covering the back half (`index >= seq_len / 2`) of a sequence
    pub fn for_sequence(kind: AnomalyKind, seq_len: usize) -> Self {
        Self {
            kind,
            onset: seq_len / 2,
        }
    }

    pub fn affects(&self, index: usize) -> bool {
        index >= self.onset
    }
}
