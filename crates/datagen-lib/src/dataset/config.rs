//! Generator configuration and validation

use crate::anomaly::AnomalyKind;
use crate::error::ConfigError;
use crate::simulator::DEFAULT_STEP_HOURS;
use crate::workload::WorkloadArchetype;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default number of samples
pub const DEFAULT_NUM_SAMPLES: usize = 100_000;

/// Default timesteps per sequence
pub const DEFAULT_SEQ_LEN: usize = 10;

/// Default fraction of samples carrying an anomaly
pub const DEFAULT_ANOMALY_RATIO: f64 = 0.1;

/// Default random seed
pub const DEFAULT_SEED: u64 = 42;

/// Largest accepted spacing between timesteps (one week)
pub const MAX_STEP_HOURS: f64 = 168.0;

/// Shape of generated samples
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// `seq_len` autocorrelated timesteps labelled from sequence aggregates
    #[default]
    Sequence,
    /// One timestep labelled from its own percentiles
    Flat,
}

impl GenerationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            GenerationMode::Sequence => "sequence",
            GenerationMode::Flat => "flat",
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequence" | "lstm" => Ok(GenerationMode::Sequence),
            "flat" => Ok(GenerationMode::Flat),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

/// Parameters of one dataset generation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratorConfig {
    /// Number of independent samples to draw
    pub num_samples: usize,
    /// Timesteps per sequence (forced to 1 in flat mode)
    pub seq_len: usize,
    /// Probability that a sample carries an anomaly
    pub anomaly_ratio: f64,
    /// Global random seed
    pub seed: u64,
    /// Wall-clock hours between timesteps
    pub step_hours: f64,
    pub mode: GenerationMode,
    /// Archetypes drawn uniformly per sample
    pub archetypes: Vec<WorkloadArchetype>,
    /// Anomaly kinds drawn uniformly for anomalous samples
    pub anomaly_kinds: Vec<AnomalyKind>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_samples: DEFAULT_NUM_SAMPLES,
            seq_len: DEFAULT_SEQ_LEN,
            anomaly_ratio: DEFAULT_ANOMALY_RATIO,
            seed: DEFAULT_SEED,
            step_hours: DEFAULT_STEP_HOURS,
            mode: GenerationMode::Sequence,
            archetypes: WorkloadArchetype::ALL.to_vec(),
            anomaly_kinds: AnomalyKind::ALL.to_vec(),
        }
    }
}

impl GeneratorConfig {
    /// Reject configurations that cannot produce a well-formed dataset
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_samples == 0 {
            return Err(ConfigError::InvalidSampleCount(self.num_samples));
        }
        if self.seq_len == 0 {
            return Err(ConfigError::InvalidSequenceLength(self.seq_len));
        }
        if !(0.0..=1.0).contains(&self.anomaly_ratio) {
            return Err(ConfigError::InvalidAnomalyRatio(self.anomaly_ratio));
        }
        if !(self.step_hours > 0.0 && self.step_hours <= MAX_STEP_HOURS) {
            return Err(ConfigError::InvalidStepHours(self.step_hours));
        }
        if self.archetypes.is_empty() {
            return Err(ConfigError::NoArchetypes);
        }
        if self.anomaly_ratio > 0.0 && self.anomaly_kinds.is_empty() {
            return Err(ConfigError::NoAnomalyKinds(self.anomaly_ratio));
        }
        Ok(())
    }

    /// Timesteps actually generated per sample
    pub fn effective_seq_len(&self) -> usize {
        match self.mode {
            GenerationMode::Sequence => self.seq_len,
            GenerationMode::Flat => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(GeneratorConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_anomaly_ratio_out_of_range() {
        for ratio in [-0.1, 1.5, f64::NAN] {
            let config = GeneratorConfig {
                anomaly_ratio: ratio,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidAnomalyRatio(_))
            ));
        }
    }

    #[test]
    fn test_accepts_ratio_bounds() {
        for ratio in [0.0, 1.0] {
            let config = GeneratorConfig {
                anomaly_ratio: ratio,
                ..Default::default()
            };
            assert_eq!(config.validate(), Ok(()));
        }
    }

    #[test]
    fn test_rejects_empty_sequence() {
        let config = GeneratorConfig {
            seq_len: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidSequenceLength(0)));
    }

    #[test]
    fn test_rejects_zero_samples_and_bad_step() {
        let config = GeneratorConfig {
            num_samples: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidSampleCount(0)));

        let config = GeneratorConfig {
            step_hours: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidStepHours(0.0)));
    }

    #[test]
    fn test_rejects_step_hours_beyond_a_week() {
        for step_hours in [1e308, f64::INFINITY, f64::NAN, MAX_STEP_HOURS + 1.0] {
            let config = GeneratorConfig {
                seq_len: 10,
                step_hours,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidStepHours(_))
            ));
        }

        let config = GeneratorConfig {
            seq_len: 10,
            step_hours: MAX_STEP_HOURS,
            ..Default::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_empty_draw_sets() {
        let config = GeneratorConfig {
            archetypes: vec![],
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoArchetypes));

        let config = GeneratorConfig {
            anomaly_kinds: vec![],
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoAnomalyKinds(0.1)));

        let config = GeneratorConfig {
            anomaly_ratio: 0.0,
            anomaly_kinds: vec![],
            ..Default::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_flat_mode_uses_single_step() {
        let config = GeneratorConfig {
            mode: GenerationMode::Flat,
            seq_len: 24,
            ..Default::default()
        };
        assert_eq!(config.effective_seq_len(), 1);
        assert_eq!("FLAT".parse(), Ok(GenerationMode::Flat));
        assert!("tabular".parse::<GenerationMode>().is_err());
    }
}
