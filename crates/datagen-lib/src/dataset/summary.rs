//! Dataset summary statistics and manifest contents

use super::config::{GenerationMode, GeneratorConfig};
use super::split::Dataset;
use crate::models::{FEATURE_COUNT, FEATURE_NAMES, LABEL_COUNT, LABEL_NAMES};
use crate::stats::{ColumnSummary, OnlineStats};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Statistics of one named column
#[derive(Debug, Clone, Serialize)]
pub struct NamedColumn {
    pub name: String,
    #[serde(flatten)]
    pub stats: ColumnSummary,
}

/// Description of a generated dataset, written next to the array container
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub generated_at: DateTime<Utc>,
    pub mode: GenerationMode,
    pub seq_len: usize,
    pub seed: u64,
    pub anomaly_ratio: f64,
    pub step_hours: f64,
    pub train_samples: usize,
    pub validation_samples: usize,
    pub test_samples: usize,
    pub anomalous_samples: usize,
    pub by_archetype: BTreeMap<String, usize>,
    pub by_anomaly: BTreeMap<String, usize>,
    /// Per-feature statistics over every timestep of every sample
    pub features: Vec<NamedColumn>,
    pub labels: Vec<NamedColumn>,
}

impl DatasetSummary {
    pub fn from_dataset(dataset: &Dataset, config: &GeneratorConfig) -> Self {
        let mut features = vec![OnlineStats::new(); FEATURE_COUNT];
        let mut labels = vec![OnlineStats::new(); LABEL_COUNT];
        let mut by_archetype = BTreeMap::new();
        let mut by_anomaly = BTreeMap::new();

        for sample in dataset.iter() {
            for step in &sample.sequence.steps {
                for (acc, value) in features.iter_mut().zip(step.to_array()) {
                    acc.push(value as f64);
                }
            }
            for (acc, value) in labels.iter_mut().zip(sample.label.to_array()) {
                acc.push(value as f64);
            }
            *by_archetype
                .entry(sample.sequence.archetype.to_string())
                .or_insert(0) += 1;
            if let Some(event) = sample.sequence.anomaly {
                *by_anomaly.entry(event.kind.to_string()).or_insert(0) += 1;
            }
        }

        Self {
            generated_at: Utc::now(),
            mode: dataset.mode,
            seq_len: dataset.seq_len,
            seed: config.seed,
            anomaly_ratio: config.anomaly_ratio,
            step_hours: config.step_hours,
            train_samples: dataset.train.len(),
            validation_samples: dataset.validation.len(),
            test_samples: dataset.test.len(),
            anomalous_samples: by_anomaly.values().sum(),
            by_archetype,
            by_anomaly,
            features: named(&FEATURE_NAMES, &features),
            labels: named(&LABEL_NAMES, &labels),
        }
    }

    pub fn total_samples(&self) -> usize {
        self.train_samples + self.validation_samples + self.test_samples
    }
}

fn named(names: &[&str], columns: &[OnlineStats]) -> Vec<NamedColumn> {
    names
        .iter()
        .zip(columns)
        .map(|(name, acc)| NamedColumn {
            name: name.to_string(),
            stats: acc.summary(),
        })
        .collect()
}
