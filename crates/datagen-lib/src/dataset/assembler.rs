//! Dataset assembly
//!
//! Draws independent samples, labels them, and hands the pool to the
//! splitter. Every sample reads only from its own derived random streams,
//! so a sample's content depends on (seed, index) alone.

use super::config::{GenerationMode, GeneratorConfig};
use super::split::{shuffle_and_split, Dataset};
use crate::anomaly::{AnomalyEvent, AnomalyKind};
use crate::error::ConfigError;
use crate::labels::LabelDeriver;
use crate::models::{LabeledSample, TimeContext};
use crate::observability::{GeneratorMetrics, StructuredLogger};
use crate::simulator::{stream_rng, NoiseSource, SequenceSimulator, Stream};
use crate::workload::WorkloadArchetype;
use rand::Rng;
use std::time::Instant;
use tracing::debug;

/// Youngest workload age drawn for a sequence start (days)
pub const MIN_AGE_DAYS: f64 = 0.1;

/// Oldest workload age drawn for a sequence start (days)
pub const MAX_AGE_DAYS: f64 = 30.0;

/// Log progress every this many samples
const PROGRESS_INTERVAL: u64 = 10_000;

/// Per-sample draws made before simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleSpec {
    pub index: u64,
    pub archetype: WorkloadArchetype,
    pub start: TimeContext,
    pub anomaly: Option<AnomalyKind>,
}

/// Generates, labels and splits a complete dataset
pub struct DatasetAssembler {
    config: GeneratorConfig,
    deriver: LabelDeriver,
    metrics: Option<GeneratorMetrics>,
    logger: Option<StructuredLogger>,
}

impl DatasetAssembler {
    /// Create an assembler; the configuration is validated up front
    pub fn new(config: GeneratorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            deriver: LabelDeriver::new(),
            metrics: None,
            logger: None,
        })
    }

    pub fn with_metrics(mut self, metrics: GeneratorMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_logger(mut self, logger: StructuredLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_label_deriver(mut self, deriver: LabelDeriver) -> Self {
        self.deriver = deriver;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Draw archetype, start context and anomaly for sample `index`
    pub fn plan_sample(&self, index: u64) -> SampleSpec {
        let mut rng = stream_rng(self.config.seed, Stream::Plan, index);
        let archetypes = &self.config.archetypes;
        let archetype = archetypes[rng.gen_range(0..archetypes.len())];

        let start = TimeContext::new(
            rng.gen::<f64>(),
            rng.gen::<f64>(),
            rng.gen_range(MIN_AGE_DAYS..MAX_AGE_DAYS),
        );

        let anomaly = if rng.gen::<f64>() < self.config.anomaly_ratio {
            let kinds = &self.config.anomaly_kinds;
            Some(kinds[rng.gen_range(0..kinds.len())])
        } else {
            None
        };

        SampleSpec {
            index,
            archetype,
            start,
            anomaly,
        }
    }

    /// Simulate and label one planned sample
    pub fn generate_sample(&self, spec: &SampleSpec) -> LabeledSample {
        let seq_len = self.config.effective_seq_len();
        let mut trace = stream_rng(self.config.seed, Stream::Trace, spec.index);
        let anomaly_rng = stream_rng(self.config.seed, Stream::Anomaly, spec.index);
        let event = spec.anomaly.map(|kind| AnomalyEvent::for_sequence(kind, seq_len));
        let simulator =
            SequenceSimulator::new(spec.archetype).with_step_hours(self.config.step_hours);

        let (sequence, label) = match self.config.mode {
            GenerationMode::Sequence => {
                let sequence = simulator.generate(spec.start, seq_len, event, &mut trace, anomaly_rng);
                let label = self.deriver.derive(&sequence);
                (sequence, label)
            }
            GenerationMode::Flat => {
                let sequence = simulator.without_autocorrelation().generate(
                    spec.start,
                    seq_len,
                    event,
                    &mut trace,
                    anomaly_rng,
                );
                let base_confidence = trace.uniform(0.85, 0.95);
                let label = self
                    .deriver
                    .derive_point(&sequence.steps[0], base_confidence, spec.anomaly);
                (sequence, label)
            }
        };

        LabeledSample {
            index: spec.index,
            sequence,
            label,
        }
    }

    /// Generate every sample, shuffle the pool and split it 80/10/10
    pub fn generate(&self) -> Dataset {
        let total = self.config.num_samples as u64;
        if let Some(logger) = &self.logger {
            logger.log_generation_started(&self.config);
        }

        let mut pool = Vec::with_capacity(self.config.num_samples);
        for index in 0..total {
            let started = Instant::now();
            let spec = self.plan_sample(index);
            let sample = self.generate_sample(&spec);

            if let Some(metrics) = &self.metrics {
                metrics.observe_sample_latency(started.elapsed().as_secs_f64());
                metrics.inc_samples_generated(spec.archetype);
                if let Some(kind) = spec.anomaly {
                    metrics.inc_anomalies_injected(kind);
                }
            }
            if (index + 1) % PROGRESS_INTERVAL == 0 {
                if let Some(logger) = &self.logger {
                    logger.log_progress(index + 1, total);
                }
            }
            pool.push(sample);
        }

        debug!(samples = pool.len(), "Sample pool complete, shuffling");
        let dataset = shuffle_and_split(
            pool,
            self.config.seed,
            self.config.effective_seq_len(),
            self.config.mode,
        );
        if let Some(logger) = &self.logger {
            logger.log_dataset_split(dataset.train.len(), dataset.validation.len(), dataset.test.len());
        }
        dataset
    }
}
