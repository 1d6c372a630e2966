//! Observability infrastructure for the data generator
//!
//! Provides:
//! - Prometheus metrics (sample generation latency, samples per archetype,
//!   anomalies per kind, dataset write latency)
//! - Structured JSON logging with tracing

use crate::anomaly::AnomalyKind;
use crate::dataset::GeneratorConfig;
use crate::workload::WorkloadArchetype;
use prometheus::{
    register_histogram, register_int_counter_vec, Encoder, Histogram, IntCounterVec, TextEncoder,
};
use std::path::Path;
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for per-sample generation latency (in seconds)
const SAMPLE_LATENCY_BUCKETS: &[f64] = &[
    0.000_001, 0.000_005, 0.00001, 0.000_025, 0.00005, 0.0001, 0.00025, 0.0005, 0.001, 0.005,
];

/// Histogram buckets for dataset write latency (in seconds)
const WRITE_LATENCY_BUCKETS: &[f64] = &[0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<GeneratorMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct GeneratorMetricsInner {
    sample_latency_seconds: Histogram,
    write_latency_seconds: Histogram,
    samples_generated: IntCounterVec,
    anomalies_injected: IntCounterVec,
}

impl GeneratorMetricsInner {
    fn new() -> Self {
        Self {
            sample_latency_seconds: register_histogram!(
                "datagen_sample_latency_seconds",
                "Time spent simulating and labelling one sample",
                SAMPLE_LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register sample_latency_seconds"),

            write_latency_seconds: register_histogram!(
                "datagen_write_latency_seconds",
                "Time spent writing the dataset artifacts",
                WRITE_LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register write_latency_seconds"),

            samples_generated: register_int_counter_vec!(
                "datagen_samples_generated_total",
                "Number of samples generated per workload archetype",
                &["archetype"]
            )
            .expect("Failed to register samples_generated"),

            anomalies_injected: register_int_counter_vec!(
                "datagen_anomalies_injected_total",
                "Number of samples carrying an anomaly, per kind",
                &["kind"]
            )
            .expect("Failed to register anomalies_injected"),
        }
    }
}

/// Generator metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct GeneratorMetrics {
    _private: (),
}

impl Default for GeneratorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(GeneratorMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &GeneratorMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    pub fn observe_sample_latency(&self, duration_secs: f64) {
        self.inner().sample_latency_seconds.observe(duration_secs);
    }

    pub fn observe_write_latency(&self, duration_secs: f64) {
        self.inner().write_latency_seconds.observe(duration_secs);
    }

    pub fn inc_samples_generated(&self, archetype: WorkloadArchetype) {
        self.inner()
            .samples_generated
            .with_label_values(&[archetype.as_str()])
            .inc();
    }

    pub fn inc_anomalies_injected(&self, kind: AnomalyKind) {
        self.inner()
            .anomalies_injected
            .with_label_values(&[kind.as_str()])
            .inc();
    }

    pub fn samples_generated(&self, archetype: WorkloadArchetype) -> u64 {
        self.inner()
            .samples_generated
            .with_label_values(&[archetype.as_str()])
            .get()
    }

    /// Encode all registered metrics in the Prometheus text format
    pub fn encode_text(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&prometheus::gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Structured logger for generation lifecycle events
///
/// Every event carries the run identifier so logs of concurrent runs can be
/// told apart.
pub struct StructuredLogger {
    run_id: String,
}

impl StructuredLogger {
    pub fn new(run_id: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn log_startup(&self, version: &str) {
        info!(
            event = "datagen_started",
            run_id = %self.run_id,
            version = %version,
            "Training data generator started"
        );
    }

    pub fn log_generation_started(&self, config: &GeneratorConfig) {
        info!(
            event = "generation_started",
            run_id = %self.run_id,
            num_samples = config.num_samples,
            seq_len = config.effective_seq_len(),
            anomaly_ratio = config.anomaly_ratio,
            seed = config.seed,
            step_hours = config.step_hours,
            mode = %config.mode,
            "Generating samples"
        );
    }

    pub fn log_progress(&self, generated: u64, total: u64) {
        info!(
            event = "generation_progress",
            run_id = %self.run_id,
            generated = generated,
            total = total,
            "Generated {}/{} samples",
            generated,
            total
        );
    }

    pub fn log_dataset_split(&self, train: usize, validation: usize, test: usize) {
        info!(
            event = "dataset_split",
            run_id = %self.run_id,
            train = train,
            validation = validation,
            test = test,
            "Shuffled and split sample pool"
        );
    }

    pub fn log_dataset_written(&self, path: &Path, samples: usize, duration_secs: f64) {
        info!(
            event = "dataset_written",
            run_id = %self.run_id,
            path = %path.display(),
            samples = samples,
            duration_secs = duration_secs,
            "Dataset saved"
        );
    }

    pub fn log_config_rejected(&self, reason: &str) {
        warn!(
            event = "config_rejected",
            run_id = %self.run_id,
            reason = %reason,
            "Configuration rejected, nothing generated"
        );
    }
}
