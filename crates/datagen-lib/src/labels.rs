//! Ground-truth label derivation
//!
//! Reduces a generated sequence to a resource recommendation: requests follow
//! the average median, limits follow the worst-case tail, and confidence
//! reflects how stable the tail was across the sequence.

use crate::anomaly::AnomalyKind;
use crate::models::{FeatureSequence, FeatureVector, LabelVector};
use crate::stats;

/// Memory limit buffer over the worst p99 (20%)
pub const MEMORY_BUFFER_PERCENT: f64 = 0.20;

/// CPU limit buffer over the worst p99 (15%)
pub const CPU_BUFFER_PERCENT: f64 = 0.15;

/// Added to the p99 mean so a flat series never divides by zero
const STABILITY_EPSILON: f64 = 0.01;

/// Coefficients turning usage statistics into labels
#[derive(Debug, Clone)]
pub struct LabelPolicy {
    /// Multiplier on average CPU median for the request
    pub cpu_request_factor: f64,
    /// Multiplier on worst CPU p99 for the limit
    pub cpu_limit_factor: f64,
    /// Multiplier on average memory median for the request
    pub mem_request_factor: f64,
    /// Multiplier on worst memory p99 for the limit
    pub mem_limit_factor: f64,
    /// Constant headroom added to requests
    pub request_offset: f64,
    /// Constant headroom added to limits
    pub limit_offset: f64,
    /// Lower bound for requests and limits
    pub min_resource: f64,
    /// Upper bound for requests
    pub max_request: f64,
    /// Confidence bounds for sequence labels
    pub min_confidence: f64,
    pub max_confidence: f64,
    /// Confidence multiplier for sequences carrying an anomaly
    pub anomaly_confidence_factor: f64,
}

impl Default for LabelPolicy {
    fn default() -> Self {
        Self {
            cpu_request_factor: 1.10,
            cpu_limit_factor: 1.0 + CPU_BUFFER_PERCENT,
            mem_request_factor: 1.15,
            mem_limit_factor: 1.0 + MEMORY_BUFFER_PERCENT,
            request_offset: 0.02,
            limit_offset: 0.05,
            min_resource: 0.01,
            max_request: 0.95,
            min_confidence: 0.3,
            max_confidence: 0.95,
            anomaly_confidence_factor: 0.7,
        }
    }
}

/// Derives label vectors from generated features
#[derive(Debug, Clone, Default)]
pub struct LabelDeriver {
    policy: LabelPolicy,
}

impl LabelDeriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: LabelPolicy) -> Self {
        Self { policy }
    }

    /// Label a whole sequence from its aggregate statistics
    pub fn derive(&self, sequence: &FeatureSequence) -> LabelVector {
        let cpu_p50 = sequence.series(|s| s.cpu_usage_p50);
        let cpu_p99 = sequence.series(|s| s.cpu_usage_p99);
        let mem_p50 = sequence.series(|s| s.mem_usage_p50);
        let mem_p99 = sequence.series(|s| s.mem_usage_p99);

        let (cpu_request, cpu_limit) = self.cpu_pair(stats::mean(&cpu_p50), stats::max(&cpu_p99));
        let (mem_request, mem_limit) = self.mem_pair(stats::mean(&mem_p50), stats::max(&mem_p99));

        let p = &self.policy;
        let base = 0.5 * (stability(&cpu_p99) + stability(&mem_p99)) * 0.9 + 0.1;
        let mut confidence = base.clamp(p.min_confidence, p.max_confidence);
        if sequence.anomaly.is_some() {
            confidence = (confidence * p.anomaly_confidence_factor)
                .clamp(p.min_confidence, p.max_confidence);
        }

        LabelVector {
            cpu_request,
            cpu_limit,
            mem_request,
            mem_limit,
            confidence,
        }
    }

    /// Label a single timestep (flat generation mode)
    ///
    /// `base_confidence` is drawn by the caller; an anomaly scales it by the
    /// kind's point penalty.
    pub fn derive_point(
        &self,
        features: &FeatureVector,
        base_confidence: f64,
        anomaly: Option<AnomalyKind>,
    ) -> LabelVector {
        let (cpu_request, cpu_limit) = self.cpu_pair(features.cpu_usage_p50, features.cpu_usage_p99);
        let (mem_request, mem_limit) = self.mem_pair(features.mem_usage_p50, features.mem_usage_p99);
        let factor = anomaly.map_or(1.0, AnomalyKind::point_confidence_factor);

        LabelVector {
            cpu_request,
            cpu_limit,
            mem_request,
            mem_limit,
            confidence: (base_confidence * factor).clamp(0.0, 1.0),
        }
    }

    fn cpu_pair(&self, p50: f64, p99: f64) -> (f64, f64) {
        let p = &self.policy;
        resource_pair(p50, p99, p.cpu_request_factor, p.cpu_limit_factor, p)
    }

    fn mem_pair(&self, p50: f64, p99: f64) -> (f64, f64) {
        let p = &self.policy;
        resource_pair(p50, p99, p.mem_request_factor, p.mem_limit_factor, p)
    }
}

/// Request from the median, limit from the tail, limit never below request
fn resource_pair(
    p50: f64,
    p99: f64,
    request_factor: f64,
    limit_factor: f64,
    policy: &LabelPolicy,
) -> (f64, f64) {
    let request = (p50 * request_factor + policy.request_offset)
        .clamp(policy.min_resource, policy.max_request);
    let limit = (p99 * limit_factor + policy.limit_offset).clamp(request, 1.0);
    (request, limit)
}

/// `1 - std / (mean + 0.01)` of a tail series
pub fn stability(series: &[f64]) -> f64 {
    1.0 - stats::std_dev(series) / (stats::mean(series) + STABILITY_EPSILON)
}
