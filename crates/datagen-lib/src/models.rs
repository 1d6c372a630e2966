//! Core data models for the training data generator

use crate::anomaly::AnomalyEvent;
use crate::workload::WorkloadArchetype;
use serde::{Deserialize, Serialize};

/// Number of features per timestep
pub const FEATURE_COUNT: usize = 12;

/// Number of label values per sample
pub const LABEL_COUNT: usize = 5;

/// Feature names in array order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "cpu_p50",
    "cpu_p95",
    "cpu_p99",
    "mem_p50",
    "mem_p95",
    "mem_p99",
    "cpu_var",
    "mem_trend",
    "throttle",
    "hour",
    "day",
    "age",
];

/// Label names in array order
pub const LABEL_NAMES: [&str; LABEL_COUNT] =
    ["cpu_req", "cpu_lim", "mem_req", "mem_lim", "confidence"];

/// Workload age (in days) that maps to a normalized age of 1.0
pub const AGE_NORMALIZATION_DAYS: f64 = 30.0;

/// Position in time of a single timestep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeContext {
    /// Fraction of the day in [0, 1)
    pub hour: f64,
    /// Fraction of the week in [0, 1)
    pub day: f64,
    /// Workload age in days
    pub age_days: f64,
}

impl TimeContext {
    pub fn new(hour: f64, day: f64, age_days: f64) -> Self {
        Self {
            hour,
            day,
            age_days,
        }
    }

    /// Context `index` steps after this one, each step lasting `step_hours`
    pub fn advance(&self, index: usize, step_hours: f64) -> Self {
        let elapsed = index as f64 * step_hours;
        Self {
            hour: (self.hour + elapsed / 24.0).rem_euclid(1.0),
            day: (self.day + elapsed / 168.0).rem_euclid(1.0),
            age_days: self.age_days + elapsed / 24.0,
        }
    }

    /// Age scaled to [0, 1] over the first 30 days
    pub fn normalized_age(&self) -> f64 {
        (self.age_days / AGE_NORMALIZATION_DAYS).clamp(0.0, 1.0)
    }
}

/// Feature vector for one timestep, in model input order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub cpu_usage_p50: f64,
    pub cpu_usage_p95: f64,
    pub cpu_usage_p99: f64,
    pub mem_usage_p50: f64,
    pub mem_usage_p95: f64,
    pub mem_usage_p99: f64,
    pub cpu_variance: f64,
    pub mem_trend: f64,
    pub throttle_ratio: f64,
    pub hour_of_day: f64,
    pub day_of_week: f64,
    pub workload_age_days: f64,
}

impl FeatureVector {
    /// Clamp every field back into its documented range.
    ///
    /// Percentiles are re-floored against the previous percentile so that
    /// `p50 <= p95 <= p99 <= 1` holds after any in-place perturbation.
    pub fn enforce_bounds(&mut self) {
        self.cpu_usage_p50 = self.cpu_usage_p50.clamp(0.0, 1.0);
        self.cpu_usage_p95 = self.cpu_usage_p95.clamp(self.cpu_usage_p50, 1.0);
        self.cpu_usage_p99 = self.cpu_usage_p99.clamp(self.cpu_usage_p95, 1.0);
        self.mem_usage_p50 = self.mem_usage_p50.clamp(0.0, 1.0);
        self.mem_usage_p95 = self.mem_usage_p95.clamp(self.mem_usage_p50, 1.0);
        self.mem_usage_p99 = self.mem_usage_p99.clamp(self.mem_usage_p95, 1.0);
        self.cpu_variance = self.cpu_variance.clamp(0.0, 1.0);
        self.mem_trend = self.mem_trend.clamp(-1.0, 1.0);
        self.throttle_ratio = self.throttle_ratio.clamp(0.0, 1.0);
    }

    /// Check the percentile ordering and range invariants
    pub fn is_well_formed(&self) -> bool {
        let ordered = |p50: f64, p95: f64, p99: f64| {
            (0.0..=1.0).contains(&p50) && p50 <= p95 && p95 <= p99 && p99 <= 1.0
        };
        ordered(self.cpu_usage_p50, self.cpu_usage_p95, self.cpu_usage_p99)
            && ordered(self.mem_usage_p50, self.mem_usage_p95, self.mem_usage_p99)
            && (0.0..=1.0).contains(&self.cpu_variance)
            && (-1.0..=1.0).contains(&self.mem_trend)
            && (0.0..=1.0).contains(&self.throttle_ratio)
    }

    pub fn to_array(&self) -> [f32; FEATURE_COUNT] {
        [
            self.cpu_usage_p50 as f32,
            self.cpu_usage_p95 as f32,
            self.cpu_usage_p99 as f32,
            self.mem_usage_p50 as f32,
            self.mem_usage_p95 as f32,
            self.mem_usage_p99 as f32,
            self.cpu_variance as f32,
            self.mem_trend as f32,
            self.throttle_ratio as f32,
            self.hour_of_day as f32,
            self.day_of_week as f32,
            self.workload_age_days as f32,
        ]
    }
}

/// Ground-truth resource recommendation for one sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelVector {
    pub cpu_request: f64,
    pub cpu_limit: f64,
    pub mem_request: f64,
    pub mem_limit: f64,
    pub confidence: f64,
}

impl LabelVector {
    pub fn to_array(&self) -> [f32; LABEL_COUNT] {
        [
            self.cpu_request as f32,
            self.cpu_limit as f32,
            self.mem_request as f32,
            self.mem_limit as f32,
            self.confidence as f32,
        ]
    }
}

/// Ordered timesteps generated for a single workload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSequence {
    pub archetype: WorkloadArchetype,
    pub start: TimeContext,
    pub anomaly: Option<AnomalyEvent>,
    pub steps: Vec<FeatureVector>,
}

impl FeatureSequence {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Extract one feature across all timesteps
    pub fn series(&self, field: impl Fn(&FeatureVector) -> f64) -> Vec<f64> {
        self.steps.iter().map(field).collect()
    }
}

/// A generated sequence with its derived label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledSample {
    /// Draw index in the unshuffled pool
    pub index: u64,
    pub sequence: FeatureSequence,
    pub label: LabelVector,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(cpu: [f64; 3], mem: [f64; 3]) -> FeatureVector {
        FeatureVector {
            cpu_usage_p50: cpu[0],
            cpu_usage_p95: cpu[1],
            cpu_usage_p99: cpu[2],
            mem_usage_p50: mem[0],
            mem_usage_p95: mem[1],
            mem_usage_p99: mem[2],
            cpu_variance: 0.2,
            mem_trend: 0.0,
            throttle_ratio: 0.0,
            hour_of_day: 0.5,
            day_of_week: 0.5,
            workload_age_days: 0.1,
        }
    }

    #[test]
    fn test_advance_wraps_hour_and_day() {
        let start = TimeContext::new(0.9, 0.99, 1.0);
        let next = start.advance(6, 0.5); // 3 hours later
        assert!((next.hour - (0.9 + 3.0 / 24.0 - 1.0)).abs() < 1e-12);
        assert!((next.day - (0.99 + 3.0 / 168.0 - 1.0)).abs() < 1e-12);
        assert!((next.age_days - 1.125).abs() < 1e-12);
    }

    #[test]
    fn test_advance_zero_is_identity() {
        let start = TimeContext::new(0.3, 0.6, 12.0);
        assert_eq!(start.advance(0, 0.5), start);
    }

    #[test]
    fn test_normalized_age_clipped() {
        assert_eq!(TimeContext::new(0.0, 0.0, 45.0).normalized_age(), 1.0);
        assert!((TimeContext::new(0.0, 0.0, 15.0).normalized_age() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_enforce_bounds_restores_order() {
        let mut f = feature([0.5, 0.4, 1.7], [0.3, 0.2, 0.25]);
        assert!(!f.is_well_formed());
        f.enforce_bounds();
        assert!(f.is_well_formed());
        assert_eq!(f.cpu_usage_p95, 0.5);
        assert_eq!(f.cpu_usage_p99, 1.0);
        assert_eq!(f.mem_usage_p95, 0.3);
        assert_eq!(f.mem_usage_p99, 0.3);
    }

    #[test]
    fn test_feature_array_order() {
        let f = feature([0.1, 0.2, 0.3], [0.4, 0.5, 0.6]);
        let arr = f.to_array();
        assert_eq!(arr.len(), FEATURE_COUNT);
        assert_eq!(arr[0], 0.1);
        assert_eq!(arr[5], 0.6);
        assert_eq!(arr[11], 0.1);
    }
}
