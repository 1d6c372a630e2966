//! Per-sequence feature generation
//!
//! Per timestep:
//! 1. Temporal base load, blended with the previous median (autocorrelation)
//! 2. Gaussian noise on the medians
//! 3. Tail percentiles stretched from the median, floored by the previous percentile
//! 4. Variance, trend and throttling features
//! 5. Optional anomaly injection on the back half

use super::NoiseSource;
use crate::anomaly::{AnomalyEvent, AnomalyInjector};
use crate::models::{FeatureSequence, FeatureVector, TimeContext};
use crate::workload::{WorkloadArchetype, WorkloadProfile};

/// Default wall-clock duration of one timestep
pub const DEFAULT_STEP_HOURS: f64 = 0.5;

/// Standard deviation of the memory median noise
const MEMORY_NOISE_STD: f64 = 0.05;

/// Standard deviation of the memory trend noise
const MEMORY_TREND_NOISE_STD: f64 = 0.02;

/// CPU p99 above which throttling starts
const THROTTLE_THRESHOLD: f64 = 0.8;

/// Medians carried from the previous timestep
#[derive(Debug, Clone, Copy, Default)]
struct SequenceState {
    previous: Option<(f64, f64)>,
}

impl SequenceState {
    fn blend(&self, autocorrelation: f64, cpu_base: f64, mem_base: f64) -> (f64, f64) {
        match self.previous {
            Some((cpu_prev, mem_prev)) => (
                autocorrelation * cpu_prev + (1.0 - autocorrelation) * cpu_base,
                autocorrelation * mem_prev + (1.0 - autocorrelation) * mem_base,
            ),
            None => (cpu_base, mem_base),
        }
    }
}

/// Generates feature sequences for one workload archetype
#[derive(Debug, Clone)]
pub struct SequenceSimulator {
    archetype: WorkloadArchetype,
    profile: &'static WorkloadProfile,
    step_hours: f64,
    autocorrelated: bool,
}

impl SequenceSimulator {
    pub fn new(archetype: WorkloadArchetype) -> Self {
        Self {
            archetype,
            profile: archetype.profile(),
            step_hours: DEFAULT_STEP_HOURS,
            autocorrelated: true,
        }
    }

    /// Set the wall-clock duration of one timestep
    pub fn with_step_hours(mut self, step_hours: f64) -> Self {
        self.step_hours = step_hours;
        self
    }

    /// Disable the carry of previous medians (single-point generation)
    pub fn without_autocorrelation(mut self) -> Self {
        self.autocorrelated = false;
        self
    }

    pub fn archetype(&self) -> WorkloadArchetype {
        self.archetype
    }

    /// Generate `seq_len` timesteps starting at `start`.
    ///
    /// `noise` drives the nominal trace; `anomaly_noise` is only read by the
    /// injector, and only for timesteps the event affects.
    pub fn generate<N, A>(
        &self,
        start: TimeContext,
        seq_len: usize,
        anomaly: Option<AnomalyEvent>,
        noise: &mut N,
        anomaly_noise: A,
    ) -> FeatureSequence
    where
        N: NoiseSource,
        A: NoiseSource,
    {
        let mut state = SequenceState::default();
        let mut injector = anomaly.map(|event| AnomalyInjector::new(event, anomaly_noise));
        let mut steps = Vec::with_capacity(seq_len);

        for index in 0..seq_len {
            let ctx = start.advance(index, self.step_hours);
            let mut features = self.step(&ctx, &mut state, noise);
            if let Some(injector) = injector.as_mut() {
                injector.apply(index, &mut features);
            }
            steps.push(features);
        }

        FeatureSequence {
            archetype: self.archetype,
            start,
            anomaly,
            steps,
        }
    }

    /// Nominal features for one timestep; updates the carried medians
    fn step<N: NoiseSource>(
        &self,
        ctx: &TimeContext,
        state: &mut SequenceState,
        noise: &mut N,
    ) -> FeatureVector {
        let p = self.profile;

        let cpu_base = p.base_cpu * p.temporal_multiplier(ctx);
        let mem_base = p.base_memory + p.memory_growth * ctx.age_days;
        let (cpu_base, mem_base) = state.blend(p.autocorrelation, cpu_base, mem_base);

        let cpu_noise = noise.gaussian(p.cpu_variance * 0.3);
        let mem_noise = noise.gaussian(MEMORY_NOISE_STD);

        let cpu_p50 = (cpu_base + cpu_noise).clamp(0.01, 0.95);
        let cpu_p95 = (cpu_p50 * (1.0 + p.burstiness * 0.5 + noise.uniform(0.0, 0.2)))
            .clamp(cpu_p50, 0.98);
        let cpu_p99 = (cpu_p95 * (1.0 + p.burstiness * 0.3 + noise.uniform(0.0, 0.1)))
            .clamp(cpu_p95, 1.0);

        let mem_p50 = (mem_base + mem_noise).clamp(0.01, 0.95);
        let mem_p95 = (mem_p50 * (1.0 + 0.1 + noise.uniform(0.0, 0.1))).clamp(mem_p50, 0.98);
        let mem_p99 = (mem_p95 * (1.0 + 0.05 + noise.uniform(0.0, 0.05))).clamp(mem_p95, 1.0);

        let cpu_variance = p.cpu_variance * (0.5 + noise.uniform(0.0, 0.5));
        let mem_trend = p.memory_growth + noise.gaussian(MEMORY_TREND_NOISE_STD);
        let throttle_ratio = ((cpu_p99 - THROTTLE_THRESHOLD).max(0.0) * 2.0
            + noise.uniform(0.0, 0.1))
        .clamp(0.0, 1.0);

        if self.autocorrelated {
            state.previous = Some((cpu_p50, mem_p50));
        }

        let mut features = FeatureVector {
            cpu_usage_p50: cpu_p50,
            cpu_usage_p95: cpu_p95,
            cpu_usage_p99: cpu_p99,
            mem_usage_p50: mem_p50,
            mem_usage_p95: mem_p95,
            mem_usage_p99: mem_p99,
            cpu_variance,
            mem_trend,
            throttle_ratio,
            hour_of_day: ctx.hour,
            day_of_week: ctx.day,
            workload_age_days: ctx.normalized_age(),
        };
        features.enforce_bounds();
        features
    }
}
