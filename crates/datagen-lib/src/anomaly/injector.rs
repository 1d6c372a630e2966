//! In-place anomaly injection
//!
//! Perturbs the nominal features of timesteps at or after the event onset.
//! Injector draws come from their own noise source so the nominal trace is
//! the same with or without an anomaly.

use super::{AnomalyEvent, AnomalyKind};
use crate::models::FeatureVector;
use crate::simulator::NoiseSource;

/// Applies one anomaly event to the timesteps of a sequence
pub struct AnomalyInjector<N> {
    event: AnomalyEvent,
    noise: N,
}

impl<N: NoiseSource> AnomalyInjector<N> {
    pub fn new(event: AnomalyEvent, noise: N) -> Self {
        Self { event, noise }
    }

    pub fn event(&self) -> &AnomalyEvent {
        &self.event
    }

    /// Perturb `features` if `index` falls inside the event window.
    ///
    /// Returns whether the timestep was modified. Range and percentile
    /// invariants are re-established before returning.
    pub fn apply(&mut self, index: usize, features: &mut FeatureVector) -> bool {
        if !self.event.affects(index) {
            return false;
        }

        match self.event.kind {
            AnomalyKind::MemoryLeak => {
                features.mem_trend = 0.3 + self.noise.uniform(0.0, 0.2);
                features.mem_usage_p99 = (features.mem_usage_p99 * 1.3).clamp(0.0, 1.0);
            }
            AnomalyKind::CpuSpike => {
                features.cpu_usage_p99 = (features.cpu_usage_p99 * 2.0).clamp(0.0, 1.0);
                features.cpu_variance *= 2.0;
                features.throttle_ratio = (features.throttle_ratio * 2.0).clamp(0.0, 1.0);
            }
            AnomalyKind::Noisy => {
                features.cpu_variance *= 3.0;
            }
        }

        features.enforce_bounds();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::NoiselessSource;

    fn nominal() -> FeatureVector {
        FeatureVector {
            cpu_usage_p50: 0.3,
            cpu_usage_p95: 0.45,
            cpu_usage_p99: 0.6,
            mem_usage_p50: 0.5,
            mem_usage_p95: 0.6,
            mem_usage_p99: 0.7,
            cpu_variance: 0.4,
            mem_trend: 0.01,
            throttle_ratio: 0.05,
            hour_of_day: 0.5,
            day_of_week: 0.2,
            workload_age_days: 0.3,
        }
    }

    fn injector(kind: AnomalyKind) -> AnomalyInjector<NoiselessSource> {
        AnomalyInjector::new(AnomalyEvent::for_sequence(kind, 10), NoiselessSource)
    }

    #[test]
    fn test_front_half_untouched() {
        for kind in AnomalyKind::ALL {
            let mut inj = injector(kind);
            assert_eq!(inj.event().onset, 5);
            let mut f = nominal();
            assert!(!inj.apply(4, &mut f));
            assert_eq!(f, nominal());
        }
    }

    #[test]
    fn test_memory_leak_effect() {
        let mut f = nominal();
        assert!(injector(AnomalyKind::MemoryLeak).apply(5, &mut f));
        assert!((f.mem_trend - 0.3).abs() < 1e-12);
        assert!((f.mem_usage_p99 - 0.91).abs() < 1e-12);
        assert_eq!(f.cpu_usage_p99, 0.6);
    }

    #[test]
    fn test_cpu_spike_effect() {
        let mut f = nominal();
        assert!(injector(AnomalyKind::CpuSpike).apply(9, &mut f));
        assert_eq!(f.cpu_usage_p99, 1.0);
        assert!((f.cpu_variance - 0.8).abs() < 1e-12);
        assert!((f.throttle_ratio - 0.1).abs() < 1e-12);
        assert!(f.is_well_formed());
    }

    #[test]
    fn test_noisy_variance_clipped() {
        let mut f = nominal();
        assert!(injector(AnomalyKind::Noisy).apply(5, &mut f));
        assert_eq!(f.cpu_variance, 1.0);
        assert!(f.is_well_formed());
    }

    #[test]
    fn test_leak_keeps_memory_tail_capped() {
        let mut f = nominal();
        f.mem_usage_p50 = 0.9;
        f.mem_usage_p95 = 0.95;
        f.mem_usage_p99 = 0.97;
        injector(AnomalyKind::MemoryLeak).apply(7, &mut f);
        assert_eq!(f.mem_usage_p99, 1.0);
        assert!(f.is_well_formed());
    }
}
