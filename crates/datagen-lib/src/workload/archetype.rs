//! Workload archetype registry
//!
//! Maps the closed set of workload kinds to their numeric behavior profiles.
//! Behavior differs only by data, so the registry is a static table keyed by
//! the archetype variant.

use crate::error::ConfigError;
use crate::models::TimeContext;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::temporal::temporal_multiplier;

/// Workload category a generated sequence belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadArchetype {
    /// Diurnal pattern, bursty
    Web,
    /// Periodic spikes, predictable
    Batch,
    /// Steady with slow memory growth
    Database,
    /// Variable, follows upstream traffic
    Microservice,
    /// Short-lived spikes, no daily rhythm
    Cron,
}

/// Numeric behavior profile attached to an archetype
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorkloadProfile {
    /// Base CPU usage (0-1 normalized)
    pub base_cpu: f64,
    /// Base memory usage (0-1 normalized)
    pub base_memory: f64,
    /// How much CPU varies between timesteps
    pub cpu_variance: f64,
    /// Memory drift per day of workload age
    pub memory_growth: f64,
    /// How far tail percentiles stretch above the median
    pub burstiness: f64,
    /// How strongly time of day affects usage
    pub diurnal_factor: f64,
    /// Weight given to the previous timestep's median
    pub autocorrelation: f64,
}

const WEB_PROFILE: WorkloadProfile = WorkloadProfile {
    base_cpu: 0.3,
    base_memory: 0.4,
    cpu_variance: 0.3,
    memory_growth: 0.0,
    burstiness: 0.4,
    diurnal_factor: 0.5,
    autocorrelation: 0.7,
};

const BATCH_PROFILE: WorkloadProfile = WorkloadProfile {
    base_cpu: 0.1,
    base_memory: 0.2,
    cpu_variance: 0.6,
    memory_growth: 0.0,
    burstiness: 0.7,
    diurnal_factor: 0.1,
    autocorrelation: 0.5,
};

const DATABASE_PROFILE: WorkloadProfile = WorkloadProfile {
    base_cpu: 0.4,
    base_memory: 0.6,
    cpu_variance: 0.15,
    memory_growth: 0.02,
    burstiness: 0.2,
    diurnal_factor: 0.2,
    autocorrelation: 0.85,
};

const MICROSERVICE_PROFILE: WorkloadProfile = WorkloadProfile {
    base_cpu: 0.2,
    base_memory: 0.3,
    cpu_variance: 0.25,
    memory_growth: 0.0,
    burstiness: 0.35,
    diurnal_factor: 0.3,
    autocorrelation: 0.6,
};

const CRON_PROFILE: WorkloadProfile = WorkloadProfile {
    base_cpu: 0.05,
    base_memory: 0.1,
    cpu_variance: 0.8,
    memory_growth: 0.0,
    burstiness: 0.9,
    diurnal_factor: 0.0,
    autocorrelation: 0.3,
};

impl WorkloadArchetype {
    pub const ALL: [WorkloadArchetype; 5] = [
        WorkloadArchetype::Web,
        WorkloadArchetype::Batch,
        WorkloadArchetype::Database,
        WorkloadArchetype::Microservice,
        WorkloadArchetype::Cron,
    ];

    pub fn profile(self) -> &'static WorkloadProfile {
        match self {
            WorkloadArchetype::Web => &WEB_PROFILE,
            WorkloadArchetype::Batch => &BATCH_PROFILE,
            WorkloadArchetype::Database => &DATABASE_PROFILE,
            WorkloadArchetype::Microservice => &MICROSERVICE_PROFILE,
            WorkloadArchetype::Cron => &CRON_PROFILE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WorkloadArchetype::Web => "web",
            WorkloadArchetype::Batch => "batch",
            WorkloadArchetype::Database => "database",
            WorkloadArchetype::Microservice => "microservice",
            WorkloadArchetype::Cron => "cron",
        }
    }
}

impl fmt::Display for WorkloadArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkloadArchetype {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        WorkloadArchetype::ALL
            .into_iter()
            .find(|a| a.as_str() == normalized)
            .ok_or_else(|| ConfigError::UnknownArchetype(s.to_string()))
    }
}

impl WorkloadProfile {
    /// Combined diurnal and weekly multiplier for this profile.
    ///
    /// The weekly swing uses half the diurnal factor.
    pub fn temporal_multiplier(&self, ctx: &TimeContext) -> f64 {
        temporal_multiplier(ctx.hour, ctx.day, self.diurnal_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_within_documented_ranges() {
        for archetype in WorkloadArchetype::ALL {
            let p = archetype.profile();
            assert!((0.0..=1.0).contains(&p.base_cpu), "{archetype}");
            assert!((0.0..=1.0).contains(&p.base_memory), "{archetype}");
            assert!((0.0..=1.0).contains(&p.cpu_variance), "{archetype}");
            assert!(p.memory_growth >= 0.0, "{archetype}");
            assert!((0.0..=1.0).contains(&p.burstiness), "{archetype}");
            assert!((0.0..=1.0).contains(&p.diurnal_factor), "{archetype}");
            assert!((0.0..1.0).contains(&p.autocorrelation), "{archetype}");
        }
    }

    #[test]
    fn test_parse_round_trips_names() {
        for archetype in WorkloadArchetype::ALL {
            assert_eq!(archetype.to_string().parse::<WorkloadArchetype>(), Ok(archetype));
        }
        assert_eq!("  CRON ".parse::<WorkloadArchetype>(), Ok(WorkloadArchetype::Cron));
    }

    #[test]
    fn test_unknown_archetype_rejected() {
        let err = "mainframe".parse::<WorkloadArchetype>().unwrap_err();
        assert_eq!(err, ConfigError::UnknownArchetype("mainframe".to_string()));
    }

    #[test]
    fn test_cron_ignores_time_of_day() {
        let profile = WorkloadArchetype::Cron.profile();
        for hour in [0.0, 0.25, 0.5, 0.75] {
            let ctx = TimeContext::new(hour, 0.9, 1.0);
            assert_eq!(profile.temporal_multiplier(&ctx), 1.0);
        }
    }

    #[test]
    fn test_database_is_smoother_and_less_bursty_than_cron() {
        let db = WorkloadArchetype::Database.profile();
        let cron = WorkloadArchetype::Cron.profile();
        assert!(db.autocorrelation > cron.autocorrelation);
        assert!(db.burstiness < cron.burstiness);
    }
}
