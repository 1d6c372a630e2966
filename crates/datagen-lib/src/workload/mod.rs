//! Workload archetypes and their temporal usage patterns
//!
//! Each archetype carries an immutable behavior profile; the temporal model
//! turns (hour, day, profile) into a multiplicative load scalar.

mod archetype;
mod temporal;

pub use archetype::{WorkloadArchetype, WorkloadProfile};
pub use temporal::{diurnal, temporal_multiplier, weekly, PEAK_HOUR, WEEKEND_START};
