//! Synthetic training data generation for container resource prediction
//!
//! This crate provides the core functionality for:
//! - Workload archetypes and their temporal usage patterns
//! - Autocorrelated per-timestep feature simulation
//! - Anomaly injection (memory leaks, CPU spikes, noisy neighbours)
//! - Ground-truth label derivation from whole-sequence statistics
//! - Dataset assembly, splitting and persistence
//! - Metrics and structured logging

pub mod anomaly;
pub mod dataset;
pub mod error;
pub mod labels;
pub mod models;
pub mod observability;
pub mod simulator;
pub mod stats;
pub mod workload;

pub use error::{ConfigError, OutputError};
pub use models::*;
pub use observability::{GeneratorMetrics, StructuredLogger};
