//! Autocorrelated sequence simulation
//!
//! Steps a workload profile through time, producing one feature vector per
//! timestep and carrying the previous medians forward to induce serial
//! correlation.

mod noise;
mod sequence;

pub use noise::{derive_seed, stream_rng, NoiseSource, NoiselessSource, Stream};
pub use sequence::{SequenceSimulator, DEFAULT_STEP_HOURS};
