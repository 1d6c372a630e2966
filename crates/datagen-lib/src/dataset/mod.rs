//! Dataset assembly, splitting and persistence

mod assembler;
mod config;
mod split;
mod summary;
mod writer;

pub use assembler::{DatasetAssembler, SampleSpec, MAX_AGE_DAYS, MIN_AGE_DAYS};
pub use config::{
    GenerationMode, GeneratorConfig, DEFAULT_ANOMALY_RATIO, DEFAULT_NUM_SAMPLES, DEFAULT_SEED,
    DEFAULT_SEQ_LEN, MAX_STEP_HOURS,
};
pub use split::{shuffle_and_split, split_bounds, Dataset, Split};
pub use summary::{DatasetSummary, NamedColumn};
pub use writer::{feature_array, label_array, sequence_array, DatasetWriter};
