//! Dataset persistence
//!
//! Writes the splits as float32 arrays in a NumPy `.npz` container and the
//! summary as a JSON manifest next to it.
//!
//! Array names:
//! - sequence mode: `{train,val,test}_sequences` (N, seq_len, 12)
//! - flat mode: `{train,val,test}_features` (N, 12)
//! - both: `{train,val,test}_labels` (N, 5) and the scalar `seq_len`

use super::config::GenerationMode;
use super::split::{Dataset, Split};
use super::summary::DatasetSummary;
use crate::error::OutputError;
use crate::models::{LabeledSample, FEATURE_COUNT, LABEL_COUNT};
use ndarray::{arr0, Array2, Array3, ShapeError};
use ndarray_npy::NpzWriter;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes a dataset and its manifest to disk
pub struct DatasetWriter {
    path: PathBuf,
}

impl DatasetWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Manifest location: the output path with a `.json` extension
    pub fn manifest_path(&self) -> PathBuf {
        self.path.with_extension("json")
    }

    /// Write the array container and the manifest.
    ///
    /// Failures are returned as-is; nothing is retried.
    pub fn write(&self, dataset: &Dataset, summary: &DatasetSummary) -> Result<(), OutputError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        self.write_npz(dataset)?;

        let manifest = serde_json::to_string_pretty(summary)?;
        fs::write(self.manifest_path(), manifest)?;
        Ok(())
    }

    fn write_npz(&self, dataset: &Dataset) -> Result<(), OutputError> {
        let mut npz = NpzWriter::new(File::create(&self.path)?);

        for split in Split::ALL {
            let samples = dataset.split(split);
            match dataset.mode {
                GenerationMode::Sequence => {
                    let sequences = sequence_array(samples, dataset.seq_len)?;
                    npz.add_array(format!("{}_sequences", split.key()), &sequences)?;
                }
                GenerationMode::Flat => {
                    let features = feature_array(samples)?;
                    npz.add_array(format!("{}_features", split.key()), &features)?;
                }
            }
            npz.add_array(format!("{}_labels", split.key()), &label_array(samples)?)?;
            debug!(split = split.key(), samples = samples.len(), "Wrote split arrays");
        }

        npz.add_array("seq_len", &arr0(dataset.seq_len as i64))?;
        npz.finish()?;
        Ok(())
    }
}

/// Stack sequences into an (N, seq_len, 12) array
pub fn sequence_array(samples: &[LabeledSample], seq_len: usize) -> Result<Array3<f32>, ShapeError> {
    let values: Vec<f32> = samples
        .iter()
        .flat_map(|s| s.sequence.steps.iter().flat_map(|step| step.to_array()))
        .collect();
    Array3::from_shape_vec((samples.len(), seq_len, FEATURE_COUNT), values)
}

/// First timestep of each sample as an (N, 12) array
pub fn feature_array(samples: &[LabeledSample]) -> Result<Array2<f32>, ShapeError> {
    let values: Vec<f32> = samples
        .iter()
        .flat_map(|s| s.sequence.steps.iter().take(1).flat_map(|step| step.to_array()))
        .collect();
    Array2::from_shape_vec((samples.len(), FEATURE_COUNT), values)
}

/// Labels as an (N, 5) array
pub fn label_array(samples: &[LabeledSample]) -> Result<Array2<f32>, ShapeError> {
    let values: Vec<f32> = samples.iter().flat_map(|s| s.label.to_array()).collect();
    Array2::from_shape_vec((samples.len(), LABEL_COUNT), values)
}
