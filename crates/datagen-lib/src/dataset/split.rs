//! Shuffling and train/validation/test partitioning

use super::config::GenerationMode;
use crate::models::LabeledSample;
use crate::simulator::{stream_rng, Stream};
use rand::seq::SliceRandom;

/// One partition of the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Validation,
    Test,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Train, Split::Validation, Split::Test];

    /// Array name prefix in the output container
    pub fn key(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Validation => "val",
            Split::Test => "test",
        }
    }
}

/// Three disjoint partitions of one shuffled sample pool
#[derive(Debug, Clone)]
pub struct Dataset {
    pub mode: GenerationMode,
    /// Timesteps per sample
    pub seq_len: usize,
    pub train: Vec<LabeledSample>,
    pub validation: Vec<LabeledSample>,
    pub test: Vec<LabeledSample>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.train.len() + self.validation.len() + self.test.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn split(&self, split: Split) -> &[LabeledSample] {
        match split {
            Split::Train => &self.train,
            Split::Validation => &self.validation,
            Split::Test => &self.test,
        }
    }

    /// All samples, train first
    pub fn iter(&self) -> impl Iterator<Item = &LabeledSample> {
        self.train
            .iter()
            .chain(self.validation.iter())
            .chain(self.test.iter())
    }
}

/// End indices of the train (80%) and validation (next 10%) slices
pub fn split_bounds(n: usize) -> (usize, usize) {
    (n * 8 / 10, n * 9 / 10)
}

/// Apply one seeded permutation to the pool and slice it 80/10/10
pub fn shuffle_and_split(
    mut pool: Vec<LabeledSample>,
    seed: u64,
    seq_len: usize,
    mode: GenerationMode,
) -> Dataset {
    let mut rng = stream_rng(seed, Stream::Shuffle, 0);
    pool.shuffle(&mut rng);

    let (train_end, val_end) = split_bounds(pool.len());
    let test = pool.split_off(val_end);
    let validation = pool.split_off(train_end);

    Dataset {
        mode,
        seq_len,
        train: pool,
        validation,
        test,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_bounds() {
        assert_eq!(split_bounds(100), (80, 90));
        assert_eq!(split_bounds(1), (0, 0));
        assert_eq!(split_bounds(15), (12, 13));
        assert_eq!(split_bounds(0), (0, 0));
    }

    #[test]
    fn test_bounds_cover_pool() {
        for n in 0..200 {
            let (train_end, val_end) = split_bounds(n);
            assert!(train_end <= val_end && val_end <= n);
        }
    }

    #[test]
    fn test_split_keys() {
        let keys: Vec<_> = Split::ALL.iter().map(|s| s.key()).collect();
        assert_eq!(keys, ["train", "val", "test"]);
    }
}
