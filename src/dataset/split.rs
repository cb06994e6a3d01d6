//! Stratified three-way split of the dataset.
//!
//! Partitions are disjoint, their union is the full index range, and the
//! label proportion inside each partition matches the overall proportion
//! within one record of rounding. A fixed seed makes the split
//! reproducible.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

/// Seed used by the training pipeline (mirrors the reference run).
pub const SPLIT_SEED: u64 = 1;

/// Target fractions: train 60%, validation 20%, test 20%.
pub const TEST_FRACTION: f64 = 0.2;
pub const VALIDATION_FRACTION: f64 = 0.2;

/// Row indices of the three partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
    pub test: Vec<usize>,
}

impl Split {
    pub fn total(&self) -> usize {
        self.train.len() + self.validation.len() + self.test.len()
    }
}

/// Produce a label-stratified train/validation/test split.
///
/// Per label class: indices are shuffled with an RNG seeded from `seed`,
/// then the first 20% (rounded) go to test, the next 20% to validation and
/// the remainder to train. Allocating per class is what preserves the
/// label proportions.
pub fn stratified_three_way(labels: &[i32], seed: u64) -> Split {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut split = Split {
        train: Vec::new(),
        validation: Vec::new(),
        test: Vec::new(),
    };

    // Class order is fixed so the RNG stream is consumed deterministically.
    for class in [0, 1] {
        let mut members: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, &y)| y == class)
            .map(|(i, _)| i)
            .collect();
        members.shuffle(&mut rng);

        let n = members.len();
        let mut n_test = (n as f64 * TEST_FRACTION).round() as usize;
        let mut n_val = (n as f64 * VALIDATION_FRACTION).round() as usize;
        // Tiny classes: never let the holdouts swallow the class entirely.
        while n_test + n_val >= n && n_test + n_val > 0 {
            if n_val >= n_test {
                n_val -= 1;
            } else {
                n_test -= 1;
            }
        }

        split.test.extend(&members[..n_test]);
        split.validation.extend(&members[n_test..n_test + n_val]);
        split.train.extend(&members[n_test + n_val..]);
    }

    // Per-class allocation leaves each partition grouped by label; shuffle
    // so downstream k-fold slices see mixed classes.
    split.train.shuffle(&mut rng);
    split.validation.shuffle(&mut rng);
    split.test.shuffle(&mut rng);

    debug!(
        train = split.train.len(),
        validation = split.validation.len(),
        test = split.test.len(),
        seed,
        "Stratified split"
    );
    split
}
