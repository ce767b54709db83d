//! Train/test partition by path identity.

use pf_core::{PathId, SampleRng};

use crate::GroundTruthSet;

/// Disjoint train and test path ids.
///
/// Whole paths go to one side; no sub-sequence of a training path ever
/// appears in the test set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<PathId>,
    pub test: Vec<PathId>,
}

impl TrainTestSplit {
    /// Random permutation of the set's ids; the first
    /// `floor(len * train_fraction)` go to training.  Both halves are
    /// returned in ascending id order.
    pub fn new(set: &GroundTruthSet, train_fraction: f64, rng: &mut SampleRng) -> Self {
        let mut ids = set.ids();
        rng.shuffle(&mut ids);

        let train_num = ((ids.len() as f64) * train_fraction.clamp(0.0, 1.0)).floor() as usize;
        let mut test = ids.split_off(train_num.min(ids.len()));
        let mut train = ids;
        train.sort_unstable();
        test.sort_unstable();
        Self { train, test }
    }

    pub fn len(&self) -> usize {
        self.train.len() + self.test.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
