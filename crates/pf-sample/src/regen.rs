//! Iterative regeneration of the training set.
//!
//! Each round draws a fresh set of masks from its own child generator, so no
//! round replays another round's draws.  The schedule is fully determined by
//! the parent RNG state at construction.

use log::info;

use pf_core::{PathId, RegenerationConfig, SampleRng};

use crate::{GroundTruthSet, SampleGenerator, TrainingSample};

/// One draw of the training set.
#[derive(Clone, Debug)]
pub struct Round {
    /// 0-based round index.
    pub index: u32,
    /// Epoch at which training on this draw begins.
    pub start_epoch: u64,
    /// Epochs to train on this draw.  `None` when regeneration is disabled
    /// and the single draw is used for the whole run.
    pub epochs: Option<u32>,
    pub samples: Vec<TrainingSample>,
}

/// Iterator over regeneration rounds.
///
/// ```rust,ignore
/// for round in Regenerator::new(&generator, &set, split.train.clone(), config.regeneration, &mut rng) {
///     trainer.fit(&round.samples, round.epochs);
/// }
/// ```
pub struct Regenerator<'a> {
    generator: &'a SampleGenerator,
    set: &'a GroundTruthSet,
    ids: Vec<PathId>,
    schedule: Option<RegenerationConfig>,
    rng: SampleRng,
    next: u32,
}

impl<'a> Regenerator<'a> {
    /// `rng` is advanced once to seed the schedule.
    pub fn new(
        generator: &'a SampleGenerator,
        set: &'a GroundTruthSet,
        ids: Vec<PathId>,
        schedule: Option<RegenerationConfig>,
        rng: &mut SampleRng,
    ) -> Self {
        Self { generator, set, ids, schedule, rng: rng.child(0), next: 0 }
    }

    /// Total number of rounds this iterator yields.
    pub fn rounds(&self) -> u32 {
        self.schedule.map_or(1, |s| s.iterations)
    }
}

impl Iterator for Regenerator<'_> {
    type Item = Round;

    fn next(&mut self) -> Option<Round> {
        if self.next >= self.rounds() {
            return None;
        }
        let index = self.next;
        self.next += 1;

        let mut round_rng = self.rng.child(index as u64 + 1);
        let samples = self.generator.generate(self.set, &self.ids, &mut round_rng);
        let (start_epoch, epochs) = match self.schedule {
            Some(s) => (index as u64 * s.interval_epochs as u64, Some(s.interval_epochs)),
            None => (0, None),
        };
        info!(
            "Regeneration round {}/{}: {} samples from epoch {}",
            index + 1,
            self.rounds(),
            samples.len(),
            start_epoch
        );
        Some(Round { index, start_epoch, epochs, samples })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.rounds().saturating_sub(self.next) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Regenerator<'_> {}
