//! `SampleGenerator`: turns ground-truth paths into training and test samples.

use std::time::Instant;

use log::{debug, info, warn};

use pf_core::{InferenceConfig, MaskRatio, PathId, RatioCycle, SampleRng};

use crate::observe::{DetectorSet, Observation, observe_detectors};
use crate::{GroundTruthPath, GroundTruthSet, SampleOrigin, SampleResult, TrainTestSplit, TrainingSample};

/// Output of [`SampleGenerator::make_samples`].
#[derive(Clone, Debug)]
pub struct SampleSets {
    pub split: TrainTestSplit,
    pub train: Vec<TrainingSample>,
    pub test: Vec<TrainingSample>,
}

/// Draws masked samples from a [`GroundTruthSet`].
///
/// The ratio set is fixed at construction.  Paths longer than `max_len` are
/// skipped (with a warning) since neither the model nor the decoder can
/// represent them.
#[derive(Clone, Debug)]
pub struct SampleGenerator {
    max_len: usize,
    ratios: Vec<MaskRatio>,
    cycle: RatioCycle,
    train_fraction: f64,
}

impl SampleGenerator {
    pub fn new(config: &InferenceConfig) -> SampleResult<Self> {
        config.validate()?;
        Ok(Self {
            max_len: config.max_len,
            ratios: config.mask_ratios.clone(),
            cycle: config.ratio_cycle,
            train_fraction: config.train_fraction,
        })
    }

    pub fn ratios(&self) -> &[MaskRatio] {
        &self.ratios
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn split(&self, set: &GroundTruthSet, rng: &mut SampleRng) -> TrainTestSplit {
        TrainTestSplit::new(set, self.train_fraction, rng)
    }

    /// Split `set`, then draw ratio-masked samples for both halves.
    pub fn make_samples(&self, set: &GroundTruthSet, rng: &mut SampleRng) -> SampleSets {
        let split = self.split(set, rng);
        info!("Split {} paths: {} train, {} test", set.len(), split.train.len(), split.test.len());
        let train = self.generate(set, &split.train, rng);
        let test = self.generate(set, &split.test, rng);
        SampleSets { split, train, test }
    }

    /// Ratio-masked samples for `ids`.
    ///
    /// With [`RatioCycle::Full`] every path yields one sample per ratio,
    /// grouped ratio by ratio.  With [`RatioCycle::PerSample`] every path
    /// yields one sample with a uniformly drawn ratio.
    pub fn generate(&self, set: &GroundTruthSet, ids: &[PathId], rng: &mut SampleRng) -> Vec<TrainingSample> {
        let start = Instant::now();
        let paths = self.eligible(set, ids);
        let mut out = Vec::with_capacity(match self.cycle {
            RatioCycle::Full => paths.len() * self.ratios.len(),
            RatioCycle::PerSample => paths.len(),
        });

        match self.cycle {
            RatioCycle::Full => {
                for &ratio in &self.ratios {
                    for gt in &paths {
                        out.push(Self::masked(gt, ratio, rng));
                    }
                    debug!("ratio {}: {} samples", ratio, paths.len());
                }
            }
            RatioCycle::PerSample => {
                for gt in &paths {
                    let ratio = rng.choose(&self.ratios).copied().unwrap_or(MaskRatio::OdOnly);
                    out.push(Self::masked(gt, ratio, rng));
                }
            }
        }

        debug!("Generated {} samples in {:?}", out.len(), start.elapsed());
        out
    }

    /// Detector-observed samples for `ids`, as used for AVI evaluation.
    pub fn observe_with(&self, set: &GroundTruthSet, ids: &[PathId], detectors: &DetectorSet) -> Vec<TrainingSample> {
        self.eligible(set, ids)
            .into_iter()
            .map(|gt| {
                let obs = observe_detectors(&gt.links, detectors);
                TrainingSample::new(gt, &obs, SampleOrigin::Detectors)
            })
            .collect()
    }

    /// Unmasked samples for `ids`.
    pub fn complete(&self, set: &GroundTruthSet, ids: &[PathId]) -> Vec<TrainingSample> {
        self.eligible(set, ids)
            .into_iter()
            .map(|gt| TrainingSample::new(gt, &Observation::complete(gt.len()), SampleOrigin::Complete))
            .collect()
    }

    fn masked(gt: &GroundTruthPath, ratio: MaskRatio, rng: &mut SampleRng) -> TrainingSample {
        let obs = Observation::with_ratio(gt.len(), ratio, rng);
        TrainingSample::new(gt, &obs, SampleOrigin::Ratio(ratio))
    }

    fn eligible<'a>(&self, set: &'a GroundTruthSet, ids: &[PathId]) -> Vec<&'a GroundTruthPath> {
        let mut too_long = 0usize;
        let mut missing = 0usize;
        let mut out = Vec::with_capacity(ids.len());
        for &id in ids {
            match set.get(id) {
                Some(gt) if gt.len() <= self.max_len => out.push(gt),
                Some(_) => too_long += 1,
                None => missing += 1,
            }
        }
        if too_long > 0 {
            warn!("Skipped {} paths longer than max_len {}", too_long, self.max_len);
        }
        if missing > 0 {
            warn!("Skipped {} unknown path ids", missing);
        }
        out
    }
}
