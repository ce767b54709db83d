//! Cloze training samples and their fixed-length encoding.

use std::fmt;

use pf_core::{LinkId, MaskRatio, PathId, Token};

use crate::{GroundTruthPath, Observation};

/// How a sample's observation was drawn.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SampleOrigin {
    Ratio(MaskRatio),
    /// AVI detector coverage.
    Detectors,
    /// Nothing masked.
    Complete,
}

impl fmt::Display for SampleOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleOrigin::Ratio(r) => write!(f, "ratio={r}"),
            SampleOrigin::Detectors => f.write_str("detectors"),
            SampleOrigin::Complete => f.write_str("complete"),
        }
    }
}

/// One masked view of a ground-truth path.
///
/// `input` and `target` always have the same length: each hidden position is
/// a single [`Token::Mask`].  The first and last positions are never masked.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainingSample {
    pub path: PathId,
    pub input: Vec<Token>,
    pub target: Vec<LinkId>,
    pub origin: SampleOrigin,
}

impl TrainingSample {
    /// Mask every position of `gt` not in `observation`.
    ///
    /// `observation` must have been drawn for a path of `gt.len()` links.
    pub fn new(gt: &GroundTruthPath, observation: &Observation, origin: SampleOrigin) -> Self {
        debug_assert_eq!(gt.len(), observation.len());
        let input = gt
            .links
            .iter()
            .enumerate()
            .map(|(i, &l)| if observation.is_observed(i) { Token::Link(l) } else { Token::Mask })
            .collect();
        Self { path: gt.id, input, target: gt.links.clone(), origin }
    }

    pub fn len(&self) -> usize {
        self.input.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Observed (position, link) pairs in order.
    pub fn anchors(&self) -> Vec<(usize, LinkId)> {
        self.input
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.link().map(|l| (i, l)))
            .collect()
    }

    /// The discontinuous link sequence a sensor would report.
    pub fn observed_links(&self) -> Vec<LinkId> {
        self.input.iter().filter_map(|t| t.link()).collect()
    }

    pub fn masked_positions(&self) -> Vec<usize> {
        self.input
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_mask())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn mask_count(&self) -> usize {
        self.input.iter().filter(|t| t.is_mask()).count()
    }

    /// Raw model input: link ids, `-1` for masks, padded with `0` to
    /// `max_len`.  Never truncated.
    pub fn encode(&self, max_len: usize) -> Vec<i64> {
        pad(self.input.iter().map(|t| t.raw()), max_len)
    }

    /// Raw model target, padded like [`encode`](Self::encode).
    pub fn encode_target(&self, max_len: usize) -> Vec<i64> {
        pad(self.target.iter().map(|&l| Token::Link(l).raw()), max_len)
    }
}

fn pad(values: impl Iterator<Item = i64>, max_len: usize) -> Vec<i64> {
    let mut out: Vec<i64> = values.collect();
    if out.len() < max_len {
        out.resize(max_len, Token::PAD_RAW);
    }
    out
}
