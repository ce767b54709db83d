//! Sparse-observation simulation.
//!
//! An [`Observation`] is the set of positions of a path that a sensor saw.
//! Position 0 and the last position are always part of it.
//!
//! # Ratio draws
//!
//! For a path of length `n` and ratio `r`, the number of *interior* positions
//! kept is `max(0, floor((1 - r) * n) - 2)`, clamped to `n - 2`, chosen
//! uniformly without replacement.  `OdOnly` keeps no interior position.

use log::debug;
use rustc_hash::FxHashSet;

use pf_core::{LinkId, MaskRatio, SampleRng};
use pf_network::RoadNetwork;

// ── Observation ───────────────────────────────────────────────────────────────

/// Observed positions of one path, ascending, always containing both ends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Observation {
    len: usize,
    positions: Vec<usize>,
}

impl Observation {
    /// Every position observed (nothing masked).
    pub fn complete(len: usize) -> Self {
        Self { len, positions: (0..len).collect() }
    }

    /// Only origin and destination.
    pub fn od_only(len: usize) -> Self {
        Self::from_positions(len, [])
    }

    /// Explicit interior positions.  Endpoints are added, out-of-range
    /// positions dropped, duplicates removed.
    pub fn from_positions<I>(len: usize, interior: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut positions: Vec<usize> = interior.into_iter().filter(|&p| p < len).collect();
        if len > 0 {
            positions.push(0);
            positions.push(len - 1);
        }
        positions.sort_unstable();
        positions.dedup();
        Self { len, positions }
    }

    /// Random draw for `ratio`; see the module docs for the count.
    pub fn with_ratio(len: usize, ratio: MaskRatio, rng: &mut SampleRng) -> Self {
        let MaskRatio::Fraction(r) = ratio else {
            return Self::od_only(len);
        };
        let interior = len.saturating_sub(2);
        let keep = (((1.0 - r) * len as f64).floor() as usize).saturating_sub(2).min(interior);
        let picked = rng.sample_indices(interior, keep);
        Self::from_positions(len, picked.into_iter().map(|i| i + 1))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Observed positions, ascending.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn is_observed(&self, position: usize) -> bool {
        self.positions.binary_search(&position).is_ok()
    }

    pub fn observed_count(&self) -> usize {
        self.positions.len()
    }

    pub fn masked_count(&self) -> usize {
        self.len - self.positions.len()
    }
}

// ── AVI detectors ─────────────────────────────────────────────────────────────

/// Links instrumented with an automatic vehicle identification detector.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DetectorSet {
    links: FxHashSet<LinkId>,
}

impl DetectorSet {
    pub fn new<I: IntoIterator<Item = LinkId>>(links: I) -> Self {
        Self { links: links.into_iter().collect() }
    }

    #[inline]
    pub fn contains(&self, link: LinkId) -> bool {
        self.links.contains(&link)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Instrumented links in ascending order.
    pub fn sorted(&self) -> Vec<LinkId> {
        let mut v: Vec<LinkId> = self.links.iter().copied().collect();
        v.sort_unstable();
        v
    }
}

/// Instrument `floor(coverage * link_count)` links chosen uniformly.
pub fn deploy_detectors(network: &RoadNetwork, coverage: f64, rng: &mut SampleRng) -> DetectorSet {
    let ids: Vec<LinkId> = network.link_ids().collect();
    let amount = (ids.len() as f64 * coverage.clamp(0.0, 1.0)).floor() as usize;
    let picked = rng.sample_indices(ids.len(), amount);
    debug!("Deployed {} detectors on {} links", picked.len(), ids.len());
    DetectorSet::new(picked.into_iter().map(|i| ids[i]))
}

/// Positions of `links` seen by a detector, plus both ends.
pub fn observe_detectors(links: &[LinkId], detectors: &DetectorSet) -> Observation {
    let seen = links
        .iter()
        .enumerate()
        .filter(|&(_, &l)| detectors.contains(l))
        .map(|(i, _)| i);
    Observation::from_positions(links.len(), seen)
}
