//! The `SequenceScorer` trait and reference implementations.
//!
//! The scorer is the learned component of the system: given a partially
//! observed sequence it proposes a distribution over links for one position.
//! The decoder never looks inside it.

use rustc_hash::FxHashMap;

use pf_core::{LinkId, Token};
use pf_network::AdjacencyIndex;

// ── LinkDistribution ──────────────────────────────────────────────────────────

/// Probability mass over the link vocabulary for one position.
///
/// Explicit entries are stored sorted by link id.  Links without an entry
/// have probability `floor` (zero unless the distribution was built with
/// [`uniform`](Self::uniform) or [`with_floor`](Self::with_floor)).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinkDistribution {
    entries: Vec<(LinkId, f64)>,
    floor: f64,
}

impl LinkDistribution {
    /// Build from `(link, probability)` pairs.  Non-finite and non-positive
    /// values are dropped; repeated links have their mass summed.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (LinkId, f64)>,
    {
        let mut entries: Vec<(LinkId, f64)> = pairs
            .into_iter()
            .filter(|&(_, p)| p.is_finite() && p > 0.0)
            .collect();
        entries.sort_unstable_by_key(|&(l, _)| l);

        let mut merged: Vec<(LinkId, f64)> = Vec::with_capacity(entries.len());
        for (l, p) in entries {
            match merged.last_mut() {
                Some(last) if last.0 == l => last.1 += p,
                _ => merged.push((l, p)),
            }
        }
        Self { entries: merged, floor: 0.0 }
    }

    /// All mass on `link`.
    pub fn point(link: LinkId) -> Self {
        Self { entries: vec![(link, 1.0)], floor: 0.0 }
    }

    /// Equal probability `p` for every link.
    pub fn uniform(p: f64) -> Self {
        Self { entries: Vec::new(), floor: sanitize(p) }
    }

    pub fn with_floor(mut self, floor: f64) -> Self {
        self.floor = sanitize(floor);
        self
    }

    pub fn prob(&self, link: LinkId) -> f64 {
        match self.entries.binary_search_by_key(&link, |&(l, _)| l) {
            Ok(i) => self.entries[i].1,
            Err(_) => self.floor,
        }
    }

    /// Explicit entries by descending probability, ties by ascending id.
    pub fn ranked(&self) -> Vec<(LinkId, f64)> {
        let mut v = self.entries.clone();
        v.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        v
    }

    /// Most probable explicit link.
    pub fn argmax(&self) -> Option<LinkId> {
        self.ranked().first().map(|&(l, _)| l)
    }

    /// `true` when no link has positive probability.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.floor <= 0.0
    }
}

fn sanitize(p: f64) -> f64 {
    if p.is_finite() && p > 0.0 { p } else { 0.0 }
}

// ── SequenceScorer ────────────────────────────────────────────────────────────

/// Pluggable next-link model.
///
/// `input` is a working sequence: resolved links so far, then the still
/// unresolved remainder with [`Token::Mask`] at every hidden position.
/// `position` indexes a masked entry of `input`.
///
/// # Contract
///
/// For a fixed `(input, position)` the result must be the same on every
/// call: the decoder may query a position more than once and relies on
/// the answer not drifting.  Implementations are `Send + Sync` so a batch
/// can be decoded in parallel.
///
/// Any `Fn(&[Token], usize) -> LinkDistribution` closure is a scorer.
pub trait SequenceScorer: Send + Sync {
    fn score(&self, input: &[Token], position: usize) -> LinkDistribution;
}

impl<F> SequenceScorer for F
where
    F: Fn(&[Token], usize) -> LinkDistribution + Send + Sync,
{
    fn score(&self, input: &[Token], position: usize) -> LinkDistribution {
        self(input, position)
    }
}

// ── UniformScorer ─────────────────────────────────────────────────────────────

/// Same probability for every link.  With it the decoder picks the
/// lowest-id admissible link at every step.
pub struct UniformScorer {
    p: f64,
}

impl UniformScorer {
    pub fn new(vocabulary: usize) -> Self {
        Self { p: 1.0 / vocabulary.max(1) as f64 }
    }
}

impl SequenceScorer for UniformScorer {
    fn score(&self, _input: &[Token], _position: usize) -> LinkDistribution {
        LinkDistribution::uniform(self.p)
    }
}

// ── TransitionScorer ──────────────────────────────────────────────────────────

/// First-order next-link frequencies with add-one smoothing.
///
/// `P(b | a) = (count(a, b) + 1) / (Σ_s count(a, s) + |succ(a)|)` over the
/// successors of `a`.  A position with no resolved link before it is scored
/// with origin frequencies, smoothed over the whole vocabulary.
pub struct TransitionScorer {
    next: FxHashMap<LinkId, LinkDistribution>,
    start: LinkDistribution,
}

impl TransitionScorer {
    pub fn fit<'p, I>(adjacency: &AdjacencyIndex, paths: I) -> Self
    where
        I: IntoIterator<Item = &'p [LinkId]>,
    {
        let mut pair_counts: FxHashMap<(LinkId, LinkId), u64> = FxHashMap::default();
        let mut origin_counts: FxHashMap<LinkId, u64> = FxHashMap::default();
        let mut origins = 0u64;

        for path in paths {
            if let Some(&o) = path.first() {
                *origin_counts.entry(o).or_default() += 1;
                origins += 1;
            }
            for w in path.windows(2) {
                *pair_counts.entry((w[0], w[1])).or_default() += 1;
            }
        }

        let links = adjacency.sorted_links();
        let mut next = FxHashMap::with_capacity_and_hasher(links.len(), Default::default());
        for &a in &links {
            let succ = adjacency.successors(a);
            if succ.is_empty() {
                continue;
            }
            let counts: Vec<u64> = succ
                .iter()
                .map(|&b| pair_counts.get(&(a, b)).copied().unwrap_or(0))
                .collect();
            let denom = (counts.iter().sum::<u64>() + succ.len() as u64) as f64;
            let dist = LinkDistribution::from_pairs(
                succ.iter().zip(&counts).map(|(&b, &c)| (b, (c + 1) as f64 / denom)),
            );
            next.insert(a, dist);
        }

        let vocab = links.len().max(1) as f64;
        let denom = origins as f64 + vocab;
        let start = LinkDistribution::from_pairs(
            origin_counts.iter().map(|(&l, &c)| (l, (c + 1) as f64 / denom)),
        )
        .with_floor(1.0 / denom);

        Self { next, start }
    }
}

impl SequenceScorer for TransitionScorer {
    fn score(&self, input: &[Token], position: usize) -> LinkDistribution {
        let prev = position
            .checked_sub(1)
            .and_then(|p| input.get(p))
            .and_then(|t| t.link());
        match prev {
            Some(l) => self.next.get(&l).cloned().unwrap_or_default(),
            None => self.start.clone(),
        }
    }
}
