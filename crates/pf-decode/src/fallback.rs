//! Global validity check and the candidate-path fallback.
//!
//! [`resolve_or_fallback`] is independent of any scorer: it receives the
//! model's attempt (or its failure) and decides what the caller gets.
//!
//! Policy:
//!
//! 1. A model attempt that passes [`validate`] is returned as is, whatever
//!    its cost.
//! 2. Otherwise, with fallback enabled, the attempt is discarded entirely and
//!    replaced by the concatenation of the lowest-cost candidate paths
//!    between consecutive anchors that together fit in `max_len`.
//! 3. Otherwise the failure is returned.

use std::fmt;

use log::debug;

use pf_core::LinkId;
use pf_network::{AdjacencyIndex, CandidatePath, TwinNetwork};

use crate::{DecodeFailure, Violation};

// ── InferredPath ──────────────────────────────────────────────────────────────

/// Where the links of an [`InferredPath`] came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSource {
    /// Every gap filled by the scorer.
    Model,
    /// Scorer-driven, with at least one gap filled from the candidate table.
    ///
    /// In exact gap mode a spliced gap may be longer or shorter than its
    /// masked span, so later anchors can sit at a different index than in
    /// the input.  Their order is always kept.
    Spliced,
    /// The model attempt was discarded for the candidate-table path.
    Fallback,
}

impl fmt::Display for PathSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSource::Model => f.write_str("model"),
            PathSource::Spliced => f.write_str("spliced"),
            PathSource::Fallback => f.write_str("fallback"),
        }
    }
}

/// A complete, contiguous, anchor-preserving link sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InferredPath {
    pub links: Vec<LinkId>,
    pub source: PathSource,
}

impl InferredPath {
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

// ── Validation ────────────────────────────────────────────────────────────────

/// All-or-nothing admissibility check.
///
/// A path is valid when it is non-empty, no longer than `max_len`,
/// contiguous end to end, and contains `anchors` as an ordered subsequence.
pub fn validate(
    links: &[LinkId],
    anchors: &[LinkId],
    adjacency: &AdjacencyIndex,
    max_len: usize,
) -> Result<(), Violation> {
    if links.is_empty() {
        return Err(Violation::Empty);
    }
    if links.len() > max_len {
        return Err(Violation::TooLong { len: links.len(), max_len });
    }
    for (i, w) in links.windows(2).enumerate() {
        if !adjacency.is_adjacent(w[0], w[1]) {
            return Err(Violation::NotContiguous { position: i + 1, from: w[0], to: w[1] });
        }
    }

    let mut rest = links.iter();
    for &a in anchors {
        if !rest.any(|&l| l == a) {
            return Err(Violation::MissingAnchor(a));
        }
    }
    Ok(())
}

// ── Fallback ──────────────────────────────────────────────────────────────────

/// Knobs [`resolve_or_fallback`] consumes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FallbackPolicy {
    pub enabled: bool,
    pub max_len: usize,
}

/// Lowest-cost candidate path through every anchor, in order.
///
/// Consecutive pairs are joined by a candidate path; the shared anchor
/// appears once.  Each pair takes its best-ranked candidate that still
/// leaves room under `max_len` for the shortest candidates of the pairs
/// after it, so a chain is found whenever any combination fits.  Fails if a
/// pair has no candidate or even the shortest combination exceeds
/// `max_len`.
pub fn anchor_chain(twin: &TwinNetwork, anchors: &[LinkId], max_len: usize) -> Result<Vec<LinkId>, DecodeFailure> {
    let Some(&first) = anchors.first() else {
        return Err(DecodeFailure::NoAnchors);
    };

    let mut pairs = Vec::with_capacity(anchors.len().saturating_sub(1));
    for w in anchors.windows(2) {
        let paths = twin.candidates(w[0], w[1]);
        if paths.is_empty() {
            return Err(DecodeFailure::NoPath { from: w[0], to: w[1] });
        }
        pairs.push(paths);
    }

    // reserve[k]: fewest links the pairs after k can add.
    let added = |paths: &[CandidatePath]| paths.iter().map(|p| p.len() - 1).min().unwrap_or(0);
    let mut reserve = vec![0usize; pairs.len()];
    for k in (0..pairs.len().saturating_sub(1)).rev() {
        reserve[k] = reserve[k + 1] + added(&pairs[k + 1][..]);
    }
    let shortest = 1 + pairs.first().map_or(0, |p| added(&p[..])) + reserve.first().copied().unwrap_or(0);
    if shortest > max_len {
        return Err(Violation::TooLong { len: shortest, max_len }.into());
    }

    let mut links = vec![first];
    for (k, paths) in pairs.iter().enumerate() {
        let room = max_len - reserve[k];
        let Some(best) = paths.iter().find(|p| links.len() + p.len() - 1 <= room) else {
            return Err(Violation::TooLong { len: shortest, max_len }.into());
        };
        links.extend_from_slice(&best.links[1..]);
    }
    Ok(links)
}

/// Accept a valid model attempt, otherwise substitute the anchor chain when
/// allowed.  See the module docs for the policy.
pub fn resolve_or_fallback(
    attempt: Result<InferredPath, DecodeFailure>,
    anchors: &[LinkId],
    twin: &TwinNetwork,
    policy: FallbackPolicy,
) -> Result<InferredPath, DecodeFailure> {
    let rejected = match attempt {
        Ok(path) => match validate(&path.links, anchors, &twin.adjacency, policy.max_len) {
            Ok(()) => return Ok(path),
            Err(v) => DecodeFailure::Invalid(v),
        },
        Err(e) => e,
    };

    if !policy.enabled {
        return Err(rejected);
    }

    debug!("Model attempt rejected ({}); using candidate fallback", rejected);
    let links = anchor_chain(twin, anchors, policy.max_len)?;
    Ok(InferredPath { links, source: PathSource::Fallback })
}
