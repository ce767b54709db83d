//! `ConstrainedDecoder`: scorer-driven, adjacency-constrained greedy decoding.
//!
//! # State machine
//!
//! Decoding walks the input left to right.  A masked position is *pending*
//! until the scorer is queried for it; the highest-probability link that
//! follows the previous link and can still reach the next anchor in time
//! *resolves* it.  When no link qualifies the decoder is *stuck*: with
//! fallback enabled the lowest-cost candidate path from the last resolved
//! link to the next anchor is spliced in, otherwise the sample fails.  The
//! finished attempt goes through [`resolve_or_fallback`].
//!
//! # Gap modes
//!
//! | Mode       | A mask is…                         | Anchor positions        |
//! |------------|------------------------------------|-------------------------|
//! | `Exact`    | exactly one link                   | kept at their index     |
//! | `Flexible` | part of a gap of unknown length    | kept in order           |
//!
//! In `Exact` mode a candidate at position `i` must reach the anchor at `j`
//! in exactly `j - i` hops.  In `Flexible` mode the next anchor is taken as
//! soon as it is adjacent, and a candidate is admissible while the shortest
//! completion through it still fits in `max_len`.  A splice in `Exact` mode
//! may shift later anchors; the result is then reported as
//! [`PathSource::Spliced`].
//!
//! # Tie-breaking
//!
//! Candidates are ranked by descending probability, then ascending link id.
//! Links the scorer gives zero probability are never proposed.  Decoding is a
//! pure function of the scorer's answers and the twin network.

use log::debug;

use pf_core::{GapMode, InferenceConfig, LinkId, Token};
use pf_network::TwinNetwork;

use crate::feasibility::{ReachLevels, hop_distances};
use crate::fallback::{FallbackPolicy, InferredPath, PathSource, resolve_or_fallback};
use crate::{DecodeFailure, LinkDistribution, SequenceScorer};

/// Decodes masked sequences into inferred paths.
///
/// Holds only shared references and copied settings; every call keeps its
/// state on its own stack, so one decoder can serve many threads.
pub struct ConstrainedDecoder<'a, S: SequenceScorer + ?Sized> {
    twin: &'a TwinNetwork,
    scorer: &'a S,
    max_len: usize,
    gap_mode: GapMode,
    fallback: bool,
    progress_interval: usize,
}

impl<'a, S: SequenceScorer + ?Sized> ConstrainedDecoder<'a, S> {
    pub fn new(twin: &'a TwinNetwork, scorer: &'a S, config: &InferenceConfig) -> Self {
        Self {
            twin,
            scorer,
            max_len: config.max_len,
            gap_mode: config.gap_mode,
            fallback: config.fallback,
            progress_interval: config.progress_interval,
        }
    }

    pub fn with_gap_mode(mut self, mode: GapMode) -> Self {
        self.gap_mode = mode;
        self
    }

    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.fallback = enabled;
        self
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn twin(&self) -> &TwinNetwork {
        self.twin
    }

    pub fn progress_interval(&self) -> usize {
        self.progress_interval
    }

    pub fn policy(&self) -> FallbackPolicy {
        FallbackPolicy { enabled: self.fallback, max_len: self.max_len }
    }

    /// Decode one input sequence.
    ///
    /// Trailing [`Token::Pad`] positions are ignored.  Observed links are the
    /// anchors.
    pub fn decode(&self, input: &[Token]) -> Result<InferredPath, DecodeFailure> {
        let tokens = trim_padding(input);
        let anchors = anchors_of(tokens);
        if anchors.is_empty() {
            return Err(DecodeFailure::NoAnchors);
        }
        let attempt = self.decode_model(tokens, &anchors);
        let anchor_links: Vec<LinkId> = anchors.iter().map(|&(_, l)| l).collect();
        resolve_or_fallback(attempt, &anchor_links, self.twin, self.policy())
    }

    /// The greedy attempt alone, before global validation.
    pub fn decode_model(&self, tokens: &[Token], anchors: &[(usize, LinkId)]) -> Result<InferredPath, DecodeFailure> {
        let mut spliced = false;
        let links = match self.gap_mode {
            GapMode::Exact => self.decode_exact(tokens, anchors, &mut spliced)?,
            GapMode::Flexible => self.decode_flexible(tokens, anchors, &mut spliced)?,
        };
        let source = if spliced { PathSource::Spliced } else { PathSource::Model };
        Ok(InferredPath { links, source })
    }

    // ── Exact ─────────────────────────────────────────────────────────────────

    fn decode_exact(
        &self,
        tokens: &[Token],
        anchors: &[(usize, LinkId)],
        spliced: &mut bool,
    ) -> Result<Vec<LinkId>, DecodeFailure> {
        let n = tokens.len();
        if n > self.max_len {
            return Err(DecodeFailure::TooLong { len: n, max_len: self.max_len });
        }
        let adjacency = &self.twin.adjacency;

        let mut out: Vec<LinkId> = Vec::with_capacity(n);
        let mut next = 0usize;
        let mut levels: Option<(usize, ReachLevels)> = None;
        let mut i = 0usize;

        while i < n {
            while next < anchors.len() && anchors[next].0 < i {
                next += 1;
            }
            let target = anchors.get(next).copied();

            if let Token::Link(a) = tokens[i] {
                match out.last() {
                    Some(&prev) if !adjacency.is_adjacent(prev, a) => {
                        self.splice(&mut out, a, n - i - 1, i)?;
                        *spliced = true;
                    }
                    _ => out.push(a),
                }
                i += 1;
                continue;
            }

            if let Some((j, a)) = target {
                if levels.as_ref().is_none_or(|&(at, _)| at != j) {
                    levels = Some((j, ReachLevels::new(adjacency, a, j - i)));
                }
            }

            let pool: Vec<LinkId> = match out.last() {
                Some(&prev) => adjacency.successors(prev).to_vec(),
                None => self.twin.network.link_ids().collect(),
            };
            let working = working_sequence(&out, &tokens[i..]);
            let dist = self.scorer.score(&working, out.len());
            let choice = pick(&pool, &dist, |c| match (&levels, target) {
                (Some((_, reach)), Some((j, _))) => reach.reaches(c, j - i),
                _ => true,
            });

            match (choice, target) {
                (Some(c), _) => {
                    out.push(c);
                    i += 1;
                }
                (None, Some((j, a))) => {
                    self.splice(&mut out, a, n - j - 1, i)?;
                    *spliced = true;
                    i = j + 1;
                }
                (None, None) => {
                    return Err(DecodeFailure::Stuck { position: i, after: out.last().copied() });
                }
            }
        }
        Ok(out)
    }

    // ── Flexible ──────────────────────────────────────────────────────────────

    fn decode_flexible(
        &self,
        tokens: &[Token],
        anchors: &[(usize, LinkId)],
        spliced: &mut bool,
    ) -> Result<Vec<LinkId>, DecodeFailure> {
        if anchors.len() > self.max_len {
            return Err(DecodeFailure::TooLong { len: anchors.len(), max_len: self.max_len });
        }
        let adjacency = &self.twin.adjacency;

        // dists[k]: hop distance to anchor k.  hops[k]: links needed to get
        // from anchor k-1 to anchor k (1 when unreachable; the gap fails later).
        let dists: Vec<_> = anchors
            .iter()
            .map(|&(_, a)| hop_distances(adjacency, a, self.max_len))
            .collect();
        let mut tail = vec![0usize; anchors.len()];
        for k in (0..anchors.len().saturating_sub(1)).rev() {
            let hops = dists[k + 1].get(&anchors[k].1).copied().unwrap_or(1).max(1);
            tail[k] = tail[k + 1] + hops;
        }

        let mut out = vec![anchors[0].1];
        for k in 1..anchors.len() {
            let (pos, a) = anchors[k];
            loop {
                let Some(&last) = out.last() else {
                    return Err(DecodeFailure::NoAnchors);
                };
                if adjacency.is_adjacent(last, a) {
                    out.push(a);
                    break;
                }

                let mut working: Vec<Token> = out.iter().map(|&l| Token::Link(l)).collect();
                working.push(Token::Mask);
                working.extend_from_slice(&tokens[pos..]);
                let dist = self.scorer.score(&working, out.len());

                let used = out.len() + 1 + tail[k];
                let choice = pick(adjacency.successors(last), &dist, |c| {
                    dists[k].get(&c).is_some_and(|&d| used + d <= self.max_len)
                });
                match choice {
                    Some(c) => out.push(c),
                    None => {
                        let position = out.len();
                        self.splice(&mut out, a, tail[k], position)?;
                        *spliced = true;
                        break;
                    }
                }
            }
        }
        Ok(out)
    }

    // ── Stuck ─────────────────────────────────────────────────────────────────

    /// Replace the rest of the current gap with the lowest-cost candidate
    /// from the last resolved link to `target` that leaves room for
    /// `remaining` more links.
    fn splice(&self, out: &mut Vec<LinkId>, target: LinkId, remaining: usize, position: usize) -> Result<(), DecodeFailure> {
        let Some(&from) = out.last() else {
            return Err(DecodeFailure::Stuck { position, after: None });
        };
        if !self.fallback {
            return Err(DecodeFailure::Stuck { position, after: Some(from) });
        }

        let budget = self.max_len.saturating_sub(out.len() - 1 + remaining);
        let paths = self.twin.candidates(from, target);
        let Some(best) = paths.iter().find(|p| p.len() <= budget) else {
            return Err(DecodeFailure::NoPath { from, to: target });
        };
        debug!(
            "Stuck at position {} after link {}: spliced {} links to link {}",
            position,
            from,
            best.len() - 1,
            target
        );
        out.extend_from_slice(&best.links[1..]);
        Ok(())
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Highest-probability admissible link of `pool`, ties to the lower id.
fn pick(pool: &[LinkId], dist: &LinkDistribution, admissible: impl Fn(LinkId) -> bool) -> Option<LinkId> {
    let mut best: Option<(LinkId, f64)> = None;
    for &c in pool {
        let p = dist.prob(c);
        if p <= 0.0 || !admissible(c) {
            continue;
        }
        let better = match best {
            None => true,
            Some((b, bp)) => p > bp || (p == bp && c < b),
        };
        if better {
            best = Some((c, p));
        }
    }
    best.map(|(c, _)| c)
}

/// Resolved prefix followed by the unresolved remainder.
fn working_sequence(resolved: &[LinkId], rest: &[Token]) -> Vec<Token> {
    let mut v: Vec<Token> = Vec::with_capacity(resolved.len() + rest.len());
    v.extend(resolved.iter().map(|&l| Token::Link(l)));
    v.extend_from_slice(rest);
    v
}

/// `input` up to its first padding token.
pub fn trim_padding(input: &[Token]) -> &[Token] {
    let end = input.iter().position(|t| *t == Token::Pad).unwrap_or(input.len());
    &input[..end]
}

/// Observed `(position, link)` pairs of `tokens`.
pub fn anchors_of(tokens: &[Token]) -> Vec<(usize, LinkId)> {
    tokens
        .iter()
        .enumerate()
        .filter_map(|(i, t)| t.link().map(|l| (i, l)))
        .collect()
}
