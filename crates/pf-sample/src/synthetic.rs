//! Synthetic ground truth by random walks over the twin network.

use log::{debug, warn};

use pf_core::{LinkId, PathId, SampleRng};
use pf_network::AdjacencyIndex;

use crate::GroundTruthPath;

/// Number of most recent links a walk avoids re-entering.
const RECENT_WINDOW: usize = 3;

/// Attempts per path before giving up on reaching `min_len`.
const MAX_ATTEMPTS: usize = 100;

/// `count` contiguous paths with lengths drawn uniformly in
/// `min_len..=max_len`.
///
/// Each walk starts on a uniformly chosen link and steps to a uniformly
/// chosen successor, avoiding the last three links when another successor
/// exists.  A walk that dead-ends before `min_len` is retried; after
/// repeated failures the last (short) walk is kept.  Ids run from `PathId(0)`.
pub fn random_walk_paths(
    adjacency: &AdjacencyIndex,
    count: usize,
    min_len: usize,
    max_len: usize,
    rng: &mut SampleRng,
) -> Vec<GroundTruthPath> {
    let links = adjacency.sorted_links();
    if links.is_empty() || count == 0 {
        return Vec::new();
    }
    let min_len = min_len.max(1);
    let max_len = max_len.max(min_len);

    let mut out = Vec::with_capacity(count);
    let mut short = 0usize;
    for i in 0..count {
        let mut walk = Vec::new();
        for _ in 0..MAX_ATTEMPTS {
            walk = one_walk(adjacency, &links, min_len, max_len, rng);
            if walk.len() >= min_len {
                break;
            }
        }
        if walk.len() < min_len {
            short += 1;
        }
        out.push(GroundTruthPath::new(PathId(i as u32), walk));
    }

    if short > 0 {
        warn!("{} random walks ended before min_len {}", short, min_len);
    }
    debug!("Generated {} random-walk paths", out.len());
    out
}

fn one_walk(
    adjacency: &AdjacencyIndex,
    links: &[LinkId],
    min_len: usize,
    max_len: usize,
    rng: &mut SampleRng,
) -> Vec<LinkId> {
    let Some(&start) = rng.choose(links) else {
        return Vec::new();
    };
    let target = rng.gen_range(min_len..=max_len);
    let mut walk = vec![start];

    while walk.len() < target {
        let Some(&current) = walk.last() else { break };
        let successors = adjacency.successors(current);
        if successors.is_empty() {
            break;
        }
        let recent = &walk[walk.len().saturating_sub(RECENT_WINDOW)..];
        let fresh: Vec<LinkId> = successors.iter().copied().filter(|l| !recent.contains(l)).collect();
        let pool = if fresh.is_empty() { successors } else { &fresh[..] };
        match rng.choose(pool) {
            Some(&next) => walk.push(next),
            None => break,
        }
    }
    walk
}
