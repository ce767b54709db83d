//! Reachability tables that keep greedy decoding on a path to the next anchor.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

use pf_core::LinkId;
use pf_network::AdjacencyIndex;

/// Links that reach `target` in exactly `h` hops, for `h` in `0..=depth`.
///
/// `levels[0] = {target}` and `levels[h]` is the predecessor set of
/// `levels[h - 1]`.  Walks may revisit links; only the hop count matters.
pub(crate) struct ReachLevels {
    levels: Vec<FxHashSet<LinkId>>,
}

impl ReachLevels {
    pub(crate) fn new(adjacency: &AdjacencyIndex, target: LinkId, depth: usize) -> Self {
        let mut levels: Vec<FxHashSet<LinkId>> = Vec::with_capacity(depth + 1);
        levels.push(std::iter::once(target).collect());
        for h in 1..=depth {
            let next: FxHashSet<LinkId> = levels[h - 1]
                .iter()
                .flat_map(|&l| adjacency.predecessors(l).iter().copied())
                .collect();
            let empty = next.is_empty();
            levels.push(next);
            if empty {
                // Every deeper level is empty too.
                levels.resize_with(depth + 1, FxHashSet::default);
                break;
            }
        }
        Self { levels }
    }

    /// `true` if `link` has a walk of exactly `hops` hops to the target.
    pub(crate) fn reaches(&self, link: LinkId, hops: usize) -> bool {
        self.levels.get(hops).is_some_and(|s| s.contains(&link))
    }
}

/// Minimum hop count from every link that can reach `target` within `limit`
/// hops.  `target` itself maps to 0.
pub(crate) fn hop_distances(adjacency: &AdjacencyIndex, target: LinkId, limit: usize) -> FxHashMap<LinkId, usize> {
    let mut dist: FxHashMap<LinkId, usize> = FxHashMap::default();
    let mut queue: VecDeque<LinkId> = VecDeque::new();
    dist.insert(target, 0);
    queue.push_back(target);

    while let Some(l) = queue.pop_front() {
        let d = dist[&l];
        if d >= limit {
            continue;
        }
        for &p in adjacency.predecessors(l) {
            if !dist.contains_key(&p) {
                dist.insert(p, d + 1);
                queue.push_back(p);
            }
        }
    }
    dist
}
