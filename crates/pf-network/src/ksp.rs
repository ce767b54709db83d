//! K-shortest loopless paths over the twin network (Yen's algorithm).
//!
//! # Cost model
//!
//! The cost of a link sequence is the sum of the virtual lengths of *every*
//! link in it, source and target included.  Costs are accumulated in `f64`
//! in path order, so equal sequences always carry bit-identical costs.
//!
//! # Ordering
//!
//! Paths are ranked by total cost, then by link count, then by the
//! lexicographic order of their link ids.  Yen yields paths in cost order
//! only, so enumeration continues past the k-th path until the next
//! candidate costs strictly more.  Every path tied with the k-th is then
//! known and the final ranking picks among all of them; the answer for `k`
//! is always a prefix of the answer for `k + 1`.

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeSet, BinaryHeap};

use rustc_hash::{FxHashMap, FxHashSet};

use pf_core::LinkId;

use crate::network::RoadNetwork;
use crate::twin::AdjacencyIndex;

// ── CandidatePath ─────────────────────────────────────────────────────────────

/// One ranked path between two links, endpoints included.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidatePath {
    pub links: Vec<LinkId>,
    /// Sum of virtual lengths over `links`.
    pub cost: f64,
}

impl CandidatePath {
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Links strictly between the two endpoints.
    pub fn interior(&self) -> &[LinkId] {
        match self.links.len() {
            0..=2 => &[],
            n => &self.links[1..n - 1],
        }
    }

    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then(self.links.len().cmp(&other.links.len()))
            .then_with(|| self.links.cmp(&other.links))
    }
}

/// `CandidatePath` ordered by rank, for use in a `BTreeSet`.
#[derive(Clone, Debug)]
struct Ranked(CandidatePath);

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.0.rank_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.rank_cmp(&other.0)
    }
}

/// Totally ordered `f64` for the Dijkstra heap.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Cost(f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Up to `k` loopless paths `source → target` in rank order.
///
/// Returns an empty `Vec` when either link is unknown or `target` is
/// unreachable; this is a normal outcome, not an error.  When fewer than `k`
/// distinct paths exist, all of them are returned.  `source == target`
/// yields the single one-link path.
pub fn k_shortest_paths(
    network: &RoadNetwork,
    adjacency: &AdjacencyIndex,
    source: LinkId,
    target: LinkId,
    k: usize,
) -> Vec<CandidatePath> {
    if k == 0 || !network.contains(source) || !network.contains(target) {
        return Vec::new();
    }

    let no_links = FxHashSet::default();
    let no_edges = FxHashSet::default();
    let Some(first) = dijkstra(network, adjacency, source, target, &no_links, &no_edges) else {
        return Vec::new();
    };

    let mut accepted: Vec<CandidatePath> = vec![first];
    let mut pending: BTreeSet<Ranked> = BTreeSet::new();

    loop {
        let last = &accepted[accepted.len() - 1].links;

        for i in 0..last.len().saturating_sub(1) {
            let spur = last[i];
            let root = &last[..=i];

            let mut banned_edges: FxHashSet<(LinkId, LinkId)> = FxHashSet::default();
            for p in &accepted {
                if p.links.len() > i + 1 && &p.links[..=i] == root {
                    banned_edges.insert((p.links[i], p.links[i + 1]));
                }
            }
            let banned_links: FxHashSet<LinkId> = root[..i].iter().copied().collect();

            let Some(spur_path) = dijkstra(network, adjacency, spur, target, &banned_links, &banned_edges) else {
                continue;
            };

            let mut links = root[..i].to_vec();
            links.extend_from_slice(&spur_path.links);
            let candidate = CandidatePath { cost: path_cost(network, &links), links };
            if !accepted.iter().any(|p| p.links == candidate.links) {
                pending.insert(Ranked(candidate));
            }
        }

        let Some(Ranked(next)) = pending.pop_first() else {
            break;
        };

        // Past k, only paths tied with the k-th can still make the cut.
        if accepted.len() >= k && next.cost > accepted[k - 1].cost {
            break;
        }
        accepted.push(next);
    }

    accepted.sort_by(CandidatePath::rank_cmp);
    accepted.truncate(k);
    accepted
}

/// Sum of virtual lengths over `links`, in order.
pub fn path_cost(network: &RoadNetwork, links: &[LinkId]) -> f64 {
    links
        .iter()
        .map(|&l| network.virtual_length(l).unwrap_or(0.0) as f64)
        .sum()
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Lowest-cost path `source → target` avoiding `banned_links` (as
/// intermediate or final vertices) and `banned_edges`.
fn dijkstra(
    network: &RoadNetwork,
    adjacency: &AdjacencyIndex,
    source: LinkId,
    target: LinkId,
    banned_links: &FxHashSet<LinkId>,
    banned_edges: &FxHashSet<(LinkId, LinkId)>,
) -> Option<CandidatePath> {
    if source == target {
        let links = vec![source];
        return Some(CandidatePath { cost: path_cost(network, &links), links });
    }

    // best[l] = (cost, hops) of the best known way to reach l.
    let mut best: FxHashMap<LinkId, (Cost, u32)> = FxHashMap::default();
    let mut prev: FxHashMap<LinkId, LinkId> = FxHashMap::default();

    let start = Cost(network.virtual_length(source)? as f64);
    best.insert(source, (start, 0));

    // Min-heap: (cost, hops, link).  Secondary keys make tie-breaking deterministic.
    let mut heap: BinaryHeap<Reverse<(Cost, u32, LinkId)>> = BinaryHeap::new();
    heap.push(Reverse((start, 0, source)));

    while let Some(Reverse((cost, hops, link))) = heap.pop() {
        if link == target {
            return Some(reconstruct(network, &prev, source, target));
        }

        // Skip stale heap entries.
        if best.get(&link).is_some_and(|&b| (cost, hops) > b) {
            continue;
        }

        for &next in adjacency.successors(link) {
            if next == source || banned_links.contains(&next) || banned_edges.contains(&(link, next)) {
                continue;
            }
            let vl = network.virtual_length(next).unwrap_or(0.0) as f64;
            let key = (Cost(cost.0 + vl), hops + 1);
            if best.get(&next).is_none_or(|&b| key < b) {
                best.insert(next, key);
                prev.insert(next, link);
                heap.push(Reverse((key.0, key.1, next)));
            }
        }
    }

    None
}

fn reconstruct(
    network: &RoadNetwork,
    prev: &FxHashMap<LinkId, LinkId>,
    source: LinkId,
    target: LinkId,
) -> CandidatePath {
    let mut links = vec![target];
    let mut cur = target;
    while cur != source {
        match prev.get(&cur) {
            Some(&p) => {
                links.push(p);
                cur = p;
            }
            None => break,
        }
    }
    links.reverse();
    CandidatePath { cost: path_cost(network, &links), links }
}
