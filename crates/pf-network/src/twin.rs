//! Twin (link-level) network: adjacency index and builder.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info};
use rustc_hash::FxHashMap;

use pf_core::{InferenceConfig, LinkId, PathId};

use crate::candidates::CandidatePathTable;
use crate::ksp::CandidatePath;
use crate::network::RoadNetwork;
use crate::{Direction, IntegrityError, NetworkError, NetworkResult};

// ── AdjacencyIndex ────────────────────────────────────────────────────────────

/// Successor and predecessor sets per link.
///
/// Every link of the network is a key, possibly with an empty neighbour list
/// (a dead end is valid).  Neighbour lists are sorted ascending and
/// duplicate-free, so two indices compare equal exactly when they hold the
/// same set per key.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AdjacencyIndex {
    downstream: FxHashMap<LinkId, Vec<LinkId>>,
    upstream: FxHashMap<LinkId, Vec<LinkId>>,
}

impl AdjacencyIndex {
    /// Derive adjacency from the node graph: A → B iff `A.to == B.from`.
    ///
    /// U-turns onto the reverse link are adjacent like any other turn; use
    /// virtual lengths to discourage them in search.
    pub fn derive(network: &RoadNetwork) -> Self {
        let mut downstream = FxHashMap::with_capacity_and_hasher(network.link_count(), Default::default());
        let mut upstream = FxHashMap::with_capacity_and_hasher(network.link_count(), Default::default());

        for link in network.links() {
            let succ: Vec<LinkId> = network.out_links(link.to).map(|l| l.id).collect();
            let pred: Vec<LinkId> = network.in_links(link.from).map(|l| l.id).collect();
            downstream.insert(link.id, succ);
            upstream.insert(link.id, pred);
        }

        Self { downstream, upstream }
    }

    pub fn len(&self) -> usize {
        self.downstream.len()
    }

    pub fn is_empty(&self) -> bool {
        self.downstream.is_empty()
    }

    #[inline]
    pub fn contains(&self, link: LinkId) -> bool {
        self.downstream.contains_key(&link)
    }

    /// Links reachable immediately after `link`.  Empty for unknown links.
    #[inline]
    pub fn successors(&self, link: LinkId) -> &[LinkId] {
        self.downstream.get(&link).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Links from which `link` is reachable immediately.
    #[inline]
    pub fn predecessors(&self, link: LinkId) -> &[LinkId] {
        self.upstream.get(&link).map(Vec::as_slice).unwrap_or(&[])
    }

    #[inline]
    pub fn is_adjacent(&self, from: LinkId, to: LinkId) -> bool {
        self.successors(from).binary_search(&to).is_ok()
    }

    /// Every indexed link in ascending id order.
    pub fn sorted_links(&self) -> Vec<LinkId> {
        let mut keys: Vec<LinkId> = self.downstream.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Largest successor count of any link.
    pub fn max_out_degree(&self) -> usize {
        self.downstream.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Check the contiguity invariant for one ground-truth path.
    pub fn check_path(&self, path: PathId, links: &[LinkId]) -> Result<(), IntegrityError> {
        if links.is_empty() {
            return Err(IntegrityError::EmptyPath(path));
        }
        for (position, &link) in links.iter().enumerate() {
            if !self.contains(link) {
                return Err(IntegrityError::UnknownLink { path, link, position });
            }
        }
        for (i, pair) in links.windows(2).enumerate() {
            if !self.is_adjacent(pair[0], pair[1]) {
                return Err(IntegrityError::NotContiguous {
                    path,
                    position: i + 1,
                    from: pair[0],
                    to: pair[1],
                });
            }
        }
        Ok(())
    }

    /// `true` if every consecutive pair of `links` is adjacent.
    pub fn is_contiguous(&self, links: &[LinkId]) -> bool {
        links.windows(2).all(|w| self.is_adjacent(w[0], w[1]))
    }

    /// Compare a supplied side file against the derived relation.
    ///
    /// Keys absent from the file are accepted only if their derived
    /// neighbour set is empty.
    pub fn verify_side_file(
        &self,
        direction: Direction,
        supplied: &BTreeMap<LinkId, Vec<LinkId>>,
    ) -> Result<(), IntegrityError> {
        let derived = match direction {
            Direction::Downstream => &self.downstream,
            Direction::Upstream => &self.upstream,
        };

        for (&link, neighbours) in supplied {
            let Some(expected) = derived.get(&link) else {
                return Err(IntegrityError::SideFileUnknownLink { link, direction });
            };
            let mut got = neighbours.clone();
            got.sort_unstable();
            got.dedup();
            if &got != expected {
                return Err(IntegrityError::SideFileMismatch { link, direction });
            }
        }

        let mut keys: Vec<LinkId> = derived.keys().copied().collect();
        keys.sort_unstable();
        for link in keys {
            if !supplied.contains_key(&link) && !derived[&link].is_empty() {
                return Err(IntegrityError::SideFileMismatch { link, direction });
            }
        }
        Ok(())
    }
}

// ── TwinNetwork ───────────────────────────────────────────────────────────────

/// The road network together with everything derived from it.
///
/// Construction is a one-shot, single-writer phase.  Afterwards the adjacency
/// is immutable and the candidate table only ever grows, so a `&TwinNetwork`
/// may be shared by concurrent decoders.
pub struct TwinNetwork {
    pub network: RoadNetwork,
    pub adjacency: AdjacencyIndex,
    pub candidates: CandidatePathTable,
}

impl TwinNetwork {
    /// Up to `k` lowest-cost paths `source → target`, computing and caching
    /// them on first request.  Empty when no path exists.
    pub fn candidates(&self, source: LinkId, target: LinkId) -> Arc<[CandidatePath]> {
        self.candidates.get_or_compute(&self.network, &self.adjacency, source, target)
    }

    /// The single lowest-cost path, or [`NetworkError::NoPath`].
    pub fn shortest(&self, source: LinkId, target: LinkId) -> NetworkResult<CandidatePath> {
        self.candidates(source, target)
            .first()
            .cloned()
            .ok_or(NetworkError::NoPath { from: source, to: target })
    }

    /// Eagerly fill the candidate table for `pairs`.  Returns how many of
    /// them have no path at all.
    pub fn precompute<I>(&self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (LinkId, LinkId)>,
    {
        let start = Instant::now();
        let mut requested = 0usize;
        let mut unreachable = 0usize;
        for (s, t) in pairs {
            requested += 1;
            if self.candidates(s, t).is_empty() {
                unreachable += 1;
            }
        }
        info!(
            "Candidate table: {} pairs requested, {} cached, {} unreachable in {}ms",
            requested,
            self.candidates.len(),
            unreachable,
            start.elapsed().as_millis()
        );
        unreachable
    }

    pub fn into_parts(self) -> (RoadNetwork, AdjacencyIndex, CandidatePathTable) {
        (self.network, self.adjacency, self.candidates)
    }
}

// ── TwinNetworkBuilder ────────────────────────────────────────────────────────

/// Derive a [`TwinNetwork`] from a [`RoadNetwork`].
///
/// # Example
///
/// ```rust,ignore
/// let twin = TwinNetworkBuilder::from_config(&config)
///     .side_file(Direction::Downstream, downstream)
///     .build(network)?;
/// let paths = twin.candidates(LinkId(5), LinkId(9));
/// ```
pub struct TwinNetworkBuilder {
    k: usize,
    side_files: Vec<(Direction, BTreeMap<LinkId, Vec<LinkId>>)>,
    pairs: Vec<(LinkId, LinkId)>,
}

impl TwinNetworkBuilder {
    /// Keep up to `k` candidate paths per pair (`k` is raised to at least 1).
    pub fn new(k: usize) -> Self {
        Self { k: k.max(1), side_files: Vec::new(), pairs: Vec::new() }
    }

    pub fn from_config(config: &InferenceConfig) -> Self {
        Self::new(config.k_paths)
    }

    /// Supply a precomputed adjacency side file.  It is validated against the
    /// derived relation during `build`, never trusted blindly.
    pub fn side_file(mut self, direction: Direction, map: BTreeMap<LinkId, Vec<LinkId>>) -> Self {
        self.side_files.push((direction, map));
        self
    }

    /// Pairs to fill eagerly during `build`.
    pub fn precompute_pairs<I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (LinkId, LinkId)>,
    {
        self.pairs.extend(pairs);
        self
    }

    pub fn build(self, network: RoadNetwork) -> NetworkResult<TwinNetwork> {
        let start = Instant::now();
        let adjacency = AdjacencyIndex::derive(&network);
        debug!("Adjacency derivation took: {:?}", start.elapsed());

        for (direction, map) in &self.side_files {
            adjacency.verify_side_file(*direction, map)?;
            debug!("{} side file verified ({} keys)", direction, map.len());
        }

        info!(
            "Twin network: {} links, {} nodes, max out-degree {}",
            adjacency.len(),
            network.node_count(),
            adjacency.max_out_degree()
        );

        let twin = TwinNetwork {
            network,
            adjacency,
            candidates: CandidatePathTable::new(self.k),
        };
        if !self.pairs.is_empty() {
            twin.precompute(self.pairs);
        }
        Ok(twin)
    }
}
