//! Lazily filled table of k-shortest candidate paths.
//!
//! # Concurrency
//!
//! Lookups take a shared read lock.  A miss computes the paths *outside* any
//! lock, then takes the write lock only to insert; if another thread filled
//! the same pair in the meantime its entry wins, so every caller observes
//! one canonical list per pair.  Entries are never mutated or evicted.

use std::sync::{Arc, PoisonError, RwLock};

use log::debug;
use rustc_hash::FxHashMap;

use pf_core::LinkId;

use crate::ksp::{CandidatePath, k_shortest_paths};
use crate::network::RoadNetwork;
use crate::twin::AdjacencyIndex;

type Entry = Arc<[CandidatePath]>;

/// `(source, target)` → up to `k` ranked paths.
pub struct CandidatePathTable {
    k: usize,
    cache: RwLock<FxHashMap<(LinkId, LinkId), Entry>>,
}

impl CandidatePathTable {
    pub fn new(k: usize) -> Self {
        Self { k: k.max(1), cache: RwLock::new(FxHashMap::default()) }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of cached pairs (including pairs with no path).
    pub fn len(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached entry for the pair, without computing.
    pub fn get(&self, source: LinkId, target: LinkId) -> Option<Entry> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(source, target))
            .cloned()
    }

    /// Cached entry, computing it with [`k_shortest_paths`] on a miss.
    pub fn get_or_compute(
        &self,
        network: &RoadNetwork,
        adjacency: &AdjacencyIndex,
        source: LinkId,
        target: LinkId,
    ) -> Entry {
        if let Some(hit) = self.get(source, target) {
            return hit;
        }

        let paths: Entry = k_shortest_paths(network, adjacency, source, target, self.k).into();
        debug!(
            "Candidate fill {} -> {}: {} path(s)",
            source.0,
            target.0,
            paths.len()
        );

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        cache.entry((source, target)).or_insert(paths).clone()
    }
}
