//! Ground-truth paths and their validated container.
//!
//! # CSV format
//!
//! One row per link, in traversal order.  Rows of one path need not be
//! adjacent in the file, but their relative order is the path order:
//!
//! ```csv
//! path_id,link_id
//! 0,12
//! 0,17
//! 0,23
//! 1,5
//! 1,6
//! ```
//!
//! Every path is checked against the adjacency index before the set is
//! returned.  A single broken path rejects the whole file.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use log::info;
use serde::Deserialize;

use pf_core::{LinkId, PathId};
use pf_network::AdjacencyIndex;

use crate::{SampleError, SampleResult};

// ── GroundTruthPath ───────────────────────────────────────────────────────────

/// One complete observed trajectory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroundTruthPath {
    pub id: PathId,
    pub links: Vec<LinkId>,
}

impl GroundTruthPath {
    pub fn new(id: PathId, links: Vec<LinkId>) -> Self {
        Self { id, links }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// First link.  `None` only for an empty path, which a
    /// [`GroundTruthSet`] never holds.
    pub fn origin(&self) -> Option<LinkId> {
        self.links.first().copied()
    }

    pub fn destination(&self) -> Option<LinkId> {
        self.links.last().copied()
    }
}

// ── GroundTruthSet ────────────────────────────────────────────────────────────

/// Path lengths across a set, in links.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct LengthStats {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
}

/// Contiguity-checked ground-truth paths, ordered by path id.
#[derive(Clone, Debug, Default)]
pub struct GroundTruthSet {
    paths: Vec<GroundTruthPath>,
}

impl GroundTruthSet {
    /// Validate every path against `adjacency` and collect them.
    ///
    /// Fails on the first empty, unknown-link, or non-contiguous path, and on
    /// repeated path ids.
    pub fn new(mut paths: Vec<GroundTruthPath>, adjacency: &AdjacencyIndex) -> SampleResult<Self> {
        paths.sort_by_key(|p| p.id);
        for pair in paths.windows(2) {
            if pair[0].id == pair[1].id {
                return Err(SampleError::DuplicatePath(pair[0].id));
            }
        }
        for p in &paths {
            adjacency.check_path(p.id, &p.links)?;
        }
        Ok(Self { paths })
    }

    /// Build from an id → links mapping.
    pub fn from_map(map: BTreeMap<PathId, Vec<LinkId>>, adjacency: &AdjacencyIndex) -> SampleResult<Self> {
        let paths = map.into_iter().map(|(id, links)| GroundTruthPath { id, links }).collect();
        Self::new(paths, adjacency)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn get(&self, id: PathId) -> Option<&GroundTruthPath> {
        self.paths
            .binary_search_by_key(&id, |p| p.id)
            .ok()
            .map(|i| &self.paths[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroundTruthPath> + '_ {
        self.paths.iter()
    }

    /// All path ids in ascending order.
    pub fn ids(&self) -> Vec<PathId> {
        self.paths.iter().map(|p| p.id).collect()
    }

    /// Distinct (origin, destination) pairs, sorted.  Suitable for eager
    /// candidate-table precomputation.
    pub fn od_pairs(&self) -> Vec<(LinkId, LinkId)> {
        let mut pairs: Vec<(LinkId, LinkId)> = self
            .paths
            .iter()
            .filter_map(|p| Some((p.origin()?, p.destination()?)))
            .collect();
        pairs.sort_unstable();
        pairs.dedup();
        pairs
    }

    pub fn length_stats(&self) -> LengthStats {
        if self.paths.is_empty() {
            return LengthStats::default();
        }
        let total: usize = self.paths.iter().map(GroundTruthPath::len).sum();
        LengthStats {
            min: self.paths.iter().map(GroundTruthPath::len).min().unwrap_or(0),
            max: self.paths.iter().map(GroundTruthPath::len).max().unwrap_or(0),
            mean: total as f64 / self.paths.len() as f64,
        }
    }
}

// ── CSV loading ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PathRecord {
    path_id: u32,
    link_id: u32,
}

/// Load and validate ground-truth paths from a CSV file.
pub fn load_ground_truth_csv(path: &Path, adjacency: &AdjacencyIndex) -> SampleResult<GroundTruthSet> {
    let file = std::fs::File::open(path)?;
    load_ground_truth_reader(file, adjacency)
}

/// Like [`load_ground_truth_csv`] but accepts any `Read` source.
pub fn load_ground_truth_reader<R: Read>(reader: R, adjacency: &AdjacencyIndex) -> SampleResult<GroundTruthSet> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut by_path: BTreeMap<PathId, Vec<LinkId>> = BTreeMap::new();

    for result in csv_reader.deserialize::<PathRecord>() {
        let row = result.map_err(|e| SampleError::Parse(e.to_string()))?;
        by_path.entry(PathId(row.path_id)).or_default().push(LinkId(row.link_id));
    }

    let set = GroundTruthSet::from_map(by_path, adjacency)?;
    let stats = set.length_stats();
    info!(
        "Loaded {} ground-truth paths (length {}..={}, mean {:.1})",
        set.len(),
        stats.min,
        stats.max,
        stats.mean
    );
    Ok(set)
}
