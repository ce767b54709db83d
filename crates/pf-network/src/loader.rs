//! Adjacency side-file loader.
//!
//! # CSV format
//!
//! One row per (link, neighbour) pair.  A link with no neighbours appears
//! once with an empty `neighbor_id`:
//!
//! ```csv
//! link_id,neighbor_id
//! 1,2
//! 1,5
//! 2,
//! ```
//!
//! The same format serves downstream and upstream files.  The loader only
//! parses; validation against the network happens in
//! [`TwinNetworkBuilder::build`](crate::TwinNetworkBuilder::build).

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use pf_core::LinkId;

use crate::{NetworkError, NetworkResult};

#[derive(Deserialize)]
struct AdjacencyRecord {
    link_id:     u32,
    neighbor_id: Option<u32>,
}

/// Load an adjacency side file from disk.
pub fn load_adjacency_csv(path: &Path) -> NetworkResult<BTreeMap<LinkId, Vec<LinkId>>> {
    let file = std::fs::File::open(path)?;
    load_adjacency_reader(file)
}

/// Like [`load_adjacency_csv`] but accepts any `Read` source.
pub fn load_adjacency_reader<R: Read>(reader: R) -> NetworkResult<BTreeMap<LinkId, Vec<LinkId>>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut map: BTreeMap<LinkId, Vec<LinkId>> = BTreeMap::new();

    for result in csv_reader.deserialize::<AdjacencyRecord>() {
        let row = result.map_err(|e| NetworkError::Parse(e.to_string()))?;
        let entry = map.entry(LinkId(row.link_id)).or_default();
        if let Some(n) = row.neighbor_id {
            entry.push(LinkId(n));
        }
    }

    Ok(map)
}
