//! Network-subsystem error types.

use std::fmt;

use thiserror::Error;

use pf_core::{LinkId, NodeId, PathId};

/// Which half of the adjacency relation a side file describes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Downstream,
    Upstream,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Downstream => f.write_str("downstream"),
            Direction::Upstream => f.write_str("upstream"),
        }
    }
}

/// Corrupt input detected at load time.  Never repaired, always rejected.
#[derive(Debug, Error, PartialEq)]
pub enum IntegrityError {
    #[error("path {0} is empty")]
    EmptyPath(PathId),

    #[error("path {path} references unknown link {link} at position {position}")]
    UnknownLink { path: PathId, link: LinkId, position: usize },

    #[error("path {path} breaks contiguity at position {position}: link {from} -> link {to}")]
    NotContiguous { path: PathId, position: usize, from: LinkId, to: LinkId },

    #[error("{direction} side file disagrees with the network for link {link}")]
    SideFileMismatch { link: LinkId, direction: Direction },

    #[error("{direction} side file references unknown link {link}")]
    SideFileUnknownLink { link: LinkId, direction: Direction },
}

/// Errors produced by `pf-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("link id {0} is reserved")]
    ReservedLinkId(LinkId),

    #[error("duplicate link id {0}")]
    DuplicateLink(LinkId),

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("link {link} has invalid {what} {value}")]
    InvalidLength { link: LinkId, what: &'static str, value: f32 },

    #[error("no path from link {from} to link {to}")]
    NoPath { from: LinkId, to: LinkId },

    #[error("input integrity error: {0}")]
    Integrity(#[from] IntegrityError),

    #[error("adjacency parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
