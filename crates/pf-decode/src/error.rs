//! Per-sample decode outcomes.
//!
//! None of these abort a batch.  [`DecodeFailure::kind`] gives a stable label
//! for aggregating failures in summaries.

use thiserror::Error;

use pf_core::LinkId;

/// Why a decoded link sequence is not an admissible inferred path.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Violation {
    #[error("path is empty")]
    Empty,

    #[error("path has {len} links, more than max_len {max_len}")]
    TooLong { len: usize, max_len: usize },

    #[error("link {from} -> link {to} at position {position} is not a turn of the network")]
    NotContiguous { position: usize, from: LinkId, to: LinkId },

    #[error("anchor link {0} is missing or out of order")]
    MissingAnchor(LinkId),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DecodeFailure {
    #[error("input has no observed link")]
    NoAnchors,

    #[error("input of {len} positions exceeds max_len {max_len}")]
    TooLong { len: usize, max_len: usize },

    #[error("no admissible link at position {position}")]
    Stuck { position: usize, after: Option<LinkId> },

    #[error("no candidate path from link {from} to link {to} fits")]
    NoPath { from: LinkId, to: LinkId },

    #[error("decoded path rejected: {0}")]
    Invalid(#[from] Violation),
}

impl DecodeFailure {
    /// Short label used as a summary key.
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeFailure::NoAnchors => "no_anchors",
            DecodeFailure::TooLong { .. } => "too_long",
            DecodeFailure::Stuck { .. } => "stuck",
            DecodeFailure::NoPath { .. } => "no_path",
            DecodeFailure::Invalid(_) => "invalid",
        }
    }
}
