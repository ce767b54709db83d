//! `pf-decode`: turn scorer distributions into graph-valid paths.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`scorer`]      | `SequenceScorer` trait, `LinkDistribution`, baseline scorers |
//! | [`decoder`]     | `ConstrainedDecoder` (greedy, adjacency-constrained)      |
//! | [`fallback`]    | `InferredPath`, `validate`, `resolve_or_fallback`         |
//! | [`batch`]       | `decode_batch`, `DecodeSummary`, `DecodeObserver`         |
//! | `feasibility`   | reach levels and hop distances (internal)                 |
//! | [`error`]       | `DecodeFailure`, `Violation`                              |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | `decode_batch` decodes samples on the Rayon pool.       |

pub mod batch;
pub mod decoder;
pub mod error;
pub mod fallback;
pub mod scorer;

mod feasibility;


pub use batch::{BatchReport, DecodeObserver, DecodeResult, DecodeSummary, NoopObserver, decode_batch};
pub use decoder::{ConstrainedDecoder, anchors_of, trim_padding};
pub use error::{DecodeFailure, Violation};
pub use fallback::{FallbackPolicy, InferredPath, PathSource, anchor_chain, resolve_or_fallback, validate};
pub use scorer::{LinkDistribution, SequenceScorer, TransitionScorer, UniformScorer};
