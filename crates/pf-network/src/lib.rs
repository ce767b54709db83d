//! `pf-network`: link-level road network, twin adjacency, and candidate paths.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`network`]    | `RoadNetwork` (links + node CSR), `RoadNetworkBuilder`     |
//! | [`twin`]       | `AdjacencyIndex`, `TwinNetwork`, `TwinNetworkBuilder`      |
//! | [`ksp`]        | `CandidatePath`, `k_shortest_paths` (Yen)                  |
//! | [`candidates`] | `CandidatePathTable`: lazily filled, shared read-only     |
//! | [`loader`]     | adjacency side-file CSV loader                             |
//! | [`error`]      | `NetworkError`, `IntegrityError`, `NetworkResult<T>`       |
//!
//! # Twin network
//!
//! Paths are sequences of *links*, not intersections.  The twin network is
//! the derived graph whose vertices are links and whose edges join link A to
//! link B iff A ends at the node where B starts.  It is computed once by
//! [`TwinNetworkBuilder::build`] and never mutated afterwards; only the
//! candidate-path cache fills in lazily.

pub mod candidates;
pub mod error;
pub mod ksp;
pub mod loader;
pub mod network;
pub mod twin;


pub use candidates::CandidatePathTable;
pub use error::{Direction, IntegrityError, NetworkError, NetworkResult};
pub use ksp::{CandidatePath, k_shortest_paths};
pub use loader::{load_adjacency_csv, load_adjacency_reader};
pub use network::{Link, RoadNetwork, RoadNetworkBuilder};
pub use twin::{AdjacencyIndex, TwinNetwork, TwinNetworkBuilder};
