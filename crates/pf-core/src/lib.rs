//! `pf-core`: foundational types for the `pathfill` workspace.
//!
//! This crate is a dependency of every other `pf-*` crate.  It has no `pf-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`ids`]    | `LinkId`, `NodeId`, `PathId`                               |
//! | [`token`]  | `Token`: link, mask, or padding position in a sequence    |
//! | [`geo`]    | `GeoPoint`, haversine distance                             |
//! | [`rng`]    | `SampleRng` (seeded, splittable)                           |
//! | [`config`] | `InferenceConfig`, `MaskRatio`, `GapMode`, `RatioCycle`    |
//! | [`error`]  | `CoreError`, `CoreResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod token;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{GapMode, InferenceConfig, MaskRatio, RatioCycle, RegenerationConfig};
pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{LinkId, NodeId, PathId};
pub use rng::SampleRng;
pub use token::Token;
