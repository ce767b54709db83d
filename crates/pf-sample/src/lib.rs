//! `pf-sample`: ground truth, observation simulation, and cloze samples.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                 |
//! |------------------|----------------------------------------------------------|
//! | [`ground_truth`] | `GroundTruthPath`, `GroundTruthSet`, CSV loader          |
//! | [`split`]        | `TrainTestSplit` (by path identity)                      |
//! | [`observe`]      | `Observation`, ratio / OD-only draws, AVI detectors      |
//! | [`sample`]       | `TrainingSample`, `SampleOrigin`, model encoding         |
//! | [`generator`]    | `SampleGenerator`, `SampleSets`                          |
//! | [`regen`]        | `Regenerator`: independent per-round draws              |
//! | [`synthetic`]    | `random_walk_paths`                                      |
//! | [`error`]        | `SampleError`, `SampleResult<T>`                         |
//!
//! # Randomness
//!
//! Nothing here touches ambient random state.  Every stochastic call takes a
//! `&mut SampleRng`, so one seed reproduces the whole sample schedule.

pub mod error;
pub mod generator;
pub mod ground_truth;
pub mod observe;
pub mod regen;
pub mod sample;
pub mod split;
pub mod synthetic;

#[cfg(test)]
mod tests;

pub use error::{SampleError, SampleResult};
pub use generator::{SampleGenerator, SampleSets};
pub use ground_truth::{GroundTruthPath, GroundTruthSet, LengthStats, load_ground_truth_csv, load_ground_truth_reader};
pub use observe::{DetectorSet, Observation, deploy_detectors, observe_detectors};
pub use regen::{Regenerator, Round};
pub use sample::{SampleOrigin, TrainingSample};
pub use split::TrainTestSplit;
pub use synthetic::random_walk_paths;
