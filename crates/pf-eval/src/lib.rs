//! `pf-eval`: scoring inferred paths against ground truth, and writing
//! results.
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | `metrics`  | BLEU-1, edit distance, normalized ED, TLLA, route JSD         |
//! | `report`   | [`EvaluationReport`]: per-path scores and batch means         |
//! | `writer`   | [`OutputWriter`] trait                                        |
//! | `csv`      | [`CsvWriter`]: `inferred_paths.csv`, `summary.csv`            |
//! | `observer` | [`PathOutputObserver`]: streams decode results to a writer    |
//!
//! # Usage
//!
//! ```rust,ignore
//! use pf_eval::{CsvWriter, EvaluationReport, OutputWriter, PathOutputObserver};
//!
//! let mut obs = PathOutputObserver::new(CsvWriter::new(Path::new("./output"))?);
//! let batch = decode_batch(&decoder, &test_samples, &mut obs);
//! let report = EvaluationReport::evaluate(&twin.network, &set, &test_samples, &batch.results)?;
//! let mut writer = obs.into_writer();
//! writer.write_report(&report)?;
//! writer.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod metrics;
pub mod observer;
pub mod report;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{EvalError, EvalResult};
pub use metrics::{bleu1, edit_distance, normalized_edit_distance, route_jsd, tlla};
pub use observer::PathOutputObserver;
pub use report::{EvaluationReport, PathScore};
pub use writer::OutputWriter;
