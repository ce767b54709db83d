//! The `OutputWriter` trait implemented by result backends.

use pf_core::PathId;
use pf_decode::DecodeResult;

use crate::{EvalResult, EvaluationReport};

pub trait OutputWriter {
    /// Write one decode outcome.  Failures are written too, without links.
    fn write_path(&mut self, path: PathId, result: &DecodeResult) -> EvalResult<()>;

    /// Write the metric rows of `report`.
    fn write_report(&mut self, report: &EvaluationReport) -> EvalResult<()>;

    /// Flush buffered rows; the writer stays open.
    fn flush(&mut self) -> EvalResult<()>;

    /// Flush all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> EvalResult<()>;
}
