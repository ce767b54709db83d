//! `PathOutputObserver<W>`: bridges `DecodeObserver` to an `OutputWriter`.

use pf_decode::{DecodeObserver, DecodeResult, DecodeSummary};
use pf_sample::TrainingSample;

use crate::writer::OutputWriter;
use crate::{EvalError, EvalResult};

/// A [`DecodeObserver`] that writes every decode outcome to an
/// [`OutputWriter`] as the batch reports it.
///
/// Observer callbacks have no return value, so write errors are stored.
/// After the batch, check with [`take_error`][Self::take_error].
pub struct PathOutputObserver<W: OutputWriter> {
    writer: W,
    written: usize,
    last_error: Option<EvalError>,
}

impl<W: OutputWriter> PathOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0, last_error: None }
    }

    /// Take the stored write error, if any.
    pub fn take_error(&mut self) -> Option<EvalError> {
        self.last_error.take()
    }

    /// Rows written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: EvalResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> DecodeObserver for PathOutputObserver<W> {
    fn on_decoded(&mut self, _index: usize, sample: &TrainingSample, result: &DecodeResult) {
        let result = self.writer.write_path(sample.path, result);
        if result.is_ok() {
            self.written += 1;
        }
        self.store_err(result);
    }

    fn on_batch_end(&mut self, _summary: &DecodeSummary) {
        // The summary file still waits for `write_report`.
        let result = self.writer.flush();
        self.store_err(result);
    }
}
