//! Batch decoding with per-sample failure isolation.
//!
//! A failed sample never aborts the batch.  Every outcome is counted in a
//! [`DecodeSummary`]; failures are grouped by [`DecodeFailure::kind`].

use std::collections::BTreeMap;
use std::time::Instant;

use log::{info, warn};

use pf_sample::TrainingSample;

use crate::{ConstrainedDecoder, DecodeFailure, InferredPath, PathSource, SequenceScorer};

pub type DecodeResult = Result<InferredPath, DecodeFailure>;

// ── DecodeSummary ─────────────────────────────────────────────────────────────

/// Outcome counts for one batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodeSummary {
    pub total: usize,
    pub model: usize,
    pub spliced: usize,
    pub fallback: usize,
    /// Failure count by kind.
    pub failures: BTreeMap<&'static str, usize>,
}

impl DecodeSummary {
    pub fn record(&mut self, result: &DecodeResult) {
        self.total += 1;
        match result {
            Ok(p) => match p.source {
                PathSource::Model => self.model += 1,
                PathSource::Spliced => self.spliced += 1,
                PathSource::Fallback => self.fallback += 1,
            },
            Err(e) => *self.failures.entry(e.kind()).or_default() += 1,
        }
    }

    pub fn completed(&self) -> usize {
        self.model + self.spliced + self.fallback
    }

    pub fn failed(&self) -> usize {
        self.failures.values().sum()
    }

    /// Share of samples that produced a path.  `0.0` for an empty batch.
    pub fn completion_rate(&self) -> f64 {
        ratio(self.completed(), self.total)
    }

    pub fn failure_rate(&self) -> f64 {
        ratio(self.failed(), self.total)
    }

    /// Share of samples that needed the candidate table (splice or fallback).
    pub fn fallback_rate(&self) -> f64 {
        ratio(self.spliced + self.fallback, self.total)
    }
}

fn ratio(n: usize, d: usize) -> f64 {
    if d == 0 { 0.0 } else { n as f64 / d as f64 }
}

// ── DecodeObserver ────────────────────────────────────────────────────────────

/// Callbacks invoked by [`decode_batch`].
///
/// Both methods default to no-ops.  Callbacks always arrive in sample
/// order, also when the batch is decoded in parallel.
pub trait DecodeObserver {
    fn on_decoded(&mut self, _index: usize, _sample: &TrainingSample, _result: &DecodeResult) {}

    fn on_batch_end(&mut self, _summary: &DecodeSummary) {}
}

/// A [`DecodeObserver`] that does nothing.
pub struct NoopObserver;

impl DecodeObserver for NoopObserver {}

// ── decode_batch ──────────────────────────────────────────────────────────────

/// All results of a batch, in sample order, with their summary.
#[derive(Clone, Debug)]
pub struct BatchReport {
    pub results: Vec<DecodeResult>,
    pub summary: DecodeSummary,
}

/// Decode every sample's input.
///
/// With the `parallel` feature the decodes run on the Rayon pool; progress
/// is then logged once per batch instead of every `progress_interval`
/// samples.
pub fn decode_batch<S>(
    decoder: &ConstrainedDecoder<'_, S>,
    samples: &[TrainingSample],
    observer: &mut dyn DecodeObserver,
) -> BatchReport
where
    S: SequenceScorer + ?Sized,
{
    let start = Instant::now();

    #[cfg(not(feature = "parallel"))]
    let results: Vec<DecodeResult> = {
        let interval = decoder.progress_interval().max(1);
        samples
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let r = decoder.decode(&s.input);
                if (i + 1) % interval == 0 {
                    info!("Decoded {}/{} samples", i + 1, samples.len());
                }
                r
            })
            .collect()
    };

    #[cfg(feature = "parallel")]
    let results: Vec<DecodeResult> = {
        use rayon::prelude::*;
        samples.par_iter().map(|s| decoder.decode(&s.input)).collect()
    };

    let mut summary = DecodeSummary::default();
    for (i, (sample, result)) in samples.iter().zip(&results).enumerate() {
        summary.record(result);
        observer.on_decoded(i, sample, result);
    }
    observer.on_batch_end(&summary);

    info!(
        "Batch of {} decoded in {:?}: {} model, {} spliced, {} fallback, {} failed",
        summary.total,
        start.elapsed(),
        summary.model,
        summary.spliced,
        summary.fallback,
        summary.failed()
    );
    if summary.failed() > 0 {
        warn!("Decode failures by kind: {:?}", summary.failures);
    }

    BatchReport { results, summary }
}
