//! `EvaluationReport`: every decoded sample scored against its ground truth.

use log::info;

use pf_core::PathId;
use pf_decode::{DecodeResult, DecodeSummary, PathSource};
use pf_network::RoadNetwork;
use pf_sample::{GroundTruthSet, TrainingSample};

use crate::metrics::{bleu1, edit_distance, normalized_edit_distance, route_jsd, tlla};
use crate::{EvalError, EvalResult};

/// Scores of one sample.
#[derive(Clone, Debug, PartialEq)]
pub struct PathScore {
    pub path: PathId,
    /// `None` when decoding failed.
    pub source: Option<PathSource>,
    /// Failure kind when decoding failed.
    pub failure: Option<&'static str>,
    pub gt_len: usize,
    pub inferred_len: usize,
    pub edit_distance: Option<usize>,
    pub bleu: f64,
    pub normalized_ed: f64,
    pub tlla: f64,
}

impl PathScore {
    pub fn completed(&self) -> bool {
        self.source.is_some()
    }

    pub fn exact(&self) -> bool {
        self.edit_distance == Some(0)
    }
}

#[derive(Clone, Debug)]
pub struct EvaluationReport {
    /// One entry per sample, in sample order.
    pub paths: Vec<PathScore>,
    pub decode: DecodeSummary,
    /// `0.0` for an empty batch.
    pub mean_bleu: f64,
    /// `1.0` for an empty batch.
    pub mean_normalized_ed: f64,
    /// `0.0` for an empty batch.
    pub mean_tlla: f64,
    /// Route-frequency JSD with failed decodes as one "unseen" route.
    pub jsd: f64,
    /// Route-frequency JSD over completed decodes only.
    pub jsd_without_unseen: f64,
}

impl EvaluationReport {
    /// Score `results[i]` against the ground truth of `samples[i].path`.
    pub fn evaluate(
        network: &RoadNetwork,
        set: &GroundTruthSet,
        samples: &[TrainingSample],
        results: &[DecodeResult],
    ) -> EvalResult<Self> {
        if samples.len() != results.len() {
            return Err(EvalError::LengthMismatch { samples: samples.len(), results: results.len() });
        }

        let mut decode = DecodeSummary::default();
        let mut paths = Vec::with_capacity(samples.len());
        let mut routes = Vec::with_capacity(samples.len());
        for (sample, result) in samples.iter().zip(results) {
            let gt = set.get(sample.path).ok_or(EvalError::MissingGroundTruth(sample.path))?;
            decode.record(result);

            let inferred = result.as_ref().ok().map(|p| p.links.as_slice());
            paths.push(PathScore {
                path: sample.path,
                source: result.as_ref().ok().map(|p| p.source),
                failure: result.as_ref().err().map(|e| e.kind()),
                gt_len: gt.len(),
                inferred_len: inferred.map_or(0, <[_]>::len),
                edit_distance: inferred.map(|p| edit_distance(&gt.links, p)),
                bleu: bleu1(inferred, &gt.links),
                normalized_ed: normalized_edit_distance(inferred, &gt.links),
                tlla: tlla(network, inferred, &gt.links),
            });
            routes.push((gt.links.as_slice(), inferred));
        }

        let mean_bleu = mean(&paths, |p| p.bleu, 0.0);
        let mean_normalized_ed = mean(&paths, |p| p.normalized_ed, 1.0);
        let mean_tlla = mean(&paths, |p| p.tlla, 0.0);
        let jsd = route_jsd(routes.iter().copied(), true);
        let jsd_without_unseen = route_jsd(routes.iter().copied(), false);

        let report = Self { paths, decode, mean_bleu, mean_normalized_ed, mean_tlla, jsd, jsd_without_unseen };
        info!(
            "Evaluated {} paths: completion {:.4}, BLEU {:.4}, ED {:.4}, TLLA {:.4}, JSD {:.4} ({:.4} without unseen)",
            report.paths.len(),
            report.completion_rate(),
            report.mean_bleu,
            report.mean_normalized_ed,
            report.mean_tlla,
            report.jsd,
            report.jsd_without_unseen
        );
        Ok(report)
    }

    pub fn completion_rate(&self) -> f64 {
        self.decode.completion_rate()
    }

    /// Share of samples reproduced link for link.
    pub fn exact_match_rate(&self) -> f64 {
        if self.paths.is_empty() {
            return 0.0;
        }
        self.paths.iter().filter(|p| p.exact()).count() as f64 / self.paths.len() as f64
    }

    /// `(metric, value)` rows in a fixed order, decode counts included.
    pub fn metrics(&self) -> Vec<(&'static str, f64)> {
        let d = &self.decode;
        let mut rows = vec![
            ("total_paths", d.total as f64),
            ("completed_paths", d.completed() as f64),
            ("completion_rate", self.completion_rate()),
            ("bleu", self.mean_bleu),
            ("normalized_ed", self.mean_normalized_ed),
            ("tlla", self.mean_tlla),
            ("jsd", self.jsd),
            ("jsd_without_unseen", self.jsd_without_unseen),
            ("exact_match_rate", self.exact_match_rate()),
            ("model", d.model as f64),
            ("spliced", d.spliced as f64),
            ("fallback", d.fallback as f64),
            ("fallback_rate", d.fallback_rate()),
        ];
        rows.extend(d.failures.iter().map(|(&kind, &n)| (kind, n as f64)));
        rows
    }
}

/// Mean of `f` over `paths`, `empty` when there are none.
fn mean(paths: &[PathScore], f: impl Fn(&PathScore) -> f64, empty: f64) -> f64 {
    if paths.is_empty() {
        return empty;
    }
    paths.iter().map(f).sum::<f64>() / paths.len() as f64
}
