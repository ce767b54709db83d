//! Per-path accuracy metrics and the route-distribution divergence.
//!
//! A failed decode is scored as the worst case: BLEU-1 `0.0`, normalized ED
//! `1.0`, TLLA `0.0`.

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};

use pf_core::LinkId;
use pf_network::RoadNetwork;

/// Levenshtein distance over link sequences (unit insert, delete, substitute).
pub fn edit_distance(a: &[LinkId], b: &[LinkId]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Single rolling row over `b`.
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, &x) in a.iter().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, &y) in b.iter().enumerate() {
            let above = row[j + 1];
            let cost = usize::from(x != y);
            row[j + 1] = (above + 1).min(row[j] + 1).min(diag + cost);
            diag = above;
        }
    }
    row[b.len()]
}

/// `min(ED / len(gt), 1)`, or `1.0` when nothing was inferred.
pub fn normalized_edit_distance(inferred: Option<&[LinkId]>, gt: &[LinkId]) -> f64 {
    match inferred {
        Some(p) if !gt.is_empty() => (edit_distance(gt, p) as f64 / gt.len() as f64).min(1.0),
        _ => 1.0,
    }
}

/// Total link length accuracy.
///
/// Physical length of the distinct inferred links that also occur in the
/// ground truth, over the ground truth's total length.  `0.0` for a failed
/// decode or a zero-length ground truth.
pub fn tlla(network: &RoadNetwork, inferred: Option<&[LinkId]>, gt: &[LinkId]) -> f64 {
    let Some(inferred) = inferred else {
        return 0.0;
    };
    let gt_length = network.path_length_m(gt);
    if gt_length <= 0.0 {
        return 0.0;
    }

    let truth: FxHashSet<LinkId> = gt.iter().copied().collect();
    let matched: FxHashSet<LinkId> = inferred.iter().copied().filter(|l| truth.contains(l)).collect();
    let mut matched: Vec<LinkId> = matched.into_iter().collect();
    matched.sort_unstable();
    network.path_length_m(&matched) / gt_length
}

/// Sentence BLEU with unigram weights only.
///
/// Clipped unigram precision of `inferred` against `gt`, times the brevity
/// penalty `exp(1 - len(gt) / len(inferred))` for an inferred path shorter
/// than the ground truth.  `0.0` for a failed or empty decode.
pub fn bleu1(inferred: Option<&[LinkId]>, gt: &[LinkId]) -> f64 {
    let Some(inferred) = inferred.filter(|p| !p.is_empty()) else {
        return 0.0;
    };

    let mut budget: FxHashMap<LinkId, usize> = FxHashMap::default();
    for &l in gt {
        *budget.entry(l).or_default() += 1;
    }
    let mut hits = 0usize;
    for l in inferred {
        if let Some(n) = budget.get_mut(l).filter(|n| **n > 0) {
            *n -= 1;
            hits += 1;
        }
    }
    if hits == 0 {
        return 0.0;
    }

    let c = inferred.len() as f64;
    let r = gt.len() as f64;
    let brevity = if c > r { 1.0 } else { (1.0 - r / c).exp() };
    brevity * hits as f64 / c
}

/// Jensen-Shannon divergence (base 2) between the ground-truth and the
/// inferred route frequency distributions.
///
/// Every `(gt, inferred)` pair adds one count to its ground-truth route and
/// one to its inferred route.  A failed decode counts towards a shared
/// "unseen" route when `include_unseen` is set and is skipped otherwise.
/// Ranges over `[0, 1]`; `1.0` when either side has no counts.
pub fn route_jsd<'a, I>(pairs: I, include_unseen: bool) -> f64
where
    I: IntoIterator<Item = (&'a [LinkId], Option<&'a [LinkId]>)>,
{
    // None is the unseen route.  Columns: (ground truth, inferred).
    let mut freq: BTreeMap<Option<&[LinkId]>, (f64, f64)> = BTreeMap::new();
    for (gt, inferred) in pairs {
        freq.entry(Some(gt)).or_default().0 += 1.0;
        if inferred.is_some() || include_unseen {
            freq.entry(inferred).or_default().1 += 1.0;
        }
    }

    let (gt_total, inferred_total) = freq.values().fold((0.0, 0.0), |(a, b), &(g, i)| (a + g, b + i));
    if gt_total <= 0.0 || inferred_total <= 0.0 {
        return 1.0;
    }

    let mut jsd = 0.0;
    for &(g, i) in freq.values() {
        let p = g / gt_total;
        let q = i / inferred_total;
        let m = 0.5 * (p + q);
        if p > 0.0 {
            jsd += 0.5 * p * (p / m).log2();
        }
        if q > 0.0 {
            jsd += 0.5 * q * (q / m).log2();
        }
    }
    jsd.max(0.0)
}
