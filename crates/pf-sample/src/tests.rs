//! Unit tests for pf-sample.

#[cfg(test)]
mod helpers {
    use pf_core::{GeoPoint, InferenceConfig, LinkId, MaskRatio, PathId};
    use pf_network::{AdjacencyIndex, RoadNetwork, RoadNetworkBuilder};

    use crate::{GroundTruthPath, GroundTruthSet};

    pub const RING: u32 = 6;

    /// Bidirectional ring of `RING` nodes.
    ///
    /// Forward link `i + 1` runs node `i → i + 1`; reverse link `101 + i`
    /// runs node `i + 1 → i` (indices mod `RING`).
    pub fn ring() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new();
        let n: Vec<_> = (0..RING)
            .map(|i| b.add_node(GeoPoint::new(0.0, i as f32 * 0.01)))
            .collect();
        for i in 0..RING as usize {
            let j = (i + 1) % RING as usize;
            b.add_link(LinkId(i as u32 + 1), n[i], n[j], 100.0, 100.0).unwrap();
            b.add_link(LinkId(i as u32 + 101), n[j], n[i], 100.0, 100.0).unwrap();
        }
        b.build()
    }

    pub fn adjacency() -> AdjacencyIndex {
        AdjacencyIndex::derive(&ring())
    }

    /// Forward walk of `len` links starting at link `start`.
    pub fn forward(id: u32, start: u32, len: usize) -> GroundTruthPath {
        let links = (0..len as u32).map(|k| LinkId((start - 1 + k) % RING + 1)).collect();
        GroundTruthPath::new(PathId(id), links)
    }

    /// `count` forward paths of length `len`.
    pub fn set(count: u32, len: usize) -> GroundTruthSet {
        let paths = (0..count).map(|i| forward(i, i % RING + 1, len)).collect();
        GroundTruthSet::new(paths, &adjacency()).unwrap()
    }

    pub fn config(ratios: Vec<MaskRatio>) -> InferenceConfig {
        InferenceConfig { mask_ratios: ratios, max_len: 16, ..Default::default() }
    }
}

// ── Ground truth ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod ground_truth {
    use std::io::Cursor;

    use pf_core::{LinkId, PathId};
    use pf_network::IntegrityError;

    use super::helpers::{adjacency, forward, set};
    use crate::{GroundTruthPath, GroundTruthSet, SampleError, load_ground_truth_reader};

    #[test]
    fn accepts_contiguous_paths() {
        let s = set(4, 8);
        assert_eq!(s.len(), 4);
        for p in s.iter() {
            assert!(adjacency().is_contiguous(&p.links));
        }
    }

    #[test]
    fn wrapping_walk_is_contiguous() {
        let p = forward(0, 5, 4);
        assert_eq!(p.links, vec![LinkId(5), LinkId(6), LinkId(1), LinkId(2)]);
    }

    #[test]
    fn rejects_gap() {
        let bad = GroundTruthPath::new(PathId(7), vec![LinkId(1), LinkId(3)]);
        let err = GroundTruthSet::new(vec![bad], &adjacency()).unwrap_err();
        assert!(matches!(
            err,
            SampleError::Integrity(IntegrityError::NotContiguous { path: PathId(7), position: 1, .. })
        ));
    }

    #[test]
    fn rejects_unknown_link_and_empty_path() {
        let unknown = GroundTruthPath::new(PathId(1), vec![LinkId(1), LinkId(999)]);
        assert!(matches!(
            GroundTruthSet::new(vec![unknown], &adjacency()),
            Err(SampleError::Integrity(IntegrityError::UnknownLink { .. }))
        ));
        let empty = GroundTruthPath::new(PathId(2), vec![]);
        assert!(matches!(
            GroundTruthSet::new(vec![empty], &adjacency()),
            Err(SampleError::Integrity(IntegrityError::EmptyPath(PathId(2))))
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let paths = vec![forward(3, 1, 2), forward(3, 2, 2)];
        assert!(matches!(
            GroundTruthSet::new(paths, &adjacency()),
            Err(SampleError::DuplicatePath(PathId(3)))
        ));
    }

    #[test]
    fn u_turn_is_contiguous() {
        // 1 runs 0 → 1, 101 runs 1 → 0.
        let p = GroundTruthPath::new(PathId(0), vec![LinkId(1), LinkId(101)]);
        GroundTruthSet::new(vec![p], &adjacency()).unwrap();
    }

    #[test]
    fn csv_preserves_row_order_per_path() {
        let csv = "path_id,link_id\n1,3\n0,1\n1,4\n0,2\n1,5\n";
        let s = load_ground_truth_reader(Cursor::new(csv), &adjacency()).unwrap();
        assert_eq!(s.ids(), vec![PathId(0), PathId(1)]);
        assert_eq!(s.get(PathId(0)).unwrap().links, vec![LinkId(1), LinkId(2)]);
        assert_eq!(s.get(PathId(1)).unwrap().links, vec![LinkId(3), LinkId(4), LinkId(5)]);
        assert!(s.get(PathId(2)).is_none());
    }

    #[test]
    fn csv_with_broken_path_is_rejected() {
        let csv = "path_id,link_id\n0,1\n0,4\n";
        assert!(matches!(
            load_ground_truth_reader(Cursor::new(csv), &adjacency()),
            Err(SampleError::Integrity(_))
        ));
        let garbage = "path_id,link_id\nx,1\n";
        assert!(matches!(
            load_ground_truth_reader(Cursor::new(garbage), &adjacency()),
            Err(SampleError::Parse(_))
        ));
    }

    #[test]
    fn od_pairs_and_stats() {
        let paths = vec![forward(0, 1, 3), forward(1, 1, 3), forward(2, 2, 5)];
        let s = GroundTruthSet::new(paths, &adjacency()).unwrap();
        assert_eq!(s.od_pairs(), vec![(LinkId(1), LinkId(3)), (LinkId(2), LinkId(6))]);
        let stats = s.length_stats();
        assert_eq!((stats.min, stats.max), (3, 5));
        assert!((stats.mean - 11.0 / 3.0).abs() < 1e-9);
    }
}

// ── Train/test split ──────────────────────────────────────────────────────────

#[cfg(test)]
mod split {
    use pf_core::SampleRng;

    use super::helpers::set;
    use crate::TrainTestSplit;

    #[test]
    fn floor_count_and_disjoint() {
        let s = set(10, 4);
        let split = TrainTestSplit::new(&s, 0.85, &mut SampleRng::new(1));
        assert_eq!(split.train.len(), 8);
        assert_eq!(split.test.len(), 2);
        for id in &split.train {
            assert!(!split.test.contains(id));
        }
        let mut all: Vec<_> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, s.ids());
    }

    #[test]
    fn same_seed_same_split() {
        let s = set(20, 4);
        let a = TrainTestSplit::new(&s, 0.5, &mut SampleRng::new(9));
        let b = TrainTestSplit::new(&s, 0.5, &mut SampleRng::new(9));
        assert_eq!(a, b);
    }

    #[test]
    fn extreme_fractions() {
        let s = set(5, 3);
        let none = TrainTestSplit::new(&s, 0.0, &mut SampleRng::new(0));
        assert!(none.train.is_empty());
        assert_eq!(none.test.len(), 5);
        let all = TrainTestSplit::new(&s, 1.0, &mut SampleRng::new(0));
        assert_eq!(all.train.len(), 5);
        assert!(all.test.is_empty());
    }
}

// ── Observation ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod observe {
    use pf_core::{LinkId, MaskRatio, SampleRng};

    use super::helpers::ring;
    use crate::{DetectorSet, Observation, deploy_detectors, observe_detectors};

    #[test]
    fn ratio_keeps_expected_interior_count() {
        let mut rng = SampleRng::new(3);
        // floor(0.5 * 10) - 2 = 3 interior positions, plus both ends.
        let obs = Observation::with_ratio(10, MaskRatio::Fraction(0.5), &mut rng);
        assert_eq!(obs.observed_count(), 5);
        assert_eq!(obs.masked_count(), 5);
        // floor(0.1 * 10) - 2 clamps to zero.
        let obs = Observation::with_ratio(10, MaskRatio::Fraction(0.9), &mut rng);
        assert_eq!(obs.positions(), &[0, 9]);
    }

    #[test]
    fn endpoints_always_observed() {
        let mut rng = SampleRng::new(11);
        for len in 1..20 {
            for r in [0.1, 0.3, 0.5, 0.7, 0.9] {
                let obs = Observation::with_ratio(len, MaskRatio::Fraction(r), &mut rng);
                assert!(obs.is_observed(0));
                assert!(obs.is_observed(len - 1));
                assert!(obs.positions().windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn od_only_masks_every_interior_position() {
        let mut rng = SampleRng::new(0);
        let obs = Observation::with_ratio(7, MaskRatio::OdOnly, &mut rng);
        assert_eq!(obs.positions(), &[0, 6]);
        assert_eq!(Observation::od_only(1).positions(), &[0]);
        assert!(Observation::od_only(0).positions().is_empty());
    }

    #[test]
    fn from_positions_normalises() {
        let obs = Observation::from_positions(5, [3, 3, 9, 2]);
        assert_eq!(obs.positions(), &[0, 2, 3, 4]);
    }

    #[test]
    fn detector_observation() {
        let det = DetectorSet::new([LinkId(3), LinkId(5)]);
        let links: Vec<LinkId> = (1..=6).map(LinkId).collect();
        let obs = observe_detectors(&links, &det);
        assert_eq!(obs.positions(), &[0, 2, 4, 5]);
    }

    #[test_log::test]
    fn deploy_floor_of_coverage() {
        let net = ring();
        assert_eq!(net.link_count(), 12);
        let det = deploy_detectors(&net, 0.4, &mut SampleRng::new(5));
        assert_eq!(det.len(), 4);
        for l in det.sorted() {
            assert!(net.contains(l));
        }
        assert!(deploy_detectors(&net, 0.0, &mut SampleRng::new(5)).is_empty());
        assert_eq!(deploy_detectors(&net, 1.0, &mut SampleRng::new(5)).len(), 12);
    }
}

// ── Training samples ──────────────────────────────────────────────────────────

#[cfg(test)]
mod sample {
    use pf_core::{LinkId, MaskRatio, Token};

    use super::helpers::forward;
    use crate::{Observation, SampleOrigin, TrainingSample};

    #[test]
    fn one_mask_per_hidden_position() {
        let gt = forward(0, 1, 5);
        let obs = Observation::from_positions(5, [2]);
        let s = TrainingSample::new(&gt, &obs, SampleOrigin::Ratio(MaskRatio::Fraction(0.5)));
        assert_eq!(s.len(), gt.len());
        assert_eq!(s.target, gt.links);
        assert_eq!(
            s.input,
            vec![Token::Link(LinkId(1)), Token::Mask, Token::Link(LinkId(3)), Token::Mask, Token::Link(LinkId(5))]
        );
        assert_eq!(s.masked_positions(), vec![1, 3]);
        assert_eq!(s.anchors(), vec![(0, LinkId(1)), (2, LinkId(3)), (4, LinkId(5))]);
        assert_eq!(s.observed_links(), vec![LinkId(1), LinkId(3), LinkId(5)]);
    }

    #[test]
    fn encode_pads_with_zero() {
        let gt = forward(0, 2, 3);
        let s = TrainingSample::new(&gt, &Observation::od_only(3), SampleOrigin::Ratio(MaskRatio::OdOnly));
        assert_eq!(s.encode(6), vec![2, -1, 4, 0, 0, 0]);
        assert_eq!(s.encode_target(5), vec![2, 3, 4, 0, 0]);
        // Never truncated.
        assert_eq!(s.encode(2).len(), 3);
    }

    #[test]
    fn origin_display() {
        assert_eq!(SampleOrigin::Ratio(MaskRatio::Fraction(0.3)).to_string(), "ratio=0.3");
        assert_eq!(SampleOrigin::Ratio(MaskRatio::OdOnly).to_string(), "ratio=OD");
        assert_eq!(SampleOrigin::Detectors.to_string(), "detectors");
    }
}

// ── SampleGenerator ───────────────────────────────────────────────────────────

#[cfg(test)]
mod generator {
    use pf_core::{InferenceConfig, MaskRatio, PathId, RatioCycle, SampleRng, Token};

    use super::helpers::{adjacency, config, forward, set};
    use crate::{DetectorSet, GroundTruthSet, SampleError, SampleGenerator, SampleOrigin};

    fn ratios() -> Vec<MaskRatio> {
        vec![MaskRatio::Fraction(0.3), MaskRatio::Fraction(0.7), MaskRatio::OdOnly]
    }

    #[test]
    fn rejects_bad_config() {
        let cfg = config(vec![MaskRatio::Fraction(1.5)]);
        assert!(matches!(SampleGenerator::new(&cfg), Err(SampleError::Core(_))));
        let cfg = InferenceConfig { train_fraction: -0.1, ..Default::default() };
        assert!(SampleGenerator::new(&cfg).is_err());
    }

    #[test_log::test]
    fn full_cycle_covers_every_ratio() {
        let s = set(6, 10);
        let g = SampleGenerator::new(&config(ratios())).unwrap();
        let out = g.generate(&s, &s.ids(), &mut SampleRng::new(1));
        assert_eq!(out.len(), 6 * 3);
        // Grouped ratio by ratio.
        assert!(out[..6].iter().all(|x| x.origin == SampleOrigin::Ratio(MaskRatio::Fraction(0.3))));
        assert!(out[12..].iter().all(|x| x.origin == SampleOrigin::Ratio(MaskRatio::OdOnly)));
        for x in &out[12..] {
            assert_eq!(x.mask_count(), 8);
        }
    }

    #[test]
    fn per_sample_cycle_one_each() {
        let s = set(9, 10);
        let cfg = InferenceConfig { ratio_cycle: RatioCycle::PerSample, ..config(ratios()) };
        let g = SampleGenerator::new(&cfg).unwrap();
        let out = g.generate(&s, &s.ids(), &mut SampleRng::new(4));
        assert_eq!(out.len(), 9);
        for x in &out {
            let SampleOrigin::Ratio(r) = x.origin else { panic!("unexpected origin {}", x.origin) };
            assert!(ratios().contains(&r));
        }
    }

    #[test]
    fn anchors_never_masked() {
        let s = set(12, 14);
        let g = SampleGenerator::new(&InferenceConfig { max_len: 16, ..Default::default() }).unwrap();
        for seed in 0..10 {
            for x in g.generate(&s, &s.ids(), &mut SampleRng::new(seed)) {
                assert!(!x.input[0].is_mask());
                assert!(!x.input[x.len() - 1].is_mask());
                assert_eq!(x.input[0], Token::Link(x.target[0]));
            }
        }
    }

    #[test]
    fn skips_paths_over_max_len() {
        let paths = vec![forward(0, 1, 4), forward(1, 1, 20)];
        let s = GroundTruthSet::new(paths, &adjacency()).unwrap();
        let g = SampleGenerator::new(&config(vec![MaskRatio::OdOnly])).unwrap();
        let out = g.generate(&s, &s.ids(), &mut SampleRng::new(0));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].path, PathId(0));
    }

    #[test]
    fn deterministic_for_seed() {
        let s = set(8, 10);
        let g = SampleGenerator::new(&config(ratios())).unwrap();
        let a = g.make_samples(&s, &mut SampleRng::new(77));
        let b = g.make_samples(&s, &mut SampleRng::new(77));
        assert_eq!(a.split, b.split);
        assert_eq!(a.train, b.train);
        assert_eq!(a.test, b.test);
    }

    #[test]
    fn make_samples_respects_split() {
        let s = set(10, 10);
        let g = SampleGenerator::new(&config(ratios())).unwrap();
        let sets = g.make_samples(&s, &mut SampleRng::new(2));
        assert_eq!(sets.split.train.len(), 8);
        assert!(sets.train.iter().all(|x| sets.split.train.contains(&x.path)));
        assert!(sets.test.iter().all(|x| sets.split.test.contains(&x.path)));
        assert_eq!(sets.train.len(), 8 * 3);
        assert_eq!(sets.test.len(), 2 * 3);
    }

    #[test]
    fn detector_and_complete_samples() {
        let s = set(2, 6);
        let g = SampleGenerator::new(&config(ratios())).unwrap();
        let det = DetectorSet::default();
        let obs = g.observe_with(&s, &s.ids(), &det);
        assert!(obs.iter().all(|x| x.origin == SampleOrigin::Detectors && x.mask_count() == 4));
        let full = g.complete(&s, &s.ids());
        assert!(full.iter().all(|x| x.mask_count() == 0));
    }
}

// ── Regeneration ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod regen {
    use pf_core::{MaskRatio, RegenerationConfig, SampleRng};

    use super::helpers::{config, set};
    use crate::{Regenerator, SampleGenerator};

    fn schedule() -> Option<RegenerationConfig> {
        Some(RegenerationConfig { interval_epochs: 5, iterations: 3 })
    }

    #[test_log::test]
    fn yields_configured_rounds() {
        let s = set(10, 12);
        let g = SampleGenerator::new(&config(vec![MaskRatio::Fraction(0.5)])).unwrap();
        let rounds: Vec<_> = Regenerator::new(&g, &s, s.ids(), schedule(), &mut SampleRng::new(1)).collect();
        assert_eq!(rounds.len(), 3);
        assert_eq!(rounds.iter().map(|r| r.start_epoch).collect::<Vec<_>>(), vec![0, 5, 10]);
        assert!(rounds.iter().all(|r| r.epochs == Some(5) && r.samples.len() == 10));
    }

    #[test]
    fn rounds_draw_fresh_masks() {
        let s = set(10, 12);
        let g = SampleGenerator::new(&config(vec![MaskRatio::Fraction(0.5)])).unwrap();
        let rounds: Vec<_> = Regenerator::new(&g, &s, s.ids(), schedule(), &mut SampleRng::new(1)).collect();
        assert_ne!(rounds[0].samples, rounds[1].samples);
        assert_ne!(rounds[1].samples, rounds[2].samples);
        // Targets are the same paths each round.
        let targets = |i: usize| rounds[i].samples.iter().map(|x| x.target.clone()).collect::<Vec<_>>();
        assert_eq!(targets(0), targets(2));
    }

    #[test]
    fn schedule_reproducible_from_seed() {
        let s = set(6, 12);
        let g = SampleGenerator::new(&config(vec![MaskRatio::Fraction(0.5)])).unwrap();
        let a: Vec<_> = Regenerator::new(&g, &s, s.ids(), schedule(), &mut SampleRng::new(8))
            .map(|r| r.samples)
            .collect();
        let b: Vec<_> = Regenerator::new(&g, &s, s.ids(), schedule(), &mut SampleRng::new(8))
            .map(|r| r.samples)
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn disabled_regeneration_is_one_round() {
        let s = set(3, 6);
        let g = SampleGenerator::new(&config(vec![MaskRatio::OdOnly])).unwrap();
        let mut it = Regenerator::new(&g, &s, s.ids(), None, &mut SampleRng::new(0));
        assert_eq!(it.len(), 1);
        let only = it.next().unwrap();
        assert_eq!(only.epochs, None);
        assert!(it.next().is_none());
    }
}

// ── Synthetic paths ───────────────────────────────────────────────────────────

#[cfg(test)]
mod synthetic {
    use pf_core::{PathId, SampleRng};
    use pf_network::AdjacencyIndex;

    use super::helpers::adjacency;
    use crate::{GroundTruthSet, random_walk_paths};

    #[test]
    fn walks_are_valid_ground_truth() {
        let adj = adjacency();
        let paths = random_walk_paths(&adj, 25, 4, 9, &mut SampleRng::new(42));
        assert_eq!(paths.len(), 25);
        assert_eq!(paths[24].id, PathId(24));
        for p in &paths {
            assert!((4..=9).contains(&p.len()), "length {}", p.len());
        }
        GroundTruthSet::new(paths, &adj).unwrap();
    }

    #[test]
    fn walks_avoid_recent_links() {
        let adj = adjacency();
        for p in random_walk_paths(&adj, 30, 6, 12, &mut SampleRng::new(7)) {
            for w in p.links.windows(4) {
                for i in 0..4 {
                    for j in i + 1..4 {
                        assert_ne!(w[i], w[j], "{:?}", p.links);
                    }
                }
            }
        }
    }

    #[test]
    fn empty_adjacency_yields_nothing() {
        let adj = AdjacencyIndex::default();
        assert!(random_walk_paths(&adj, 5, 2, 4, &mut SampleRng::new(0)).is_empty());
    }
}
