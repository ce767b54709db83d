//! Inference configuration.
//!
//! `InferenceConfig` is an immutable value handed to each component's
//! constructor.  Nothing in the workspace reads configuration from ambient
//! state.  Call [`InferenceConfig::validate`] once at startup; every
//! constructor that accepts a config also validates it.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── MaskRatio ─────────────────────────────────────────────────────────────────

/// How much of a ground-truth path is hidden when building a training sample.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MaskRatio {
    /// Expected fraction of positions masked, strictly inside (0, 1).
    Fraction(f64),
    /// Only origin and destination are visible.
    OdOnly,
}

impl MaskRatio {
    fn validate(self) -> CoreResult<()> {
        match self {
            MaskRatio::Fraction(r) if r > 0.0 && r < 1.0 => Ok(()),
            MaskRatio::Fraction(r) => Err(CoreError::Config(format!(
                "mask ratio {r} must lie strictly between 0 and 1"
            ))),
            MaskRatio::OdOnly => Ok(()),
        }
    }
}

impl fmt::Display for MaskRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaskRatio::Fraction(r) => write!(f, "{r}"),
            MaskRatio::OdOnly => f.write_str("OD"),
        }
    }
}

// ── Small policy enums ────────────────────────────────────────────────────────

/// Which ratios a regeneration round applies to each ground-truth path.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RatioCycle {
    /// One sample per path per configured ratio.
    #[default]
    Full,
    /// One sample per path, ratio drawn uniformly from the configured set.
    PerSample,
}

/// How the decoder interprets masked positions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GapMode {
    /// Each mask stands for exactly one link; anchors keep their index.
    #[default]
    Exact,
    /// A run of masks is a gap of unknown length, bounded only by `max_len`.
    Flexible,
}

/// Periodic regeneration of the training set.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegenerationConfig {
    /// Epochs trained on one draw before the next draw.
    pub interval_epochs: u32,
    /// Number of draws.
    pub iterations: u32,
}

// ── InferenceConfig ───────────────────────────────────────────────────────────

/// Every tunable the core consumes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InferenceConfig {
    /// Upper bound on sample and inferred path length, in links.
    pub max_len: usize,

    /// Ratios to cycle through when masking.  Fixed for the whole run.
    pub mask_ratios: Vec<MaskRatio>,

    pub ratio_cycle: RatioCycle,

    /// Fraction of ground-truth paths assigned to the training set.
    pub train_fraction: f64,

    /// Number of candidate paths kept per (source, target) pair.
    pub k_paths: usize,

    /// Substitute candidate-table paths when model decoding is invalid.
    pub fallback: bool,

    pub gap_mode: GapMode,

    /// Fraction of links instrumented with a detector during evaluation.
    pub avi_coverage: f64,

    /// `None` draws the training set once.
    pub regeneration: Option<RegenerationConfig>,

    /// Master RNG seed.  The same seed always produces identical samples.
    pub seed: u64,

    /// Log batch progress every N decoded samples.
    pub progress_interval: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            max_len:        30,
            mask_ratios:    vec![
                MaskRatio::Fraction(0.1),
                MaskRatio::Fraction(0.3),
                MaskRatio::Fraction(0.5),
                MaskRatio::Fraction(0.7),
                MaskRatio::Fraction(0.9),
                MaskRatio::OdOnly,
            ],
            ratio_cycle:    RatioCycle::Full,
            train_fraction: 0.8,
            k_paths:        3,
            fallback:       false,
            gap_mode:       GapMode::Exact,
            avi_coverage:   0.4,
            regeneration:   Some(RegenerationConfig { interval_epochs: 100, iterations: 10 }),
            seed:           42,
            progress_interval: 100,
        }
    }
}

impl InferenceConfig {
    /// Reject contradictory settings.
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_len < 2 {
            return Err(CoreError::Config(format!(
                "max_len {} cannot hold an origin and a destination",
                self.max_len
            )));
        }
        if self.mask_ratios.is_empty() {
            return Err(CoreError::Config("mask ratio set is empty".into()));
        }
        for ratio in &self.mask_ratios {
            ratio.validate()?;
        }
        if !(0.0..=1.0).contains(&self.train_fraction) {
            return Err(CoreError::Config(format!(
                "train fraction {} outside [0, 1]",
                self.train_fraction
            )));
        }
        if self.k_paths == 0 {
            return Err(CoreError::Config("k_paths must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.avi_coverage) {
            return Err(CoreError::Config(format!(
                "AVI coverage {} outside [0, 1]",
                self.avi_coverage
            )));
        }
        if let Some(regen) = self.regeneration {
            if regen.interval_epochs == 0 || regen.iterations == 0 {
                return Err(CoreError::Config(
                    "regeneration interval and iteration count must be non-zero".into(),
                ));
            }
        }
        Ok(())
    }

    /// `validate` by value, for builder-style call sites.
    pub fn validated(self) -> CoreResult<Self> {
        self.validate()?;
        Ok(self)
    }

    /// `true` when the ratio set contains the OD-only regime.
    pub fn includes_od_only(&self) -> bool {
        self.mask_ratios.contains(&MaskRatio::OdOnly)
    }

    /// Total training epochs implied by the regeneration schedule, if any.
    pub fn total_epochs(&self) -> Option<u64> {
        self.regeneration
            .map(|r| r.interval_epochs as u64 * r.iterations as u64)
    }
}
