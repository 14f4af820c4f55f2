use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CONTIG_THRESHOLD, DEFAULT_GAP_EXTENSION, DEFAULT_GAP_OPENING, DEFAULT_HIT_THRESHOLD,
    DEFAULT_INTRON_GAIN_LOSS, DEFAULT_MAX_GAP, DEFAULT_MAX_INTRON_LENGTH, DEFAULT_PREDICTIONS,
    DEFAULT_REGION_THRESHOLD, DEFAULT_TIMEOUT_SECONDS, MIN_INTRON_LENGTH,
};
use crate::types::ChainError;

/// Scoring parameters shared by the DP passes, the junction scorer and the
/// pairwise aligner.
///
/// # Examples
///
/// ```rust
/// use exonchain_core::config::ScoringConfig;
///
/// let scoring = ScoringConfig::default();
/// // Skipping 10 reference residues and one part boundary
/// assert_eq!(scoring.gap_cost(10, 1), -(11 + 10) - 25);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Maximum intron length in base pairs.
    ///
    /// Bounds the genomic distance between consecutive hits of a chain
    /// (multiplied by the number of part boundaries crossed), the length of
    /// translated splice-site extensions and the gap recovery windows.
    ///
    /// **Default**: `15000`
    pub max_intron_length: i64,

    /// Exclusive upper bound on the part distance of one DP jump.
    ///
    /// Continuations of a hit of part `i` are searched in parts
    /// `i..i + max_gap`, so up to `max_gap - 2` parts may be skipped at once.
    ///
    /// **Default**: `5`
    pub max_gap: usize,

    /// Affine gap opening cost (positive).
    ///
    /// **Default**: `11`
    pub gap_opening: i64,

    /// Affine gap extension cost per residue (positive).
    ///
    /// **Default**: `1`
    pub gap_extension: i64,

    /// Penalty for every reference part boundary that is not realized as an
    /// intron, or every intron without a reference counterpart.
    ///
    /// **Default**: `25`
    pub intron_gain_loss: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_intron_length: DEFAULT_MAX_INTRON_LENGTH,
            max_gap: DEFAULT_MAX_GAP,
            gap_opening: DEFAULT_GAP_OPENING,
            gap_extension: DEFAULT_GAP_EXTENSION,
            intron_gain_loss: DEFAULT_INTRON_GAIN_LOSS,
        }
    }
}

impl ScoringConfig {
    /// Minimum intron length; not configurable.
    #[must_use]
    pub const fn min_intron_length(&self) -> i64 {
        MIN_INTRON_LENGTH
    }

    /// Cost (as a non-positive score) of leaving `length` reference residues
    /// unaligned while skipping `boundaries` part boundaries.
    #[must_use]
    pub const fn gap_cost(&self, length: usize, boundaries: i64) -> i64 {
        let affine = if length > 0 {
            self.gap_opening + self.gap_extension * length as i64
        } else {
            0
        };
        -affine - boundaries * self.intron_gain_loss
    }

    fn validate(&self) -> Result<(), ChainError> {
        if self.max_intron_length < MIN_INTRON_LENGTH {
            return Err(ChainError::InvalidConfig(format!(
                "max_intron_length {} is below the minimum intron length {MIN_INTRON_LENGTH}",
                self.max_intron_length
            )));
        }
        if self.max_gap == 0 {
            return Err(ChainError::InvalidConfig(
                "max_gap must be at least 1".to_string(),
            ));
        }
        if self.gap_opening < 0 || self.gap_extension < 0 || self.intron_gain_loss < 0 {
            return Err(ChainError::InvalidConfig(
                "gap and intron costs must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration settings for transcript prediction.
///
/// All fields have defaults, so partial configurations deserialize.
///
/// # Examples
///
/// ```rust
/// use exonchain_core::config::PredictorConfig;
///
/// let config = PredictorConfig {
///     predictions: 3,
///     num_threads: Some(4),
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Scoring parameters.
    pub scoring: ScoringConfig,

    /// Fraction of the best coarse score a contig/strand needs to be analysed
    /// in detail.
    ///
    /// **Default**: `0.9`
    pub contig_threshold: f64,

    /// Fraction of the best coarse score a segmented region needs to be
    /// analysed on its own.
    ///
    /// **Default**: `0.9`
    pub region_threshold: f64,

    /// Fraction of the best score a hit needs to survive the coarse reduction,
    /// and a recovered candidate needs to be kept.
    ///
    /// **Default**: `0.9`
    pub hit_threshold: f64,

    /// Number of predictions reported per transcript.
    ///
    /// **Default**: `1`
    pub predictions: usize,

    /// Per-transcript timeout in seconds. `None` disables the deadline.
    ///
    /// **Default**: `Some(3600)`
    pub timeout_seconds: Option<u64>,

    /// Split hits at in-frame stop codons of the target after the coarse
    /// reduction.
    ///
    /// **Default**: `true`
    pub avoid_stop: bool,

    /// Number of threads for the predictor's pool.
    ///
    /// When `None`, the global rayon pool is used.
    ///
    /// **Default**: `None`
    pub num_threads: Option<usize>,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            contig_threshold: DEFAULT_CONTIG_THRESHOLD,
            region_threshold: DEFAULT_REGION_THRESHOLD,
            hit_threshold: DEFAULT_HIT_THRESHOLD,
            predictions: DEFAULT_PREDICTIONS,
            timeout_seconds: Some(DEFAULT_TIMEOUT_SECONDS),
            avoid_stop: true,
            num_threads: None,
        }
    }
}

impl PredictorConfig {
    /// Check that all values are in range.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::InvalidConfig`] for thresholds outside `[0, 1]`,
    /// zero predictions or threads, or out-of-range scoring parameters.
    pub fn validate(&self) -> Result<(), ChainError> {
        self.scoring.validate()?;
        for (name, value) in [
            ("contig_threshold", self.contig_threshold),
            ("region_threshold", self.region_threshold),
            ("hit_threshold", self.hit_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ChainError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.predictions == 0 {
            return Err(ChainError::InvalidConfig(
                "predictions must be at least 1".to_string(),
            ));
        }
        if self.num_threads == Some(0) {
            return Err(ChainError::InvalidConfig(
                "num_threads must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
