//! Protein pairwise alignment.
//!
//! The chaining engine only talks to the [`PairwiseAligner`] trait. The
//! default [`SubstitutionAligner`] runs affine-gap alignments with BLOSUM62
//! through `bio::alignment::pairwise`.

use std::borrow::Cow;
use std::sync::atomic::{AtomicU64, Ordering};

use bio::alignment::pairwise::Aligner;
use bio::alignment::AlignmentOperation;
use bio::scores::blosum62;

use crate::config::ScoringConfig;
use crate::constants::GAP;

/// Result of a pairwise protein alignment.
///
/// Coordinates are 0-based half-open into the unaligned inputs; the aligned
/// strings cover exactly `x[x_start..x_end]` and `y[y_start..y_end]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairwiseAlignment {
    pub score: i64,
    pub x_start: usize,
    pub x_end: usize,
    pub y_start: usize,
    pub y_end: usize,
    pub aligned_x: Vec<u8>,
    pub aligned_y: Vec<u8>,
}

impl PairwiseAlignment {
    fn empty() -> Self {
        Self {
            score: 0,
            x_start: 0,
            x_end: 0,
            y_start: 0,
            y_end: 0,
            aligned_x: Vec::new(),
            aligned_y: Vec::new(),
        }
    }
}

/// Protein alignment collaborator.
///
/// Scores are "higher is better"; gap costs are positive.
pub trait PairwiseAligner: Send + Sync {
    /// Substitution score of residues `a` and `b`
    fn substitution(&self, a: u8, b: u8) -> i64;

    /// Affine cost of a gap of `length` residues (0 for an empty gap)
    fn gap_cost(&self, length: usize) -> i64;

    /// Global (end-to-end) alignment of `x` and `y`
    fn global(&self, x: &[u8], y: &[u8]) -> PairwiseAlignment;

    /// Best local alignment of `x` and `y`
    fn local(&self, x: &[u8], y: &[u8]) -> PairwiseAlignment;

    /// Global alignment score only
    fn global_score(&self, x: &[u8], y: &[u8]) -> i64 {
        self.global(x, y).score
    }

    /// Score of two aligned strings column by column.
    fn score_columns(&self, aligned_x: &[u8], aligned_y: &[u8]) -> i64 {
        let mut score = 0;
        let mut x_gap = 0;
        let mut y_gap = 0;
        for (&a, &b) in aligned_x.iter().zip(aligned_y) {
            if a == GAP {
                x_gap += 1;
                score -= self.gap_cost(y_gap);
                y_gap = 0;
            } else if b == GAP {
                y_gap += 1;
                score -= self.gap_cost(x_gap);
                x_gap = 0;
            } else {
                score -= self.gap_cost(x_gap) + self.gap_cost(y_gap);
                x_gap = 0;
                y_gap = 0;
                score += self.substitution(a, b);
            }
        }
        score - self.gap_cost(x_gap) - self.gap_cost(y_gap)
    }
}

/// Residues the BLOSUM62 table knows; everything else is scored as `X`.
fn sanitize(sequence: &[u8]) -> Cow<'_, [u8]> {
    let known = |r: u8| r.is_ascii_uppercase() || r == b'*';
    if sequence.iter().all(|&r| known(r)) {
        Cow::Borrowed(sequence)
    } else {
        Cow::Owned(
            sequence
                .iter()
                .map(|&r| {
                    let upper = r.to_ascii_uppercase();
                    if known(upper) {
                        upper
                    } else {
                        b'X'
                    }
                })
                .collect(),
        )
    }
}

/// Affine-gap BLOSUM62 aligner backed by `bio`.
///
/// # Examples
///
/// ```rust
/// use exonchain_core::align::{PairwiseAligner, SubstitutionAligner};
///
/// let aligner = SubstitutionAligner::new(11, 1);
/// assert_eq!(aligner.global_score(b"W", b"W"), 11);
/// assert_eq!(aligner.global_score(b"", b"WW"), -13);
/// ```
#[derive(Debug)]
pub struct SubstitutionAligner {
    gap_opening: i32,
    gap_extension: i32,
    alignments: AtomicU64,
}

impl SubstitutionAligner {
    #[must_use]
    pub const fn new(gap_opening: i32, gap_extension: i32) -> Self {
        Self {
            gap_opening,
            gap_extension,
            alignments: AtomicU64::new(0),
        }
    }

    /// Aligner using the gap costs of `scoring`
    #[must_use]
    pub fn from_scoring(scoring: &ScoringConfig) -> Self {
        let clamp = |v: i64| i32::try_from(v).unwrap_or(i32::MAX);
        Self::new(clamp(scoring.gap_opening), clamp(scoring.gap_extension))
    }

    /// Number of alignments computed so far
    #[must_use]
    pub fn alignments(&self) -> u64 {
        self.alignments.load(Ordering::Relaxed)
    }

    fn one_sided(&self, x: &[u8], y: &[u8]) -> PairwiseAlignment {
        let mut alignment = PairwiseAlignment::empty();
        alignment.x_end = x.len();
        alignment.y_end = y.len();
        alignment.score = -self.gap_cost(x.len().max(y.len()));
        alignment.aligned_x = if x.is_empty() {
            vec![GAP; y.len()]
        } else {
            x.to_vec()
        };
        alignment.aligned_y = if y.is_empty() {
            vec![GAP; x.len()]
        } else {
            y.to_vec()
        };
        alignment
    }

    fn convert(x: &[u8], y: &[u8], raw: &bio::alignment::Alignment) -> PairwiseAlignment {
        let mut aligned_x = Vec::with_capacity(raw.operations.len());
        let mut aligned_y = Vec::with_capacity(raw.operations.len());
        let (mut i, mut j) = (raw.xstart, raw.ystart);
        for op in &raw.operations {
            match op {
                AlignmentOperation::Match | AlignmentOperation::Subst => {
                    aligned_x.push(x[i]);
                    aligned_y.push(y[j]);
                    i += 1;
                    j += 1;
                }
                AlignmentOperation::Ins => {
                    aligned_x.push(x[i]);
                    aligned_y.push(GAP);
                    i += 1;
                }
                AlignmentOperation::Del => {
                    aligned_x.push(GAP);
                    aligned_y.push(y[j]);
                    j += 1;
                }
                AlignmentOperation::Xclip(_) | AlignmentOperation::Yclip(_) => {}
            }
        }
        PairwiseAlignment {
            score: i64::from(raw.score),
            x_start: raw.xstart,
            x_end: raw.xend,
            y_start: raw.ystart,
            y_end: raw.yend,
            aligned_x,
            aligned_y,
        }
    }
}

impl Default for SubstitutionAligner {
    fn default() -> Self {
        Self::from_scoring(&ScoringConfig::default())
    }
}

impl PairwiseAligner for SubstitutionAligner {
    fn substitution(&self, a: u8, b: u8) -> i64 {
        let a = sanitize(std::slice::from_ref(&a))[0];
        let b = sanitize(std::slice::from_ref(&b))[0];
        i64::from(blosum62(a, b))
    }

    fn gap_cost(&self, length: usize) -> i64 {
        if length == 0 {
            0
        } else {
            i64::from(self.gap_opening) + i64::from(self.gap_extension) * length as i64
        }
    }

    fn global(&self, x: &[u8], y: &[u8]) -> PairwiseAlignment {
        self.alignments.fetch_add(1, Ordering::Relaxed);
        if x.is_empty() || y.is_empty() {
            return self.one_sided(x, y);
        }
        let (x, y) = (sanitize(x), sanitize(y));
        let mut aligner = Aligner::with_capacity(
            x.len(),
            y.len(),
            -self.gap_opening,
            -self.gap_extension,
            |a: u8, b: u8| blosum62(a, b),
        );
        let raw = aligner.global(&x, &y);
        Self::convert(&x, &y, &raw)
    }

    fn local(&self, x: &[u8], y: &[u8]) -> PairwiseAlignment {
        self.alignments.fetch_add(1, Ordering::Relaxed);
        if x.is_empty() || y.is_empty() {
            return PairwiseAlignment::empty();
        }
        let (x, y) = (sanitize(x), sanitize(y));
        let mut aligner = Aligner::with_capacity(
            x.len(),
            y.len(),
            -self.gap_opening,
            -self.gap_extension,
            |a: u8, b: u8| blosum62(a, b),
        );
        let raw = aligner.local(&x, &y);
        Self::convert(&x, &y, &raw)
    }
}

/// Wrapper that counts the alignments of one unit of work.
pub struct CountingAligner<'a> {
    inner: &'a dyn PairwiseAligner,
    count: AtomicU64,
}

impl<'a> CountingAligner<'a> {
    #[must_use]
    pub fn new(inner: &'a dyn PairwiseAligner) -> Self {
        Self {
            inner,
            count: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

impl PairwiseAligner for CountingAligner<'_> {
    fn substitution(&self, a: u8, b: u8) -> i64 {
        self.inner.substitution(a, b)
    }

    fn gap_cost(&self, length: usize) -> i64 {
        self.inner.gap_cost(length)
    }

    fn global(&self, x: &[u8], y: &[u8]) -> PairwiseAlignment {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.inner.global(x, y)
    }

    fn local(&self, x: &[u8], y: &[u8]) -> PairwiseAlignment {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.inner.local(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_aligner() -> SubstitutionAligner {
        SubstitutionAligner::new(11, 1)
    }

    #[test]
    fn test_global_self_alignment() {
        let aligner = create_test_aligner();
        let alignment = aligner.global(b"WKDF", b"WKDF");
        assert_eq!(alignment.score, 11 + 5 + 6 + 6);
        assert_eq!(alignment.aligned_x, b"WKDF".to_vec());
        assert_eq!(alignment.aligned_y, b"WKDF".to_vec());
    }

    #[test]
    fn test_global_with_gap() {
        let aligner = create_test_aligner();
        let alignment = aligner.global(b"WWKWW", b"WWWW");
        assert_eq!(alignment.score, 4 * 11 - 12);
        assert_eq!(alignment.aligned_y, b"WW-WW".to_vec());
        assert_eq!(
            aligner.score_columns(&alignment.aligned_x, &alignment.aligned_y),
            alignment.score
        );
    }

    #[test]
    fn test_empty_sequences() {
        let aligner = create_test_aligner();
        assert_eq!(aligner.global_score(b"", b""), 0);
        assert_eq!(aligner.global_score(b"ACD", b""), -14);
        assert_eq!(aligner.local(b"", b"ACD").score, 0);
    }

    #[test]
    fn test_local_alignment_coordinates() {
        let aligner = create_test_aligner();
        let alignment = aligner.local(b"WCHW", b"PPPWCHWPPP");
        assert_eq!(alignment.score, 11 + 9 + 8 + 11);
        assert_eq!((alignment.x_start, alignment.x_end), (0, 4));
        assert_eq!((alignment.y_start, alignment.y_end), (3, 7));
        assert_eq!(alignment.aligned_y, b"WCHW".to_vec());
    }

    #[test]
    fn test_unknown_residues_are_scored_as_x() {
        let aligner = create_test_aligner();
        assert_eq!(aligner.substitution(b'#', b'A'), aligner.substitution(b'X', b'A'));
        assert_eq!(aligner.global_score(b"w", b"W"), 11);
    }

    #[test]
    fn test_counting_aligner() {
        let aligner = create_test_aligner();
        let counting = CountingAligner::new(&aligner);
        counting.global(b"W", b"W");
        counting.local(b"W", b"W");
        assert_eq!(counting.count(), 2);
        assert_eq!(aligner.alignments(), 2);
    }
}
