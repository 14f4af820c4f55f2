use std::fmt;

use bio::bio_types::strand::Strand;
use thiserror::Error;

/// Per-frame buckets, indexed by `offset mod 3`.
pub type FrameBuckets<T> = [Vec<T>; 3];

/// Half-open interval on the transcribed strand of one contig.
///
/// Oriented positions are 0-based and grow in transcription direction, so
/// "downstream" always means "larger" regardless of the genomic strand.
///
/// # Examples
///
/// ```rust
/// use exonchain_core::types::OrientedSpan;
///
/// let span = OrientedSpan::new(10, 40);
/// assert_eq!(span.len(), 30);
/// assert!(span.overlaps(&OrientedSpan::new(39, 50)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrientedSpan {
    /// First position (inclusive)
    pub start: i64,
    /// Last position (exclusive)
    pub end: i64,
}

impl OrientedSpan {
    #[must_use]
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn len(&self) -> i64 {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Intron variants tried when two hits are fused.
///
/// The three intron phases give the number of bases of the split codon that
/// sit on the downstream exon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpliceType {
    /// Intron between two codons
    Phase0,
    /// One base of the split codon on the downstream exon
    Phase1,
    /// Two bases of the split codon on the downstream exon
    Phase2,
    /// Both hits are fused without an intron
    IntronLoss,
}

impl SpliceType {
    /// Convert splice type to array index
    #[must_use]
    pub const fn to_index(self) -> usize {
        match self {
            Self::Phase0 => 0,
            Self::Phase1 => 1,
            Self::Phase2 => 2,
            Self::IntronLoss => 3,
        }
    }

    /// Intron phase for the number of split-codon bases on the downstream exon
    #[must_use]
    pub const fn from_phase(phase: usize) -> Option<Self> {
        match phase {
            0 => Some(Self::Phase0),
            1 => Some(Self::Phase1),
            2 => Some(Self::Phase2),
            _ => None,
        }
    }
}

/// Set of splice types tried in one stage of junction scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpliceTypeSet([bool; 4]);

impl SpliceTypeSet {
    /// All intron phases plus intron loss
    #[must_use]
    pub const fn all() -> Self {
        Self([true; 4])
    }

    /// All three intron phases
    #[must_use]
    pub const fn introns() -> Self {
        Self([true, true, true, false])
    }

    /// Intron loss only
    #[must_use]
    pub const fn intron_loss() -> Self {
        Self([false, false, false, true])
    }

    /// A single intron phase
    #[must_use]
    pub fn only(splice_type: SpliceType) -> Self {
        let mut set = [false; 4];
        set[splice_type.to_index()] = true;
        Self(set)
    }

    #[must_use]
    pub const fn contains(&self, splice_type: SpliceType) -> bool {
        self.0[splice_type.to_index()]
    }

    /// Whether the set contains the intron phase `phase`
    #[must_use]
    pub const fn contains_phase(&self, phase: usize) -> bool {
        phase < 3 && self.0[phase]
    }

    /// Whether any intron phase is part of the set
    #[must_use]
    pub const fn has_introns(&self) -> bool {
        self.0[0] || self.0[1] || self.0[2]
    }
}

/// Single-character strand symbol used in notes and logs.
#[must_use]
pub const fn strand_symbol(strand: Strand) -> char {
    match strand {
        Strand::Forward => '+',
        Strand::Reverse => '-',
        Strand::Unknown => '.',
    }
}

/// Error types that can occur while chaining hits into gene models.
///
/// # Examples
///
/// ```rust
/// use exonchain_core::types::ChainError;
///
/// let error = ChainError::InvalidHit("empty alignment".to_string());
/// assert_eq!(error.to_string(), "Invalid hit: empty alignment");
/// ```
#[derive(Error, Debug)]
pub enum ChainError {
    /// Hit that violates the alignment invariants
    #[error("Invalid hit: {0}")]
    InvalidHit(String),

    /// Transcript without parts or with malformed reference proteins
    #[error("Invalid transcript: {0}")]
    InvalidTranscript(String),

    /// Contig that is not present in the genome
    #[error("Unknown contig: {0}")]
    UnknownContig(String),

    /// Codon that does not translate unambiguously
    #[error("Translation error: {0}")]
    Translation(String),

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Per-transcript deadline expired
    #[error("Timeout after {seconds} s while processing {transcript}")]
    Timeout { transcript: String, seconds: u64 },

    /// Thread pool could not be built
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// I/O errors from file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse errors from input files
    #[error("Parse error: {0}")]
    Parse(String),
}

impl fmt::Display for SpliceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Phase0 => write!(f, "phase 0"),
            Self::Phase1 => write!(f, "phase 1"),
            Self::Phase2 => write!(f, "phase 2"),
            Self::IntronLoss => write!(f, "intron loss"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oriented_span_overlap() {
        let span = OrientedSpan::new(0, 30);
        assert!(span.overlaps(&OrientedSpan::new(29, 31)));
        assert!(!span.overlaps(&OrientedSpan::new(30, 60)));
        assert_eq!(span.len(), 30);
        assert!(OrientedSpan::new(5, 5).is_empty());
    }

    #[test]
    fn test_splice_type_set() {
        let introns = SpliceTypeSet::introns();
        assert!(introns.has_introns());
        assert!(!introns.contains(SpliceType::IntronLoss));

        let loss = SpliceTypeSet::intron_loss();
        assert!(!loss.has_introns());
        assert!(loss.contains(SpliceType::IntronLoss));

        let phase = SpliceTypeSet::only(SpliceType::Phase2);
        assert!(phase.contains_phase(2));
        assert!(!phase.contains_phase(0));
        assert!(!phase.contains_phase(3));
    }

    #[test]
    fn test_splice_type_from_phase() {
        assert_eq!(SpliceType::from_phase(1), Some(SpliceType::Phase1));
        assert_eq!(SpliceType::from_phase(3), None);
    }

    #[test]
    fn test_error_display() {
        let error = ChainError::Timeout {
            transcript: "t1".to_string(),
            seconds: 5,
        };
        assert_eq!(error.to_string(), "Timeout after 5 s while processing t1");
    }

    #[test]
    fn test_strand_symbol() {
        assert_eq!(strand_symbol(Strand::Forward), '+');
        assert_eq!(strand_symbol(Strand::Reverse), '-');
    }
}
