use crate::types::FrameBuckets;

/// Candidate exon boundary relative to a hit boundary.
///
/// A positive `offset` extends the exon by that many bases, a negative one
/// trims it. `score` is the global alignment score of the moved exon against
/// the reference minus the hit's own score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpliceCandidate {
    pub offset: i64,
    pub score: i64,
}

/// Extension of a first/last hit to a start or stop codon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodonExtension {
    /// Residues added (positive) or removed (negative) at the hit boundary
    pub offset: i64,
    /// Score differential of the extended hit
    pub score: i64,
    /// First residue of the extended translation (start extensions only)
    pub first_residue: Option<u8>,
}

/// Splice-site candidates and border extensions of one hit.
///
/// Built once per hit by the [`SpliceFinder`](super::SpliceFinder) and
/// shared read-only between DP generations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpliceProfile {
    /// Acceptor candidates bucketed by `offset mod 3`
    pub acceptors: FrameBuckets<SpliceCandidate>,
    /// Donor candidates per motif list (primary, secondary) and frame
    pub donors: [FrameBuckets<SpliceCandidate>; 2],
    /// Translated genomic extension upstream of the hit, in transcription order
    pub upstream: Vec<u8>,
    /// Translated genomic extension downstream of the hit
    pub downstream: Vec<u8>,
    /// Bases upstream of the hit without an in-frame stop
    pub open_upstream: i64,
    /// Bases downstream of the hit without an in-frame stop
    pub open_downstream: i64,
    /// Start-codon extension for hits of the first part
    pub start: Option<CodonExtension>,
    /// Stop-codon extension for hits of the last part
    pub stop: Option<CodonExtension>,
    /// Acceptors come from known introns
    pub acceptor_evidence: bool,
    /// Donors come from known introns
    pub donor_evidence: bool,
}

impl SpliceProfile {
    /// Score differential of the start extension, 0 without one
    #[must_use]
    pub fn start_score(&self) -> i64 {
        self.start.map_or(0, |e| e.score)
    }

    /// Score differential of the stop extension, 0 without one
    #[must_use]
    pub fn stop_score(&self) -> i64 {
        self.stop.map_or(0, |e| e.score)
    }

    #[must_use]
    pub fn first_residue(&self) -> Option<u8> {
        self.start.and_then(|e| e.first_residue)
    }

    #[must_use]
    pub fn acceptor_count(&self) -> usize {
        self.acceptors.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn donor_count(&self) -> usize {
        self.donors.iter().flatten().map(Vec::len).sum()
    }
}
