use std::sync::Arc;

use crate::align::PairwiseAligner;
use crate::config::ScoringConfig;
use crate::hit::{Hit, Transcript};
use crate::sequence::{GeneticCode, OrientedContig};
use crate::splice::{SpliceFinder, SpliceProfile, SpliceSiteModel};
use crate::types::{ChainError, OrientedSpan};

/// Everything a pass over one contig/strand needs besides its hits.
#[derive(Clone, Copy)]
pub struct ChainContext<'a> {
    pub transcript: &'a Transcript,
    pub scoring: &'a ScoringConfig,
    pub contig: &'a OrientedContig<'a>,
    pub aligner: &'a dyn PairwiseAligner,
    pub code: &'a GeneticCode,
    pub splice_model: &'a SpliceSiteModel,
}

impl ChainContext<'_> {
    /// Number of parts of the transcript
    #[must_use]
    pub fn parts(&self) -> usize {
        self.transcript.len()
    }
}

/// A hit prepared for one pass: its oriented span and, once computed, its
/// splice profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub hit: Hit,
    pub span: OrientedSpan,
    pub profile: Option<Arc<SpliceProfile>>,
}

/// Candidates of one pass indexed by part.
pub type PartCandidates = Vec<Vec<Candidate>>;

impl Candidate {
    /// Wrap `hit` for a pass over `contig`.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::InvalidHit`] if the hit lies outside the contig.
    pub fn new(hit: Hit, contig: &OrientedContig<'_>) -> Result<Self, ChainError> {
        if hit.target_end > contig.len() {
            return Err(ChainError::InvalidHit(format!(
                "{}:{}-{} ends beyond the contig length {}",
                hit.contig,
                hit.target_start,
                hit.target_end,
                contig.len()
            )));
        }
        let span = contig.to_oriented(hit.target_start, hit.target_end);
        Ok(Self {
            hit,
            span,
            profile: None,
        })
    }

    /// Compute the splice profile unless already present.
    pub fn prepare(&mut self, ctx: &ChainContext<'_>) {
        if self.profile.is_none() {
            let profile = SpliceFinder::new(ctx).profile(&self.hit, self.span);
            self.profile = Some(Arc::new(profile));
        }
    }

    /// Number of query residues covered
    #[must_use]
    pub const fn query_span(&self) -> usize {
        self.hit.query_span()
    }
}

/// Sort every part's candidates by oriented start.
pub fn sort_candidates(hits: &mut PartCandidates) {
    for list in hits.iter_mut() {
        list.sort_by_key(|c| (c.span.start, c.span.end));
    }
}
