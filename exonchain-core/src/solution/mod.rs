//! Chains of hits selected by the spliced pass.
//!
//! A [`Solution`] is one candidate gene model. Solutions of all regions are
//! ranked in a bounded [`SolutionQueue`] and the retained ones are turned
//! into exact exon boundaries by [`refine`].

mod ranking;
mod refinement;

use std::cmp::Ordering;

use bio::bio_types::strand::Strand;

use crate::algorithms::context::Candidate;
use crate::constants::START_RESIDUE;
use crate::sequence::OrientedContig;

pub use ranking::SolutionQueue;
pub use refinement::{refine, Refinement};

/// One chain of hits on a contig/strand, in transcription order.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub contig: String,
    pub strand: Strand,
    pub chain: Vec<Candidate>,
    /// Chain value including junction and terminal costs
    pub score: i64,
    /// No segmented region qualified, so all hits of the strand were
    /// analysed together
    pub fallback: bool,
    /// Recovered candidates were discarded at the per-part cap
    pub truncated: bool,
}

impl Solution {
    #[must_use]
    pub fn from_chain(
        contig: &OrientedContig<'_>,
        chain: Vec<Candidate>,
        score: i64,
        fallback: bool,
        truncated: bool,
    ) -> Self {
        Self {
            contig: contig.id().to_string(),
            strand: contig.strand(),
            chain,
            score,
            fallback,
            truncated,
        }
    }

    #[must_use]
    pub const fn is_forward(&self) -> bool {
        !matches!(self.strand, Strand::Reverse)
    }

    #[must_use]
    pub fn hit_count(&self) -> usize {
        self.chain.len()
    }

    /// Number of distinct parts covered by the chain
    #[must_use]
    pub fn matched_parts(&self) -> usize {
        let mut parts: Vec<usize> = self.chain.iter().map(|c| c.hit.part).collect();
        parts.dedup();
        parts.len()
    }

    /// Whether the chain starts in the first part at a methionine.
    #[must_use]
    pub fn starts_with_methionine(&self) -> bool {
        self.chain.first().is_some_and(|first| {
            let residue = first
                .profile
                .as_ref()
                .and_then(|p| p.first_residue())
                .or_else(|| first.hit.aligned_target.first().copied());
            first.hit.part == 0 && residue == Some(START_RESIDUE)
        })
    }

    /// Genomic interval `(start, end)` covered by the chain, 1-based
    /// inclusive.
    #[must_use]
    pub fn genomic_extent(&self) -> (i64, i64) {
        let start = self.chain.iter().map(|c| c.hit.target_start).min().unwrap_or(0);
        let end = self.chain.iter().map(|c| c.hit.target_end).max().unwrap_or(0);
        (start, end)
    }

    /// Ranking order; `Greater` means `self` is the better solution.
    ///
    /// Compares, in order: score, matched parts, fewer hits, a start at a
    /// methionine, a smaller genomic extent, a lower genomic start, the
    /// contig id and finally the strand (forward first).
    #[must_use]
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        let (start, end) = self.genomic_extent();
        let (other_start, other_end) = other.genomic_extent();
        self.score
            .cmp(&other.score)
            .then_with(|| self.matched_parts().cmp(&other.matched_parts()))
            .then_with(|| other.hit_count().cmp(&self.hit_count()))
            .then_with(|| {
                self.starts_with_methionine()
                    .cmp(&other.starts_with_methionine())
            })
            .then_with(|| (other_end - other_start).cmp(&(end - start)))
            .then_with(|| other_start.cmp(&start))
            .then_with(|| other.contig.cmp(&self.contig))
            .then_with(|| self.is_forward().cmp(&other.is_forward()))
    }
}
