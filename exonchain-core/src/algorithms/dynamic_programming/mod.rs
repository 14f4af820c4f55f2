//! Chaining of hits by dynamic programming.
//!
//! A [`DpPass`] works on the candidates of one contig/strand, indexed by part.
//! The forward recursion runs from the last part to the first:
//!
//! ```text
//! sums[i][j] = score(i, j) + max(
//!     end_cost(i, j),                                  // chain ends here
//!     max over reachable (k, m) of
//!         junction(j, m) + sums[k][m]                  // continue with m
//! )
//! ```
//!
//! with `i <= k < i + max_gap`. The [`PassMode::Coarse`] pass uses zero
//! terminal costs and zero junction scores to rank regions cheaply; the
//! [`PassMode::Spliced`] pass evaluates junctions with the
//! [`JunctionScorer`] and memoizes them in a [`JunctionCache`].

mod backtrack;
mod cache;
mod forward;
mod junction;
mod reduce;

pub use backtrack::ChainPath;
pub use cache::{JunctionCache, JunctionEntry};
pub use junction::{JunctionScorer, JunctionVariant};
pub use reduce::ReductionSummary;

use crate::algorithms::context::{ChainContext, PartCandidates};

/// Whether junctions are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassMode {
    /// Zero junction and terminal costs; overlapping same-part hits are not
    /// chained
    Coarse,
    /// Junctions scored through splice profiles, with terminal costs
    Spliced,
}

/// One DP table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DpEntry {
    /// Best chain value starting at this hit, without the start cost
    pub sum: i64,
    pub start: i64,
    pub end: i64,
    pub query_start: usize,
    pub query_end: usize,
}

/// Dynamic programming pass over the candidates of one contig/strand.
pub struct DpPass<'c, 'a> {
    ctx: &'c ChainContext<'a>,
    mode: PassMode,
    hits: PartCandidates,
    table: Vec<Vec<DpEntry>>,
    cache: Option<JunctionCache>,
    best: Option<i64>,
    best_starts: Vec<(usize, usize)>,
}

impl<'c, 'a> DpPass<'c, 'a> {
    /// Create a pass; every part's candidates must be sorted by oriented
    /// start.
    #[must_use]
    pub fn new(ctx: &'c ChainContext<'a>, hits: PartCandidates, mode: PassMode) -> Self {
        debug_assert_eq!(hits.len(), ctx.parts());
        debug_assert!(hits
            .iter()
            .all(|list| list.windows(2).all(|w| w[0].span.start <= w[1].span.start)));
        Self {
            ctx,
            mode,
            hits,
            table: Vec::new(),
            cache: None,
            best: None,
            best_starts: Vec::new(),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> PassMode {
        self.mode
    }

    #[must_use]
    pub fn hits(&self) -> &PartCandidates {
        &self.hits
    }

    #[must_use]
    pub fn into_hits(self) -> PartCandidates {
        self.hits
    }

    /// Total number of candidates
    #[must_use]
    pub fn hit_count(&self) -> usize {
        self.hits.iter().map(Vec::len).sum()
    }

    /// DP table of the last run, indexed like the candidates
    #[must_use]
    pub fn table(&self) -> &[Vec<DpEntry>] {
        &self.table
    }

    #[must_use]
    pub fn cache(&self) -> Option<&JunctionCache> {
        self.cache.as_ref()
    }

    /// Best chain value of the last run, including the start cost
    #[must_use]
    pub const fn best(&self) -> Option<i64> {
        self.best
    }

    /// Positions attaining [`DpPass::best`]
    #[must_use]
    pub fn best_starts(&self) -> &[(usize, usize)] {
        &self.best_starts
    }
}
