//! Splice-site detection around alignment hits.
//!
//! For every hit the [`SpliceFinder`] translates the genome beyond both hit
//! ends up to the next in-frame stop, locates candidate acceptor and donor
//! sites and scores each candidate by how much moving the exon boundary
//! there changes the alignment against the reference. The result is an
//! immutable [`SpliceProfile`] shared by all DP passes over the hit.
//!
//! Candidate sites come from a [`SpliceSiteModel`]:
//!
//! - **Consensus**: every `AG` acceptor and `GT`/`GC` donor dinucleotide
//! - **Classifier**: windows scored by a [`SiteClassifier`] such as a
//!   [`PositionWeightMatrix`]
//! - **Known introns**: introns observed in transcript data ([`KnownIntrons`]),
//!   optionally falling back to the consensus

mod border;
mod classifier;
mod evidence;
mod finder;
mod profile;

use std::sync::Arc;

pub use classifier::{PositionWeightMatrix, SiteClassifier};
pub use evidence::{Intron, KnownIntrons};
pub use finder::SpliceFinder;
pub use profile::{CodonExtension, SpliceCandidate, SpliceProfile};

/// Source of candidate splice sites.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use exonchain_core::splice::{KnownIntrons, SpliceSiteModel};
///
/// let model = SpliceSiteModel::KnownIntrons {
///     introns: Arc::new(KnownIntrons::new()),
///     min_reads: 1,
///     fallback: true,
/// };
/// assert!(!matches!(model, SpliceSiteModel::Consensus));
/// ```
#[derive(Debug, Clone, Default)]
pub enum SpliceSiteModel {
    /// Consensus dinucleotides
    #[default]
    Consensus,
    /// Trained classifiers for donor and acceptor windows
    Classifier {
        donor: Arc<dyn SiteClassifier>,
        acceptor: Arc<dyn SiteClassifier>,
        /// Sites kept per frame
        top: usize,
    },
    /// Introns observed in transcript data
    KnownIntrons {
        introns: Arc<KnownIntrons>,
        /// Minimum number of supporting reads
        min_reads: u32,
        /// Use the consensus where no known intron is found
        fallback: bool,
    },
}
