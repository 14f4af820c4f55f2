use bio::bio_types::strand::Strand;

/// Predictions for one transcript.
///
/// Contains the ranked gene models and statistics of the search that
/// produced them.
///
/// # Examples
///
/// ```rust,no_run
/// use exonchain_core::TranscriptPredictor;
/// use exonchain_core::config::PredictorConfig;
/// use exonchain_core::hit::{HitCollection, Part, Transcript};
/// use exonchain_core::sequence::io::read_genome;
///
/// let genome = read_genome("genome.fasta")?;
/// let predictor = TranscriptPredictor::new(genome, PredictorConfig::default())?;
/// let transcript = Transcript::new("t1", vec![Part::new("e1", "MKWF")])?;
/// let result = predictor.predict(&transcript, &HitCollection::new(1))?;
///
/// for prediction in &result.predictions {
///     println!("{} {}:{} score {}", result.transcript_id, prediction.contig,
///              prediction.exons.len(), prediction.score);
/// }
/// println!("{} alignments", result.stats.alignments);
/// # Ok::<(), exonchain_core::types::ChainError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptPrediction {
    /// Identifier of the reference transcript
    pub transcript_id: String,

    /// Gene models, best first.
    ///
    /// Empty when no chain of hits was found.
    pub predictions: Vec<Prediction>,

    /// Statistics of the search.
    pub stats: SearchStats,
}

/// One predicted gene model.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Contig of the prediction.
    pub contig: String,

    /// Strand of the prediction.
    pub strand: Strand,

    /// Chain value from the spliced pass.
    pub score: i64,

    /// Coding exons in transcription order.
    ///
    /// Hits fused by an intron loss form a single exon.
    pub exons: Vec<CodingExon>,

    /// Coding sequence of all exons, on the transcribed strand.
    pub coding_dna: Vec<u8>,

    /// Translation of [`Prediction::coding_dna`].
    pub protein: Vec<u8>,

    /// Introns placed inside a single reference part.
    pub intron_gains: usize,

    /// Reference part boundaries not realized as introns.
    pub intron_losses: usize,

    /// Boundary refinements that had to be skipped.
    pub problems: Vec<String>,

    /// Similarity to the reference protein.
    pub metrics: QualityMetrics,

    /// No region qualified and all hits of the strand were analysed
    /// together.
    pub fallback: bool,

    /// Recovered candidates were discarded at the per-part cap.
    pub truncated: bool,
}

impl Prediction {
    /// Genomic interval `(start, end)` of all exons, 1-based inclusive.
    #[must_use]
    pub fn extent(&self) -> Option<(i64, i64)> {
        let start = self.exons.iter().map(|e| e.start).min()?;
        let end = self.exons.iter().map(|e| e.end).max()?;
        Some((start, end))
    }
}

/// Coding exon of a prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct CodingExon {
    pub contig: String,
    pub strand: Strand,
    /// First genomic position (1-based, inclusive)
    pub start: i64,
    /// Last genomic position (1-based, inclusive)
    pub end: i64,
    /// Reference part of the first hit of the exon
    pub part: usize,
    /// Bases before the first complete codon of the exon
    pub phase: u8,
    /// Evidence trail of the hits forming the exon
    pub notes: Vec<String>,
}

impl CodingExon {
    /// Length in base pairs
    #[must_use]
    pub const fn len(&self) -> i64 {
        self.end - self.start + 1
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

/// Similarity of a predicted protein to the reference protein.
///
/// Fractions are relative to the reference length and range from 0 to 1.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QualityMetrics {
    /// Identical residues in a global alignment
    pub identity: f64,
    /// Residues with a positive substitution score
    pub positives: f64,
    /// Predicted protein starts with a methionine
    pub start: bool,
    /// Predicted protein ends with a stop
    pub stop: bool,
}

/// Statistics of one transcript search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    /// Contig/strand partitions with hits on known contigs
    pub tested_strands: usize,
    /// Partitions passing the contig threshold
    pub analysed_strands: usize,
    /// Best coarse chain value over all partitions
    pub best_coarse_score: Option<i64>,
    /// Pairwise alignments computed for this transcript
    pub alignments: u64,
}
