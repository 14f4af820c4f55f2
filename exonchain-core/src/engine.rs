use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::algorithms::context::{sort_candidates, Candidate, ChainContext, PartCandidates};
use crate::algorithms::recovery::{analyse_strand, coarse_score};
use crate::align::{CountingAligner, PairwiseAligner, SubstitutionAligner};
use crate::config::PredictorConfig;
use crate::constants::{GAP, START_RESIDUE, STOP_RESIDUE};
use crate::hit::{Hit, HitCollection, TargetRegion, Transcript};
use crate::results::{CodingExon, Prediction, QualityMetrics, SearchStats, TranscriptPrediction};
use crate::sequence::{GeneticCode, GenomeSource, OrientedContig};
use crate::solution::{refine, Solution, SolutionQueue};
use crate::splice::SpliceSiteModel;
use crate::types::{strand_symbol, ChainError, OrientedSpan};

/// One unit of work for [`TranscriptPredictor::predict_batch`].
#[derive(Debug, Clone)]
pub struct PredictionJob {
    pub transcript: Transcript,
    pub hits: HitCollection,
    /// Restrict the search to part of the genome
    pub region: Option<TargetRegion>,
}

/// Cooperative per-transcript deadline, checked between phases.
#[derive(Debug, Clone, Copy)]
struct Deadline {
    expires: Option<Instant>,
    seconds: u64,
}

impl Deadline {
    fn start(timeout_seconds: Option<u64>) -> Self {
        let now = Instant::now();
        Self {
            expires: timeout_seconds.and_then(|s| now.checked_add(Duration::from_secs(s))),
            seconds: timeout_seconds.unwrap_or(0),
        }
    }

    fn check(&self, transcript: &str) -> Result<(), ChainError> {
        match self.expires {
            Some(expires) if Instant::now() >= expires => Err(ChainError::Timeout {
                transcript: transcript.to_string(),
                seconds: self.seconds,
            }),
            _ => Ok(()),
        }
    }
}

/// Hits of one contig/strand prepared for chaining.
struct StrandTarget<'g> {
    contig: OrientedContig<'g>,
    hits: PartCandidates,
}

/// Predicts gene models for reference transcripts from their hits.
///
/// The predictor owns the genome and the collaborators shared by all
/// transcripts: pairwise aligner, genetic code and splice-site model. Each
/// transcript is predicted independently; the contig/strand partitions of
/// one transcript are analysed in parallel.
///
/// # Examples
///
/// ```rust
/// use exonchain_core::TranscriptPredictor;
/// use exonchain_core::config::PredictorConfig;
/// use exonchain_core::hit::{HitCollection, Part, Transcript};
/// use exonchain_core::sequence::InMemoryGenome;
///
/// let mut genome = InMemoryGenome::new();
/// genome.insert("chr1", b"ACGTACGTACGT".to_vec());
///
/// let predictor = TranscriptPredictor::new(genome, PredictorConfig::default())?;
/// let transcript = Transcript::new("t1", vec![Part::new("e1", "MKW")])?;
/// let result = predictor.predict(&transcript, &HitCollection::new(1))?;
/// assert!(result.predictions.is_empty());
/// # Ok::<(), exonchain_core::types::ChainError>(())
/// ```
pub struct TranscriptPredictor<G: GenomeSource> {
    config: PredictorConfig,
    genome: G,
    aligner: Arc<dyn PairwiseAligner>,
    code: GeneticCode,
    splice_model: SpliceSiteModel,
    pool: Option<rayon::ThreadPool>,
}

impl<G: GenomeSource> TranscriptPredictor<G> {
    /// Creates a predictor with the BLOSUM62 aligner, the standard genetic
    /// code and consensus splice sites.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::InvalidConfig`] for out-of-range settings and
    /// [`ChainError::ThreadPool`] if the dedicated thread pool cannot be
    /// built.
    pub fn new(genome: G, config: PredictorConfig) -> Result<Self, ChainError> {
        config.validate()?;
        let pool = config
            .num_threads
            .map(|threads| {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| {
                        ChainError::ThreadPool(format!("Failed to configure thread pool: {e}"))
                    })
            })
            .transpose()?;
        Ok(Self {
            aligner: Arc::new(SubstitutionAligner::from_scoring(&config.scoring)),
            config,
            genome,
            code: GeneticCode::standard(),
            splice_model: SpliceSiteModel::default(),
            pool,
        })
    }

    #[must_use]
    pub fn with_aligner(mut self, aligner: Arc<dyn PairwiseAligner>) -> Self {
        self.aligner = aligner;
        self
    }

    #[must_use]
    pub fn with_genetic_code(mut self, code: GeneticCode) -> Self {
        self.code = code;
        self
    }

    #[must_use]
    pub fn with_splice_model(mut self, model: SpliceSiteModel) -> Self {
        self.splice_model = model;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &PredictorConfig {
        &self.config
    }

    #[must_use]
    pub const fn genome(&self) -> &G {
        &self.genome
    }

    /// Predict gene models of `transcript` from all of its hits.
    ///
    /// Every contig/strand partition is chained coarsely first; partitions
    /// scoring at least `contig_threshold` of the best one are analysed in
    /// detail. The best `predictions` solutions are refined and reported.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::InvalidTranscript`] if the collection was built
    /// for a different number of parts and [`ChainError::Timeout`] when the
    /// deadline expires.
    pub fn predict(
        &self,
        transcript: &Transcript,
        hits: &HitCollection,
    ) -> Result<TranscriptPrediction, ChainError> {
        self.install(|| self.run(transcript, hits, true))
    }

    /// Predict gene models within a user-selected region.
    ///
    /// Only hits overlapping `region` are used. When the region fixes the
    /// strand, the contig threshold is not applied.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::UnknownContig`] if the genome has no sequence
    /// for the region's contig; otherwise see [`TranscriptPredictor::predict`].
    pub fn predict_within(
        &self,
        transcript: &Transcript,
        hits: &HitCollection,
        region: &TargetRegion,
    ) -> Result<TranscriptPrediction, ChainError> {
        self.install(|| self.run_within(transcript, hits, region))
    }

    /// Predict many transcripts on the predictor's thread pool.
    ///
    /// Results are returned in job order. Timed-out transcripts are logged
    /// and yield their [`ChainError::Timeout`].
    pub fn predict_batch(
        &self,
        jobs: &[PredictionJob],
    ) -> Vec<Result<TranscriptPrediction, ChainError>> {
        self.install(|| {
            jobs.par_iter()
                .map(|job| {
                    let result = match &job.region {
                        Some(region) => self.run_within(&job.transcript, &job.hits, region),
                        None => self.run(&job.transcript, &job.hits, true),
                    };
                    if let Err(error) = &result {
                        warn!("{}: {error}", job.transcript.id());
                    }
                    result
                })
                .collect()
        })
    }

    fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    fn run_within(
        &self,
        transcript: &Transcript,
        hits: &HitCollection,
        region: &TargetRegion,
    ) -> Result<TranscriptPrediction, ChainError> {
        if self.genome.sequence(&region.contig).is_none() {
            return Err(ChainError::UnknownContig(region.contig.clone()));
        }
        let restricted = hits.restrict(region);
        debug!(
            "{}: {} of {} hits within {}",
            transcript.id(),
            restricted.len(),
            hits.len(),
            region.contig
        );
        self.run(transcript, &restricted, region.strand.is_none())
    }

    fn run(
        &self,
        transcript: &Transcript,
        hits: &HitCollection,
        contig_threshold: bool,
    ) -> Result<TranscriptPrediction, ChainError> {
        if hits.parts() != transcript.len() {
            return Err(ChainError::InvalidTranscript(format!(
                "{} has {} parts but its hits were collected for {}",
                transcript.id(),
                transcript.len(),
                hits.parts()
            )));
        }
        let id = transcript.id();
        let deadline = Deadline::start(self.config.timeout_seconds);
        let aligner = CountingAligner::new(self.aligner.as_ref());
        let targets = self.targets(hits);

        let coarse: Vec<Option<i64>> = targets
            .par_iter()
            .map(|target| {
                let ctx = self.context(transcript, &target.contig, &aligner);
                coarse_score(&ctx, target.hits.clone())
            })
            .collect();
        deadline.check(id)?;

        let best = coarse.iter().flatten().copied().max();
        let threshold = best.map_or(0.0, |b| b as f64 * self.config.contig_threshold);
        let selected: Vec<&StrandTarget<'_>> = targets
            .iter()
            .zip(&coarse)
            .filter(|(_, score)| match (**score, best) {
                (Some(score), Some(best)) => {
                    !contig_threshold || score == best || score as f64 >= threshold
                }
                _ => false,
            })
            .map(|(target, _)| target)
            .collect();
        debug!(
            "{id}: {} of {} strands selected, best coarse score {:?}",
            selected.len(),
            targets.len(),
            best
        );

        let solutions: Vec<Vec<Solution>> = selected
            .par_iter()
            .map(|target| {
                deadline.check(id)?;
                let ctx = self.context(transcript, &target.contig, &aligner);
                let solutions = analyse_strand(&ctx, &self.config, target.hits.clone());
                deadline.check(id)?;
                Ok(solutions)
            })
            .collect::<Result<_, ChainError>>()?;

        let mut queue = SolutionQueue::new(self.config.predictions);
        queue.extend(solutions.into_iter().flatten());
        deadline.check(id)?;

        let predictions: Vec<Prediction> = queue
            .into_sorted_vec()
            .iter()
            .filter_map(|solution| {
                let target = targets.iter().find(|t| {
                    t.contig.id() == solution.contig && t.contig.strand() == solution.strand
                })?;
                let ctx = self.context(transcript, &target.contig, &aligner);
                Some(self.report(&ctx, solution))
            })
            .collect();

        info!(
            "{id}: {} predictions from {} strands",
            predictions.len(),
            selected.len()
        );
        Ok(TranscriptPrediction {
            transcript_id: id.to_string(),
            stats: SearchStats {
                tested_strands: targets.len(),
                analysed_strands: selected.len(),
                best_coarse_score: best,
                alignments: aligner.count(),
            },
            predictions,
        })
    }

    fn context<'a>(
        &'a self,
        transcript: &'a Transcript,
        contig: &'a OrientedContig<'a>,
        aligner: &'a dyn PairwiseAligner,
    ) -> ChainContext<'a> {
        ChainContext {
            transcript,
            scoring: &self.config.scoring,
            contig,
            aligner,
            code: &self.code,
            splice_model: &self.splice_model,
        }
    }

    /// Wrap the hits of every partition on a known contig.
    fn targets<'g>(&'g self, hits: &'g HitCollection) -> Vec<StrandTarget<'g>> {
        let mut targets = Vec::new();
        for partition in hits.partitions() {
            let Some(sequence) = self.genome.sequence(partition.contig) else {
                warn!(
                    "Skipping {} hits on unknown contig {}",
                    partition.len(),
                    partition.contig
                );
                continue;
            };
            let contig = OrientedContig::new(partition.contig, sequence, partition.strand);
            let mut candidates: PartCandidates = partition
                .hits
                .iter()
                .map(|list| {
                    list.iter()
                        .filter_map(|hit| match Candidate::new(hit.clone(), &contig) {
                            Ok(candidate) => Some(candidate),
                            Err(error) => {
                                warn!("Skipping hit: {error}");
                                None
                            }
                        })
                        .collect()
                })
                .collect();
            sort_candidates(&mut candidates);
            targets.push(StrandTarget {
                contig,
                hits: candidates,
            });
        }
        targets
    }

    /// Refine a solution and derive its exons, sequences and metrics.
    fn report(&self, ctx: &ChainContext<'_>, solution: &Solution) -> Prediction {
        let refinement = refine(ctx, solution);
        let exons = coding_exons(ctx.contig, &refinement.hits);
        let coding_dna: Vec<u8> = exons
            .iter()
            .flat_map(|exon| {
                let span = ctx.contig.to_oriented(exon.start, exon.end);
                ctx.contig.fetch(span.start, span.end)
            })
            .collect();
        let protein = ctx.code.translate_lenient(&coding_dna);
        let reference = ctx.transcript.reference_protein();
        let metrics = quality_metrics(ctx.aligner, reference.as_bytes(), &protein);
        debug!(
            "{} {}{}: {} exons, score {}",
            ctx.transcript.id(),
            solution.contig,
            strand_symbol(solution.strand),
            exons.len(),
            solution.score
        );

        Prediction {
            contig: solution.contig.clone(),
            strand: solution.strand,
            score: solution.score,
            intron_gains: refinement.intron_gains(),
            intron_losses: refinement.intron_losses(),
            problems: refinement.problems,
            exons,
            coding_dna,
            protein,
            metrics,
            fallback: solution.fallback,
            truncated: solution.truncated,
        }
    }
}

/// Exons of refined hits; hits that touch or overlap are merged.
fn coding_exons(contig: &OrientedContig<'_>, hits: &[Hit]) -> Vec<CodingExon> {
    let mut merged: Vec<(i64, i64, usize, Vec<String>)> = Vec::new();
    for hit in hits {
        let span = contig.to_oriented(hit.target_start, hit.target_end);
        match merged.last_mut() {
            Some((_, end, _, notes)) if span.start <= *end => {
                *end = (*end).max(span.end);
                notes.extend(hit.notes.iter().cloned());
            }
            _ => merged.push((span.start, span.end, hit.part, hit.notes.clone())),
        }
    }

    let mut coding = 0;
    merged
        .into_iter()
        .map(|(start, end, part, notes)| {
            let (genomic_start, genomic_end) =
                contig.to_genomic(OrientedSpan::new(start, end));
            let phase = ((3 - coding % 3) % 3) as u8;
            coding += end - start;
            CodingExon {
                contig: contig.id().to_string(),
                strand: contig.strand(),
                start: genomic_start,
                end: genomic_end,
                part,
                phase,
                notes,
            }
        })
        .collect()
}

/// Global comparison of the predicted protein with the reference.
fn quality_metrics(aligner: &dyn PairwiseAligner, reference: &[u8], predicted: &[u8]) -> QualityMetrics {
    let alignment = aligner.global(reference, predicted);
    let mut identical = 0_usize;
    let mut positive = 0_usize;
    for (&a, &b) in alignment.aligned_x.iter().zip(&alignment.aligned_y) {
        if a == GAP || b == GAP {
            continue;
        }
        if a == b {
            identical += 1;
        }
        if aligner.substitution(a, b) > 0 {
            positive += 1;
        }
    }
    let length = reference.len().max(1) as f64;
    QualityMetrics {
        identity: identical as f64 / length,
        positives: positive as f64 / length,
        start: predicted.first() == Some(&START_RESIDUE),
        stop: predicted.last() == Some(&STOP_RESIDUE),
    }
}

#[cfg(test)]
mod tests {
    use bio::bio_types::strand::Strand;

    use super::*;
    use crate::hit::HitRecord;
    use crate::sequence::InMemoryGenome;

    fn create_test_hit(contig: &str, part: usize, start: i64, end: i64, residues: &str) -> Hit {
        Hit::from_record(HitRecord {
            part,
            contig: contig.to_string(),
            target_start: start,
            target_end: end,
            query_start: 1,
            query_end: residues.len(),
            query_length: residues.len(),
            score: 30,
            aligned_query: residues.to_string(),
            aligned_target: residues.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_zero_timeout_expires_immediately() {
        let deadline = Deadline::start(Some(0));
        assert!(matches!(
            deadline.check("t1"),
            Err(ChainError::Timeout { seconds: 0, .. })
        ));
        assert!(Deadline::start(None).check("t1").is_ok());
        assert!(Deadline::start(Some(u64::MAX)).check("t1").is_ok());
    }

    #[test]
    fn test_coding_exons_merge_adjacent_hits() {
        let sequence = vec![b'A'; 200];
        let contig = OrientedContig::new("chr1", &sequence, Strand::Forward);
        let mut first = create_test_hit("chr1", 0, 11, 19, "WWW");
        first.add_note("a");
        let mut second = create_test_hit("chr1", 0, 20, 25, "WW");
        second.add_note("b");
        let third = create_test_hit("chr1", 1, 101, 106, "WW");

        let exons = coding_exons(&contig, &[first, second, third]);
        assert_eq!(exons.len(), 2);
        assert_eq!((exons[0].start, exons[0].end), (11, 25));
        assert_eq!(exons[0].notes, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(exons[0].phase, 0);
        // 15 coding bases before the second exon
        assert_eq!(exons[1].phase, 0);
        assert_eq!(exons[1].part, 1);
    }

    #[test]
    fn test_coding_exon_phase_on_reverse_strand() {
        let sequence = vec![b'A'; 100];
        let contig = OrientedContig::new("chr1", &sequence, Strand::Reverse);
        let hits = vec![
            create_test_hit("chr1", 0, 96, 79, "WWWWWW"),
            create_test_hit("chr1", 1, 31, 20, "WWWW"),
        ];
        let exons = coding_exons(&contig, &hits);
        assert_eq!((exons[0].start, exons[0].end), (79, 96));
        assert_eq!((exons[1].start, exons[1].end), (20, 31));
        assert_eq!(exons[1].phase, 0);
        assert_eq!(exons[0].strand, Strand::Reverse);
    }

    #[test]
    fn test_quality_metrics() {
        let aligner = SubstitutionAligner::default();
        let metrics = quality_metrics(&aligner, b"MKWF*", b"MKWY*");
        assert!((metrics.identity - 0.8).abs() < 1e-9);
        assert!((metrics.positives - 1.0).abs() < 1e-9);
        assert!(metrics.start && metrics.stop);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = PredictorConfig {
            region_threshold: -0.1,
            ..Default::default()
        };
        assert!(TranscriptPredictor::new(InMemoryGenome::new(), config).is_err());
    }

    #[test]
    fn test_unknown_contig_is_skipped() {
        let predictor =
            TranscriptPredictor::new(InMemoryGenome::new(), PredictorConfig::default()).unwrap();
        let transcript = Transcript::new("t1", vec![crate::hit::Part::new("e1", "WWW")]).unwrap();
        let hits =
            HitCollection::from_hits(1, [create_test_hit("chrX", 0, 1, 9, "WWW")]).unwrap();
        let result = predictor.predict(&transcript, &hits).unwrap();
        assert!(result.predictions.is_empty());
        assert_eq!(result.stats.tested_strands, 0);
        assert_eq!(result.stats.best_coarse_score, None);
    }

    #[test]
    fn test_region_on_unknown_contig_is_an_error() {
        let predictor =
            TranscriptPredictor::new(InMemoryGenome::new(), PredictorConfig::default()).unwrap();
        let transcript = Transcript::new("t1", vec![crate::hit::Part::new("e1", "WWW")]).unwrap();
        let hits =
            HitCollection::from_hits(1, [create_test_hit("chrX", 0, 1, 9, "WWW")]).unwrap();
        let result = predictor.predict_within(&transcript, &hits, &TargetRegion::contig("chrX"));
        assert!(matches!(result, Err(ChainError::UnknownContig(ref id)) if id == "chrX"));
    }

    #[test]
    fn test_part_count_mismatch() {
        let predictor =
            TranscriptPredictor::new(InMemoryGenome::new(), PredictorConfig::default()).unwrap();
        let transcript = Transcript::new("t1", vec![crate::hit::Part::new("e1", "WWW")]).unwrap();
        assert!(matches!(
            predictor.predict(&transcript, &HitCollection::new(2)),
            Err(ChainError::InvalidTranscript(_))
        ));
    }
}
