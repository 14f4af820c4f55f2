use std::collections::HashMap;

use crate::algorithms::context::ChainContext;
use crate::constants::{
    ACCEPTOR_MOTIF, ADJACENT_DONOR_MOTIF, CODON_LENGTH, DONOR_MOTIFS, MAX_INNER_RESIDUES,
    MAX_UNTRANSLATABLE_CODONS, STOP_RESIDUE, UNKNOWN_RESIDUE,
};
use crate::hit::Hit;
use crate::splice::border;
use crate::splice::profile::{SpliceCandidate, SpliceProfile};
use crate::splice::{SiteClassifier, SpliceSiteModel};
use crate::types::{FrameBuckets, OrientedSpan};

/// Translated genomic sequence beyond one end of a hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Extension {
    /// Residues of genomic codons outside the hit, in transcription order
    pub residues: Vec<u8>,
    /// Bases outside the hit before the first in-frame stop
    pub open: i64,
    /// Oriented window searched for splice sites
    pub window: OrientedSpan,
}

/// Candidate boundary positions, as signed offsets from the hit boundary.
#[derive(Debug, Default)]
struct SiteOffsets {
    acceptors: Vec<i64>,
    donors: [Vec<i64>; 2],
    acceptor_evidence: bool,
    donor_evidence: bool,
}

/// Bases searched for splice sites inside a hit of `residues` residues.
pub(crate) const fn inner_length(residues: usize) -> i64 {
    let rounded = residues - residues % 3;
    let capped = if rounded > 3 * MAX_INNER_RESIDUES {
        3 * MAX_INNER_RESIDUES
    } else {
        rounded
    };
    capped as i64
}

/// Locates and scores splice-site candidates around a hit.
pub struct SpliceFinder<'c, 'a> {
    ctx: &'c ChainContext<'a>,
}

impl<'c, 'a> SpliceFinder<'c, 'a> {
    #[must_use]
    pub const fn new(ctx: &'c ChainContext<'a>) -> Self {
        Self { ctx }
    }

    /// Build the splice profile of `hit`, which spans `span` on the pass's
    /// contig.
    #[must_use]
    pub fn profile(&self, hit: &Hit, span: OrientedSpan) -> SpliceProfile {
        let residues = hit.target_residues();
        let inner = inner_length(residues.len());
        let upstream = self.extend_upstream(span, inner, &residues);
        let downstream = self.extend_downstream(span, inner, &residues);

        let sites = self.site_offsets(span, &upstream, &downstream);
        let mut profile = SpliceProfile {
            acceptors: self.score_acceptors(hit, &sites.acceptors, &upstream.residues, &residues),
            donors: [
                self.score_donors(hit, &sites.donors[0], &downstream.residues, &residues),
                self.score_donors(hit, &sites.donors[1], &downstream.residues, &residues),
            ],
            open_upstream: upstream.open,
            open_downstream: downstream.open,
            acceptor_evidence: sites.acceptor_evidence,
            donor_evidence: sites.donor_evidence,
            ..SpliceProfile::default()
        };

        let transcript = self.ctx.transcript;
        if hit.part == 0 && transcript.first_part_starts_with_methionine() {
            profile.start = Some(border::start_extension(
                self.ctx,
                hit,
                span,
                &upstream.residues,
            ));
        }
        if hit.part + 1 == transcript.len() && transcript.last_part_ends_with_stop() {
            profile.stop = Some(border::stop_extension(
                self.ctx,
                hit,
                span,
                &downstream.residues,
            ));
        }
        profile.upstream = upstream.residues;
        profile.downstream = downstream.residues;
        profile
    }

    fn translate_or_unknown(&self, start: i64, failures: &mut usize) -> Option<u8> {
        let codon = self.ctx.contig.fetch(start, start + CODON_LENGTH);
        match self.ctx.code.translate_codon(&codon) {
            Ok(residue) => {
                *failures = 0;
                Some(residue)
            }
            Err(_) => {
                *failures += 1;
                (*failures < MAX_UNTRANSLATABLE_CODONS).then_some(UNKNOWN_RESIDUE)
            }
        }
    }

    /// Walk codon by codon upstream from `inner` bases inside the hit.
    pub(crate) fn extend_upstream(&self, span: OrientedSpan, inner: i64, aligned: &[u8]) -> Extension {
        let inner_codons = (inner / CODON_LENGTH) as usize;
        let limit = self.ctx.scoring.max_intron_length;
        let mut position = span.start + inner;
        let mut walked = 0;
        let mut failures = 0;
        let mut last = 0;
        let mut genomic = Vec::new();

        while CODON_LENGTH * (walked as i64) < limit
            && position >= CODON_LENGTH
            && last != STOP_RESIDUE
        {
            let residue = if walked < inner_codons {
                aligned[inner_codons - 1 - walked]
            } else {
                match self.translate_or_unknown(position - CODON_LENGTH, &mut failures) {
                    Some(residue) => residue,
                    None => break,
                }
            };
            if walked >= inner_codons {
                genomic.push(residue);
            }
            last = residue;
            position -= CODON_LENGTH;
            walked += 1;
        }

        let stop = genomic.last() == Some(&STOP_RESIDUE);
        let open = CODON_LENGTH * (genomic.len() - usize::from(stop)) as i64;
        genomic.reverse();
        Extension {
            residues: genomic,
            open,
            window: OrientedSpan::new((position - 1).max(0), span.start + inner),
        }
    }

    /// Walk codon by codon downstream from `inner` bases inside the hit.
    pub(crate) fn extend_downstream(
        &self,
        span: OrientedSpan,
        inner: i64,
        aligned: &[u8],
    ) -> Extension {
        let inner_codons = (inner / CODON_LENGTH) as usize;
        let limit = self.ctx.scoring.max_intron_length;
        let length = self.ctx.contig.len();
        let mut position = span.end - inner;
        let mut walked = 0;
        let mut failures = 0;
        let mut last = 0;
        let mut genomic = Vec::new();

        while CODON_LENGTH * (walked as i64) < limit
            && position + CODON_LENGTH <= length
            && last != STOP_RESIDUE
        {
            let residue = if walked < inner_codons {
                aligned[aligned.len() - inner_codons + walked]
            } else {
                match self.translate_or_unknown(position, &mut failures) {
                    Some(residue) => residue,
                    None => break,
                }
            };
            if walked >= inner_codons {
                genomic.push(residue);
            }
            last = residue;
            position += CODON_LENGTH;
            walked += 1;
        }

        let stop = genomic.last() == Some(&STOP_RESIDUE);
        let open = CODON_LENGTH * (genomic.len() - usize::from(stop)) as i64;
        Extension {
            residues: genomic,
            open,
            window: OrientedSpan::new(span.end - inner, (position + 1).min(length)),
        }
    }

    fn site_offsets(
        &self,
        span: OrientedSpan,
        upstream: &Extension,
        downstream: &Extension,
    ) -> SiteOffsets {
        match self.ctx.splice_model {
            SpliceSiteModel::Consensus => self.consensus_sites(span, upstream, downstream),
            SpliceSiteModel::Classifier {
                donor,
                acceptor,
                top,
            } => SiteOffsets {
                acceptors: self.classified_sites(acceptor.as_ref(), span, upstream.window, *top, true),
                donors: [
                    self.classified_sites(donor.as_ref(), span, downstream.window, *top, false),
                    Vec::new(),
                ],
                ..SiteOffsets::default()
            },
            SpliceSiteModel::KnownIntrons {
                introns,
                min_reads,
                fallback,
            } => {
                let mut sites = SiteOffsets::default();
                for intron in introns.oriented(self.ctx.contig, *min_reads) {
                    if intron.end >= upstream.window.start + 2 && intron.end <= upstream.window.end
                    {
                        sites.acceptors.push(span.start - intron.end);
                    }
                    if intron.start >= downstream.window.start
                        && intron.start + 2 <= downstream.window.end
                    {
                        sites.donors[0].push(intron.start - span.end);
                    }
                }
                sites.acceptors.sort_unstable_by(|a, b| b.cmp(a));
                sites.acceptors.dedup();
                sites.donors[0].sort_unstable();
                sites.donors[0].dedup();
                sites.acceptor_evidence = !sites.acceptors.is_empty();
                sites.donor_evidence = !sites.donors[0].is_empty();

                if *fallback && !(sites.acceptor_evidence && sites.donor_evidence) {
                    let consensus = self.consensus_sites(span, upstream, downstream);
                    if !sites.acceptor_evidence {
                        sites.acceptors = consensus.acceptors;
                    }
                    if !sites.donor_evidence {
                        sites.donors = consensus.donors;
                    }
                }
                sites
            }
        }
    }

    fn consensus_sites(
        &self,
        span: OrientedSpan,
        upstream: &Extension,
        downstream: &Extension,
    ) -> SiteOffsets {
        let contig = self.ctx.contig;
        let acceptors = contig
            .find_motif(upstream.window.start, upstream.window.end, ACCEPTOR_MOTIF)
            .into_iter()
            .map(|g| span.start - (g + 2))
            .collect();

        let window = downstream.window;
        let mut primary: Vec<i64> = contig
            .find_motif(window.start, window.end, DONOR_MOTIFS[0])
            .into_iter()
            .map(|g| g - span.end)
            .collect();
        for offset in 0..CODON_LENGTH {
            let at = span.end + offset;
            if at + 2 <= window.end && contig.fetch(at, at + 2) == ADJACENT_DONOR_MOTIF {
                primary.push(offset);
            }
        }
        let secondary = contig
            .find_motif(window.start, window.end, DONOR_MOTIFS[1])
            .into_iter()
            .map(|g| g - span.end)
            .collect();

        SiteOffsets {
            acceptors,
            donors: [primary, secondary],
            ..SiteOffsets::default()
        }
    }

    /// Offsets of exon boundaries in `window` whose classifier window scores
    /// at least the threshold; at most `top` per frame, best first.
    fn classified_sites(
        &self,
        classifier: &dyn SiteClassifier,
        span: OrientedSpan,
        window: OrientedSpan,
        top: usize,
        acceptor: bool,
    ) -> Vec<i64> {
        // an acceptor boundary follows its AG, a donor boundary precedes its GT
        let (first, last) = if acceptor {
            (window.start + 2, window.end)
        } else {
            (window.start, window.end - 2)
        };
        let contig = self.ctx.contig;
        let width = classifier.window() as i64;
        let site = classifier.site_offset() as i64;
        let mut scored: FrameBuckets<(f64, i64)> = Default::default();
        for x in first..=last {
            let from = x - site;
            if from < 0 || from + width > contig.len() {
                continue;
            }
            let score = classifier.score(&contig.fetch(from, from + width));
            if score >= classifier.threshold() {
                let offset = if acceptor { span.start - x } else { x - span.end };
                scored[offset.rem_euclid(3) as usize].push((score, offset));
            }
        }
        scored
            .into_iter()
            .flat_map(|mut frame| {
                frame.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
                frame.truncate(top);
                frame.into_iter().map(|(_, offset)| offset)
            })
            .collect()
    }

    fn score_acceptors(
        &self,
        hit: &Hit,
        offsets: &[i64],
        upstream: &[u8],
        residues: &[u8],
    ) -> FrameBuckets<SpliceCandidate> {
        let protein = self.ctx.transcript.part(hit.part).protein.as_bytes();
        let query = &protein[..hit.query_end.min(protein.len())];
        self.score_sites(offsets, |codons| {
            let target = if codons >= 0 {
                let added = (codons as usize).min(upstream.len());
                [&upstream[upstream.len() - added..], residues].concat()
            } else {
                residues[((-codons) as usize).min(residues.len())..].to_vec()
            };
            self.ctx.aligner.global_score(query, &target) - hit.score
        })
    }

    fn score_donors(
        &self,
        hit: &Hit,
        offsets: &[i64],
        downstream: &[u8],
        residues: &[u8],
    ) -> FrameBuckets<SpliceCandidate> {
        let protein = self.ctx.transcript.part(hit.part).protein.as_bytes();
        let query = &protein[(hit.query_start - 1).min(protein.len())..];
        self.score_sites(offsets, |codons| {
            let target = if codons >= 0 {
                let added = (codons as usize).min(downstream.len());
                [residues, &downstream[..added]].concat()
            } else {
                residues[..residues.len() - ((-codons) as usize).min(residues.len())].to_vec()
            };
            self.ctx.aligner.global_score(query, &target) - hit.score
        })
    }

    /// Score every offset, aligning once per distinct codon shift.
    fn score_sites(
        &self,
        offsets: &[i64],
        mut score: impl FnMut(i64) -> i64,
    ) -> FrameBuckets<SpliceCandidate> {
        let mut cache: HashMap<i64, i64> = HashMap::new();
        let mut buckets: FrameBuckets<SpliceCandidate> = Default::default();
        for &offset in offsets {
            let codons = offset.div_euclid(CODON_LENGTH);
            let value = *cache.entry(codons).or_insert_with(|| score(codons));
            buckets[offset.rem_euclid(CODON_LENGTH) as usize].push(SpliceCandidate {
                offset,
                score: value,
            });
        }
        buckets
    }
}
