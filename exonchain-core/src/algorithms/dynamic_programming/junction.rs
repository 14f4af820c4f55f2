use crate::algorithms::context::{Candidate, ChainContext};
use crate::constants::{CODON_LENGTH, MIN_INTRON_LENGTH, STOP_RESIDUE};
use crate::splice::{SpliceCandidate, SpliceProfile};
use crate::types::{SpliceType, SpliceTypeSet};

/// Best way of fusing two hits of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JunctionVariant {
    /// Extra chain score of the fusion
    pub score: i64,
    /// Bases by which the 3' end of the upstream hit moves
    pub donor_offset: i64,
    /// Bases by which the 5' end of the downstream hit moves
    pub acceptor_offset: i64,
    pub kind: SpliceType,
}

/// Scores splice variants between pairs of prepared candidates.
pub struct JunctionScorer<'c, 'a> {
    ctx: &'c ChainContext<'a>,
}

impl<'c, 'a> JunctionScorer<'c, 'a> {
    #[must_use]
    pub const fn new(ctx: &'c ChainContext<'a>) -> Self {
        Self { ctx }
    }

    /// Best junction between `first` and `second`, or `None` if every
    /// variant hits a premature stop or an impossible intron.
    ///
    /// `delta` is the summed length of the parts skipped between them.
    /// Splice types are tried in stages: for neighbouring parts the
    /// reference phase first, then all intron phases, then intron loss; for
    /// hits of the same part intron loss before introns.
    #[must_use]
    pub fn score(&self, first: &Candidate, second: &Candidate, delta: usize) -> Option<JunctionVariant> {
        let distance = second.hit.part - first.hit.part;
        let stages: Vec<SpliceTypeSet> = match distance {
            0 => vec![SpliceTypeSet::intron_loss(), SpliceTypeSet::introns()],
            1 => {
                let phase = self.ctx.transcript.part(second.hit.part).phase;
                let mut stages: Vec<SpliceTypeSet> = phase
                    .and_then(|p| SpliceType::from_phase(usize::from(p)))
                    .map(SpliceTypeSet::only)
                    .into_iter()
                    .collect();
                stages.push(SpliceTypeSet::introns());
                stages.push(SpliceTypeSet::intron_loss());
                stages
            }
            _ => vec![SpliceTypeSet::all()],
        };
        stages
            .into_iter()
            .find_map(|types| self.score_types(first, second, delta, distance, types))
    }

    fn score_types(
        &self,
        first: &Candidate,
        second: &Candidate,
        delta: usize,
        distance: usize,
        types: SpliceTypeSet,
    ) -> Option<JunctionVariant> {
        let empty = SpliceProfile::default();
        let first_profile = first.profile.as_deref().unwrap_or(&empty);
        let second_profile = second.profile.as_deref().unwrap_or(&empty);

        let loss = if types.contains(SpliceType::IntronLoss) {
            self.intron_loss(first, second, first_profile, second_profile, distance)
        } else {
            None
        };

        let same_part = distance == 0;
        if !types.has_introns() || (same_part && loss.is_some()) {
            return loss;
        }

        let mut best = loss;
        let mut best_length = i64::MAX;
        for donors in &first_profile.donors {
            let mut found = false;
            for phase in 0..CODON_LENGTH as usize {
                if !types.contains_phase(phase) {
                    continue;
                }
                let donor_frame = (CODON_LENGTH as usize - phase) % CODON_LENGTH as usize;
                for acceptor in &second_profile.acceptors[phase] {
                    for donor in &donors[donor_frame] {
                        let Some(score) =
                            self.spliced(first, second, donor, acceptor, phase, delta, distance)
                        else {
                            continue;
                        };
                        let length = acceptor.offset.abs() + donor.offset.abs();
                        let better = match best {
                            None => true,
                            Some(b) => score > b.score || (score == b.score && length < best_length),
                        };
                        if better {
                            best = Some(JunctionVariant {
                                score,
                                donor_offset: donor.offset,
                                acceptor_offset: acceptor.offset,
                                kind: SpliceType::from_phase(phase).unwrap_or(SpliceType::Phase0),
                            });
                            best_length = length;
                            found = true;
                        }
                    }
                }
            }
            // secondary donor motifs only when the primary ones gave nothing
            if found {
                break;
            }
        }
        best
    }

    /// In-frame fusion of both hits without an intron.
    fn intron_loss(
        &self,
        first: &Candidate,
        second: &Candidate,
        first_profile: &SpliceProfile,
        second_profile: &SpliceProfile,
        distance: usize,
    ) -> Option<JunctionVariant> {
        let gap = second.span.start - first.span.end;
        if gap < 0
            || gap % CODON_LENGTH != 0
            || gap > first_profile.open_downstream
            || gap > second_profile.open_upstream
        {
            return None;
        }
        let dna = self.ctx.contig.fetch(first.span.start, second.span.end);
        let score = self.fused_score(first, second, &dna)? - distance as i64 * self.ctx.scoring.intron_gain_loss;
        Some(JunctionVariant {
            score,
            donor_offset: gap,
            acceptor_offset: 0,
            kind: SpliceType::IntronLoss,
        })
    }

    /// Score of one donor/acceptor pairing, `None` if the intron is too
    /// short or the split codon is a stop.
    #[allow(clippy::too_many_arguments)]
    fn spliced(
        &self,
        first: &Candidate,
        second: &Candidate,
        donor: &SpliceCandidate,
        acceptor: &SpliceCandidate,
        phase: usize,
        delta: usize,
        distance: usize,
    ) -> Option<i64> {
        let exon_end = first.span.end + donor.offset;
        let exon_start = second.span.start - acceptor.offset;
        // half-open bounds, so this is the intron length itself
        if exon_start - exon_end < MIN_INTRON_LENGTH {
            return None;
        }

        if phase != 0 {
            let donor_bases = (CODON_LENGTH - phase as i64) % CODON_LENGTH;
            let mut codon = self.ctx.contig.fetch(exon_end - donor_bases, exon_end);
            codon.extend(self.ctx.contig.fetch(exon_start, exon_start + phase as i64));
            let residue = self.ctx.code.translate_codon(&codon).ok()?;
            if residue == STOP_RESIDUE {
                return None;
            }
        }

        if distance > 0 {
            return Some(
                donor.score
                    + acceptor.score
                    + self.ctx.scoring.gap_cost(delta, distance as i64 - 1),
            );
        }

        let mut dna = self.ctx.contig.fetch(first.span.start, exon_end);
        dna.extend(self.ctx.contig.fetch(exon_start, second.span.end));
        Some(self.fused_score(first, second, &dna)? - self.ctx.scoring.intron_gain_loss)
    }

    /// Global score of the translated fusion against the reference residues
    /// of both hits, relative to the hits' own scores.
    fn fused_score(&self, first: &Candidate, second: &Candidate, dna: &[u8]) -> Option<i64> {
        let translation = self.ctx.code.translate(dna).ok()?;
        let reference = self.ctx.transcript.protein_between(&first.hit, &second.hit);
        Some(
            self.ctx.aligner.global_score(&reference, &translation)
                - first.hit.score
                - second.hit.score,
        )
    }
}
