use log::debug;

use crate::algorithms::context::ChainContext;
use crate::algorithms::dynamic_programming::{JunctionScorer, JunctionVariant};
use crate::constants::CODON_LENGTH;
use crate::hit::Hit;
use crate::solution::Solution;
use crate::types::SpliceType;

/// Hits of a solution with their final exon boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct Refinement {
    /// Refined hits in transcription order
    pub hits: Vec<Hit>,
    /// Junction chosen between `hits[n]` and `hits[n + 1]`
    pub junctions: Vec<Option<JunctionVariant>>,
    /// Boundary moves that were skipped
    pub problems: Vec<String>,
}

impl Refinement {
    /// Introns placed inside a single reference part
    #[must_use]
    pub fn intron_gains(&self) -> usize {
        self.hits
            .windows(2)
            .zip(&self.junctions)
            .filter(|(pair, junction)| {
                pair[0].part == pair[1].part
                    && junction.is_some_and(|j| j.kind != SpliceType::IntronLoss)
            })
            .count()
    }

    /// Reference part boundaries not realized as an intron
    #[must_use]
    pub fn intron_losses(&self) -> usize {
        self.hits
            .windows(2)
            .zip(&self.junctions)
            .map(|(pair, junction)| {
                let distance = pair[1].part - pair[0].part;
                match junction {
                    Some(j) if j.kind == SpliceType::IntronLoss => distance,
                    Some(_) => distance.saturating_sub(1),
                    None => 0,
                }
            })
            .sum()
    }
}

/// Fix the exon boundaries of `solution`, which must be a chain of the
/// contig/strand of `ctx`.
///
/// Consecutive hits are re-scored to find the donor and acceptor offsets of
/// every junction. The first and last hit are extended to the start and stop
/// codon where the reference protein requires them. Moves that would invert
/// a hit are recorded as problems and skipped.
#[must_use]
pub fn refine(ctx: &ChainContext<'_>, solution: &Solution) -> Refinement {
    let chain = &solution.chain;
    let mut hits: Vec<Hit> = chain.iter().map(|c| c.hit.clone()).collect();
    let mut junctions = Vec::with_capacity(chain.len().saturating_sub(1));
    let mut problems = Vec::new();
    let scorer = JunctionScorer::new(ctx);

    for n in 1..chain.len() {
        let (first, second) = (&chain[n - 1], &chain[n]);
        let delta = ctx.transcript.skipped_length(first.hit.part, second.hit.part);
        let variant = scorer.score(first, second, delta);
        match variant {
            Some(v) => {
                move_boundary(&mut hits[n - 1], v.donor_offset, Boundary::Donor, &mut problems);
                if v.kind == SpliceType::IntronLoss {
                    hits[n - 1].add_note("fused with next hit (intron loss)");
                } else {
                    hits[n - 1].add_note(format!("donor {:+} ({})", v.donor_offset, v.kind));
                    move_boundary(&mut hits[n], v.acceptor_offset, Boundary::Acceptor, &mut problems);
                    hits[n].add_note(format!("acceptor {:+} ({})", v.acceptor_offset, v.kind));
                }
            }
            None => {
                let problem = format!("no viable junction between hits {} and {}", n - 1, n);
                hits[n - 1].add_note(format!("problem: {problem}"));
                problems.push(problem);
            }
        }
        junctions.push(variant);
    }

    let last_part = ctx.parts() - 1;
    if let (Some(first), Some(hit)) = (chain.first(), hits.first_mut()) {
        let extension = first.profile.as_ref().and_then(|p| p.start);
        if let Some(ext) = extension.filter(|e| {
            e.offset != 0 && hit.part == 0 && ctx.transcript.requires_start_codon()
        }) {
            if move_boundary(hit, CODON_LENGTH * ext.offset, Boundary::Acceptor, &mut problems) {
                hit.add_note(format!("start codon {:+} residues", ext.offset));
            }
        }
    }
    if let (Some(last), Some(hit)) = (chain.last(), hits.last_mut()) {
        let extension = last.profile.as_ref().and_then(|p| p.stop);
        if let Some(ext) = extension.filter(|e| {
            e.offset != 0 && hit.part == last_part && ctx.transcript.requires_stop_codon()
        }) {
            if move_boundary(hit, CODON_LENGTH * ext.offset, Boundary::Donor, &mut problems) {
                hit.add_note(format!("stop codon {:+} residues", ext.offset));
            }
        }
    }

    if !problems.is_empty() {
        debug!(
            "{}: {} refinement problems on {}",
            ctx.transcript.id(),
            problems.len(),
            solution.contig
        );
    }
    Refinement {
        hits,
        junctions,
        problems,
    }
}

#[derive(Debug, Clone, Copy)]
enum Boundary {
    Donor,
    Acceptor,
}

/// Move one boundary of `hit` by `offset` bases unless that empties it.
fn move_boundary(hit: &mut Hit, offset: i64, boundary: Boundary, problems: &mut Vec<String>) -> bool {
    if hit.target_length() + offset <= 0 {
        let problem = format!(
            "{boundary:?} move {offset:+} would invert {}:{}-{}",
            hit.contig, hit.target_start, hit.target_end
        );
        hit.add_note(format!("problem: {problem}"));
        problems.push(problem);
        return false;
    }
    match boundary {
        Boundary::Donor => hit.apply_donor(offset),
        Boundary::Acceptor => hit.apply_acceptor(offset),
    }
    true
}
