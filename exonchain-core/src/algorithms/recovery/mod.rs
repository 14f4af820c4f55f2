//! Region segmentation and recovery of missing parts.
//!
//! After the coarse pass of one contig/strand, the surviving hits are split
//! into regions, one per gene copy. Every qualifying region is completed by
//! realigning the parts without a hit against the genome around the present
//! hits, then chained with the spliced pass.

mod gap_filling;
mod segmentation;
mod union_find;

use log::{debug, warn};

use crate::algorithms::context::{sort_candidates, Candidate, ChainContext, PartCandidates};
use crate::algorithms::dynamic_programming::{DpPass, PassMode};
use crate::config::PredictorConfig;
use crate::constants::{MAX_RECOVERED_PER_PART, MAX_TRACED_CHAINS};
use crate::hit::split_at_stops;
use crate::solution::Solution;
use crate::types::strand_symbol;

use gap_filling::GapRecovery;
use segmentation::{in_transcription_order, regroup, segment};

/// Best coarse chain value of `hits`, which must be sorted per part.
#[must_use]
pub fn coarse_score(ctx: &ChainContext<'_>, hits: PartCandidates) -> Option<i64> {
    DpPass::new(ctx, hits, PassMode::Coarse).run()
}

/// Analyse all hits of one contig/strand and return the best solution of
/// every qualifying region.
///
/// Hits below `hit_threshold` of the best coarse chain are discarded first.
/// If the remaining hits form several regions, each region scoring at least
/// `region_threshold` of the best coarse chain is analysed on its own; if
/// none does, all hits are analysed together and the solution is flagged as
/// a fallback.
#[must_use]
pub fn analyse_strand(
    ctx: &ChainContext<'_>,
    config: &PredictorConfig,
    hits: PartCandidates,
) -> Vec<Solution> {
    let mut pass = DpPass::new(ctx, hits, PassMode::Coarse);
    let Some(best) = pass.run() else {
        return Vec::new();
    };
    pass.reduce(best as f64 * config.hit_threshold);

    let mut filtered = pass.into_hits();
    if config.avoid_stop {
        filtered = split_candidates(ctx, filtered);
    }
    sort_candidates(&mut filtered);

    let ordered = in_transcription_order(&filtered);
    let regions = segment(&ordered);
    debug!(
        "{}{}: {} hits in {} regions, coarse best {}",
        ctx.contig.id(),
        strand_symbol(ctx.contig.strand()),
        ordered.len(),
        regions.len(),
        best
    );

    let mut fallback = false;
    if regions.len() > 1 {
        let threshold = best as f64 * config.region_threshold;
        let solutions: Vec<Solution> = regions
            .into_iter()
            .filter_map(|range| {
                let mut region = regroup(&ordered, range.clone(), ctx.parts());
                sort_candidates(&mut region);
                match coarse_score(ctx, region.clone()) {
                    Some(score) if score as f64 >= threshold => {
                        analyse_region(ctx, config, region, false)
                    }
                    _ => {
                        debug!("Discarding region {}..{}", range.start, range.end);
                        None
                    }
                }
            })
            .collect();
        if !solutions.is_empty() {
            return solutions;
        }
        fallback = true;
    }

    let all = regroup(&ordered, 0..ordered.len(), ctx.parts());
    analyse_region(ctx, config, all, fallback)
        .into_iter()
        .collect()
}

/// Complete one region with recovered parts and chain it with the spliced
/// pass. Returns the best-ranked chain, if any.
#[must_use]
pub fn analyse_region(
    ctx: &ChainContext<'_>,
    config: &PredictorConfig,
    mut hits: PartCandidates,
    fallback: bool,
) -> Option<Solution> {
    let previous: Vec<usize> = hits.iter().map(Vec::len).collect();
    let recovery = GapRecovery::new(ctx, config.hit_threshold);
    let internal = recovery.internal_gaps(&mut hits);
    let leading = recovery.leading_parts(&mut hits);
    let trailing = recovery.trailing_parts(&mut hits);
    debug!("Recovered {internal} internal, {leading} leading and {trailing} trailing candidates");

    let mut truncated = false;
    for (part, list) in hits.iter_mut().enumerate() {
        if list.len() - previous[part] > MAX_RECOVERED_PER_PART {
            warn!(
                "{}: discarding {} recovered candidates of part {}",
                ctx.transcript.id(),
                list.len() - previous[part],
                part
            );
            list.truncate(previous[part]);
            truncated = true;
        }
    }

    for candidate in hits.iter_mut().flatten() {
        candidate.prepare(ctx);
    }
    sort_candidates(&mut hits);

    let mut pass = DpPass::new(ctx, hits, PassMode::Spliced);
    let best = pass.run()?;
    let summary = pass.reduce(best as f64);
    debug!(
        "Spliced pass: best {best}, {} of {} hits on best chains",
        summary.after, summary.before
    );

    let mut winner: Option<Solution> = None;
    let complete = pass.trace_best(MAX_TRACED_CHAINS, |path| {
        let chain: Vec<Candidate> = path
            .steps
            .iter()
            .map(|&(i, j)| pass.hits()[i][j].clone())
            .collect();
        let solution = Solution::from_chain(ctx.contig, chain, path.value, fallback, truncated);
        if winner
            .as_ref()
            .map_or(true, |current| solution.rank_cmp(current).is_gt())
        {
            winner = Some(solution);
        }
    });
    if !complete {
        warn!("Ranked only the first {MAX_TRACED_CHAINS} co-optimal chains");
    }
    winner
}

/// Split every candidate at in-frame stop codons of its alignment.
fn split_candidates(ctx: &ChainContext<'_>, hits: PartCandidates) -> PartCandidates {
    let contig = ctx.contig;
    hits.into_iter()
        .map(|list| {
            list.into_iter()
                .flat_map(|candidate| split_at_stops(&candidate.hit, ctx.aligner))
                .filter_map(|hit| Candidate::new(hit, contig).ok())
                .collect()
        })
        .collect()
}
