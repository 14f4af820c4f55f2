use crate::algorithms::context::ChainContext;
use crate::constants::{CODON_LENGTH, GAP, START_RESIDUE, STOP_RESIDUE};
use crate::hit::Hit;
use crate::splice::profile::CodonExtension;
use crate::types::OrientedSpan;

/// Residues by which a first-part hit moves to reach a start codon.
///
/// Positive values extend upstream to the `M` of `upstream` whose alignment
/// with the missing query prefix is best; negative values shorten the hit to
/// its first internal `M`.
fn start_offset(ctx: &ChainContext<'_>, hit: &Hit, span: OrientedSpan, upstream: &[u8]) -> i64 {
    let aligned = &hit.aligned_target;
    if aligned.first() == Some(&START_RESIDUE) && hit.query_start == 1 {
        return 0;
    }

    if upstream.contains(&START_RESIDUE) {
        let protein = ctx.transcript.part(hit.part).protein.as_bytes();
        let missing: Vec<u8> = protein[..(hit.query_start - 1).min(protein.len())]
            .iter()
            .rev()
            .copied()
            .collect();
        // nearest residue first
        let reversed: Vec<u8> = upstream.iter().rev().copied().collect();

        let mut best = (aligned.first() == Some(&START_RESIDUE))
            .then(|| (-ctx.aligner.gap_cost(missing.len()), -1_i64));
        for (index, _) in reversed
            .iter()
            .enumerate()
            .filter(|(_, &r)| r == START_RESIDUE)
        {
            let score = ctx.aligner.global_score(&missing, &reversed[..=index]);
            if best.map_or(true, |(value, _)| score > value) {
                best = Some((score, index as i64));
            }
        }
        return best.map_or(0, |(_, index)| index + 1);
    }

    match aligned.iter().position(|&r| r == START_RESIDUE) {
        Some(column) if column > 0 => {
            let gaps = aligned[..column].iter().filter(|&&r| r == GAP).count();
            let residues = (column - gaps) as i64;
            if span.len() > CODON_LENGTH * residues {
                -residues
            } else {
                0
            }
        }
        _ => 0,
    }
}

/// Start-codon extension of a hit of the first part.
pub(crate) fn start_extension(
    ctx: &ChainContext<'_>,
    hit: &Hit,
    span: OrientedSpan,
    upstream: &[u8],
) -> CodonExtension {
    let offset = start_offset(ctx, hit, span, upstream);
    let dna = ctx.contig.fetch(span.start - CODON_LENGTH * offset, span.end);
    let translation = ctx.code.translate_lenient(&dna);
    let protein = ctx.transcript.part(hit.part).protein.as_bytes();
    let query = &protein[..hit.query_end.min(protein.len())];
    CodonExtension {
        offset,
        score: ctx.aligner.global_score(query, &translation) - hit.score,
        first_residue: translation.first().copied(),
    }
}

/// Stop-codon extension of a hit of the last part.
pub(crate) fn stop_extension(
    ctx: &ChainContext<'_>,
    hit: &Hit,
    span: OrientedSpan,
    downstream: &[u8],
) -> CodonExtension {
    let reaches_stop = hit.aligned_target.last() != Some(&STOP_RESIDUE)
        && downstream.last() == Some(&STOP_RESIDUE);
    if !reaches_stop {
        return CodonExtension {
            offset: 0,
            score: 0,
            first_residue: None,
        };
    }

    let offset = downstream.len() as i64;
    let dna = ctx
        .contig
        .fetch(span.start, span.end + CODON_LENGTH * offset);
    let translation = ctx.code.translate_lenient(&dna);
    let protein = ctx.transcript.part(hit.part).protein.as_bytes();
    let query = &protein[(hit.query_start - 1).min(protein.len())..];
    CodonExtension {
        offset,
        score: ctx.aligner.global_score(query, &translation) - hit.score,
        first_residue: None,
    }
}
