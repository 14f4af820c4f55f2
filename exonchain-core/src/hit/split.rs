use crate::align::PairwiseAligner;
use crate::constants::{CODON_LENGTH, GAP, STOP_RESIDUE};
use crate::hit::Hit;

/// Split a hit at in-frame stop codons of its aligned target.
///
/// Columns where the target has `*` but the query does not separate the
/// pieces. Each piece is trimmed to start and end with an aligned column
/// pair and kept only if its re-scored alignment is positive. A hit without
/// such a stop is returned unchanged.
pub fn split_at_stops(hit: &Hit, aligner: &dyn PairwiseAligner) -> Vec<Hit> {
    let columns = hit.aligned_target.len();
    let is_break =
        |c: usize| hit.aligned_target[c] == STOP_RESIDUE && hit.aligned_query[c] != STOP_RESIDUE;
    if !(0..columns).any(is_break) {
        return vec![hit.clone()];
    }

    // query position and target offset (bp) before each column
    let mut query_before = Vec::with_capacity(columns + 1);
    let mut offset_before = Vec::with_capacity(columns + 1);
    let (mut query, mut offset) = (hit.query_start, 0);
    for c in 0..columns {
        query_before.push(query);
        offset_before.push(offset);
        if hit.aligned_query[c] != GAP {
            query += 1;
        }
        if hit.aligned_target[c] != GAP {
            offset += CODON_LENGTH;
        }
    }
    query_before.push(query);
    offset_before.push(offset);

    let is_pair = |c: usize| hit.aligned_target[c] != GAP && hit.aligned_query[c] != GAP;
    let mut pieces = Vec::new();
    let mut from = 0;
    for to in (0..columns).filter(|&c| is_break(c)).chain(std::iter::once(columns)) {
        let mut lo = from;
        let mut hi = to;
        while lo < hi && !is_pair(lo) {
            lo += 1;
        }
        while hi > lo && !is_pair(hi - 1) {
            hi -= 1;
        }
        if lo < hi {
            let aligned_query = hit.aligned_query[lo..hi].to_vec();
            let aligned_target = hit.aligned_target[lo..hi].to_vec();
            let score = aligner.score_columns(&aligned_query, &aligned_target);
            if score > 0 {
                let mut piece = hit.sub_hit(
                    offset_before[lo],
                    offset_before[hi] - offset_before[lo],
                    (query_before[lo], query_before[hi] - 1),
                    score,
                    aligned_query,
                    aligned_target,
                );
                piece.add_note("split at stop");
                pieces.push(piece);
            }
        }
        from = to + 1;
    }
    pieces
}
