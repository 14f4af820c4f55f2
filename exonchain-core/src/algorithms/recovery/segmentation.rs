use std::ops::Range;

use crate::algorithms::context::{Candidate, PartCandidates};
use crate::constants::{INFORMATIVE_COVERAGE, MIN_INFORMATIVE_LENGTH};

/// Whether a hit covers most of its part (or of a minimum length for short
/// parts).
pub(crate) fn is_informative(candidate: &Candidate) -> bool {
    let length = candidate.hit.query_length.max(MIN_INFORMATIVE_LENGTH);
    candidate.query_span() as f64 / length as f64 >= INFORMATIVE_COVERAGE
}

/// All candidates in transcription order.
pub(crate) fn in_transcription_order(hits: &PartCandidates) -> Vec<&Candidate> {
    let mut ordered: Vec<&Candidate> = hits.iter().flatten().collect();
    ordered.sort_by_key(|c| (c.span.start, c.span.end, c.hit.part));
    ordered
}

/// Split ordered candidates into regions, one per copy of the gene.
///
/// A new region starts whenever an informative hit does not advance in part
/// order over the previous informative hit. Consecutive regions share the
/// hits found between the two informative hits around the break.
pub(crate) fn segment(ordered: &[&Candidate]) -> Vec<Range<usize>> {
    let mut regions = Vec::new();
    let mut region_start = 0;
    let mut previous: Option<(usize, usize)> = None;
    for (index, candidate) in ordered.iter().enumerate() {
        if !is_informative(candidate) {
            continue;
        }
        let part = candidate.hit.part;
        if let Some((previous_index, previous_part)) = previous {
            if previous_part >= part {
                regions.push(region_start..index);
                region_start = previous_index + 1;
            }
        }
        previous = Some((index, part));
    }
    regions.push(region_start..ordered.len());
    regions
}

/// Candidates of `range`, indexed by part again.
pub(crate) fn regroup(ordered: &[&Candidate], range: Range<usize>, parts: usize) -> PartCandidates {
    let mut hits: PartCandidates = vec![Vec::new(); parts];
    for candidate in &ordered[range] {
        hits[candidate.hit.part].push((*candidate).clone());
    }
    hits
}
