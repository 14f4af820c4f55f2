use log::debug;

use crate::algorithms::context::{Candidate, ChainContext, PartCandidates};
use crate::algorithms::recovery::union_find::UnionFind;
use crate::constants::{
    CODON_LENGTH, FLANK_WINDOW_DIVISOR, MISSING_AA, READING_FRAMES, START_RESIDUE, STOP_RESIDUE,
};
use crate::hit::{Hit, HitRecord};
use crate::types::OrientedSpan;

/// Searches the genome for parts of the transcript that have no hit.
pub(crate) struct GapRecovery<'c, 'a> {
    ctx: &'c ChainContext<'a>,
    hit_threshold: f64,
}

impl<'c, 'a> GapRecovery<'c, 'a> {
    pub(crate) const fn new(ctx: &'c ChainContext<'a>, hit_threshold: f64) -> Self {
        Self { ctx, hit_threshold }
    }

    /// Recover parts missing between two parts with hits. Returns the number
    /// of new candidates.
    pub(crate) fn internal_gaps(&self, hits: &mut PartCandidates) -> usize {
        let present: Vec<usize> = (0..hits.len()).filter(|&p| !hits[p].is_empty()).collect();
        let mut added = 0;
        for pair in present.windows(2) {
            let (upstream, downstream) = (pair[0], pair[1]);
            if upstream + 1 == downstream {
                continue;
            }
            let regions = self.gap_regions(&hits[upstream], &hits[downstream], downstream - upstream);
            for region in regions {
                for part in upstream + 1..downstream {
                    let found = self.align_part(region, part, "internal");
                    added += found.len();
                    hits[part].extend(found);
                }
            }
        }
        added
    }

    /// Intervals between groups of flanking hits that may belong to one
    /// gene copy.
    fn gap_regions(&self, previous: &[Candidate], current: &[Candidate], parts: usize) -> Vec<OrientedSpan> {
        let limit = parts as i64 * self.ctx.scoring.max_intron_length;
        let offset = current.len();
        let mut sets = UnionFind::new(offset + previous.len());
        for (a, next) in current.iter().enumerate() {
            for (b, before) in previous.iter().enumerate() {
                let distance = next.span.start - before.span.end;
                if distance >= 0 && distance < limit {
                    sets.union(a, offset + b);
                }
            }
        }

        sets.components()
            .into_iter()
            .filter_map(|members| {
                let end = members
                    .iter()
                    .filter(|&&m| m >= offset)
                    .map(|&m| previous[m - offset].span.end)
                    .min()?;
                let start = members
                    .iter()
                    .filter(|&&m| m < offset)
                    .map(|&m| current[m].span.start)
                    .max()?;
                (start > end).then_some(OrientedSpan::new(end, start))
            })
            .collect()
    }

    /// Recover the parts before the first part with hits.
    pub(crate) fn leading_parts(&self, hits: &mut PartCandidates) -> usize {
        let Some(first) = hits.iter().position(|list| !list.is_empty()) else {
            return 0;
        };
        let window = self.flank_window();
        let mut anchors = Vec::new();
        let mut scale = 0;
        let mut added = 0;
        for index in (1..=first).rev() {
            if hits[index].is_empty() {
                scale += 1;
            } else {
                anchors = hits[index].iter().map(|c| c.span.start).collect();
                anchors.sort_unstable();
                scale = 1;
            }
            for (lowest, highest) in clusters(&anchors, window) {
                let region = self.clamp(lowest - scale * window, highest);
                let found = self.align_part(region, index - 1, "upstream");
                added += found.len();
                hits[index - 1].extend(found);
            }
        }
        added
    }

    /// Recover the parts after the last part with hits.
    pub(crate) fn trailing_parts(&self, hits: &mut PartCandidates) -> usize {
        let Some(last) = hits.iter().rposition(|list| !list.is_empty()) else {
            return 0;
        };
        let window = self.flank_window();
        let mut anchors = Vec::new();
        let mut scale = 0;
        let mut added = 0;
        for index in last..hits.len() - 1 {
            if hits[index].is_empty() {
                scale += 1;
            } else {
                anchors = hits[index].iter().map(|c| c.span.end).collect();
                anchors.sort_unstable();
                scale = 1;
            }
            for (lowest, highest) in clusters(&anchors, window) {
                let region = self.clamp(lowest, highest + scale * window);
                let found = self.align_part(region, index + 1, "downstream");
                added += found.len();
                hits[index + 1].extend(found);
            }
        }
        added
    }

    fn flank_window(&self) -> i64 {
        self.ctx.scoring.max_intron_length / FLANK_WINDOW_DIVISOR
    }

    fn clamp(&self, start: i64, end: i64) -> OrientedSpan {
        let start = start.max(0);
        OrientedSpan::new(start, end.min(self.ctx.contig.len()).max(start))
    }

    /// Local realignment of one part against every stop-free segment of the
    /// three reading frames of `region`.
    pub(crate) fn align_part(&self, region: OrientedSpan, part: usize, source: &str) -> Vec<Candidate> {
        let ctx = self.ctx;
        let contig = ctx.contig;
        let protein = ctx.transcript.part(part).protein.as_bytes();
        let find_start = part == 0 && protein.first() == Some(&START_RESIDUE);
        let keeps_stop = part + 1 == ctx.parts();
        let dna = contig.fetch(region.start, region.end);

        let mut best = 0_i64;
        let mut found: Vec<Hit> = Vec::new();
        for frame in 0..READING_FRAMES {
            if dna.len() < frame + CODON_LENGTH as usize {
                continue;
            }
            let translation = ctx.code.translate_lenient(&dna[frame..]);
            let pieces: Vec<usize> = translation
                .split(|&r| r == STOP_RESIDUE)
                .map(<[u8]>::len)
                .collect();
            let mut offset = 0;
            for (n, &length) in pieces.iter().enumerate() {
                let closed = n + 1 < pieces.len();
                let segment_start = offset;
                let segment = &translation[offset..offset + length + usize::from(closed && keeps_stop)];
                offset += length + usize::from(closed);

                if segment.is_empty()
                    || (find_start
                        && protein.len() <= 2 * MISSING_AA
                        && !segment.contains(&START_RESIDUE))
                {
                    continue;
                }

                let alignment = ctx.aligner.local(protein, segment);
                if alignment.score <= 0 || (alignment.score as f64) < self.hit_threshold * best as f64 {
                    continue;
                }
                if find_start {
                    let methionine = segment.iter().position(|&r| r == START_RESIDUE);
                    if alignment.x_start <= MISSING_AA
                        && !methionine.is_some_and(|m| m < alignment.y_end)
                    {
                        continue;
                    }
                }

                let start = region.start
                    + frame as i64
                    + CODON_LENGTH * (segment_start + alignment.y_start) as i64;
                let span = OrientedSpan::new(
                    start,
                    start + CODON_LENGTH * (alignment.y_end - alignment.y_start) as i64,
                );
                let (genomic_start, genomic_end) = contig.to_genomic(span);
                let (target_start, target_end) = if contig.is_forward() {
                    (genomic_start, genomic_end)
                } else {
                    (genomic_end, genomic_start)
                };
                let record = HitRecord {
                    part,
                    contig: contig.id().to_string(),
                    target_start,
                    target_end,
                    query_start: alignment.x_start + 1,
                    query_end: alignment.x_end,
                    query_length: protein.len(),
                    score: alignment.score,
                    aligned_query: String::from_utf8_lossy(&alignment.aligned_x).into_owned(),
                    aligned_target: String::from_utf8_lossy(&alignment.aligned_y).into_owned(),
                };
                match Hit::from_record(record) {
                    Ok(mut hit) => {
                        hit.add_note(format!("recovered {source}"));
                        best = best.max(hit.score);
                        found.push(hit);
                    }
                    Err(error) => debug!("Skipping recovered alignment: {error}"),
                }
            }
        }

        found.retain(|hit| hit.score as f64 >= self.hit_threshold * best as f64);
        if !found.is_empty() {
            debug!(
                "Recovered {} candidates for part {} ({source}) in {}..{}",
                found.len(),
                part,
                region.start,
                region.end
            );
        }
        found
            .into_iter()
            .filter_map(|hit| Candidate::new(hit, contig).ok())
            .collect()
    }
}

/// Sorted positions grouped where consecutive ones are at most `window`
/// apart, as `(lowest, highest)` pairs.
fn clusters(sorted: &[i64], window: i64) -> Vec<(i64, i64)> {
    let mut groups = Vec::new();
    let mut iter = sorted.iter().copied();
    let Some(first) = iter.next() else {
        return groups;
    };
    let (mut lowest, mut highest) = (first, first);
    for position in iter {
        if position - highest > window {
            groups.push((lowest, highest));
            lowest = position;
        }
        highest = position;
    }
    groups.push((lowest, highest));
    groups
}
