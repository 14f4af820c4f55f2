use crate::algorithms::dynamic_programming::{
    DpEntry, DpPass, JunctionCache, JunctionEntry, JunctionScorer, PassMode,
};
use crate::constants::MAX_SAME_PART_OVERLAP;

impl DpPass<'_, '_> {
    /// Run the forward recursion and return the best chain value, or `None`
    /// if the pass has no candidates.
    pub fn run(&mut self) -> Option<i64> {
        self.initialize_table();
        let parts = self.hits.len();
        let max_gap = self.ctx.scoring.max_gap;

        for i in (0..parts).rev() {
            for j in (0..self.hits[i].len()).rev() {
                let mut best = self.end_cost(i, j);
                for k in i..(i + max_gap).min(parts) {
                    let from = if k == i { j + 1 } else { 0 };
                    if let Some(value) = self.best_continuation(i, j, k, from) {
                        best = best.max(value);
                    }
                }
                self.table[i][j].sum = self.hits[i][j].hit.score + best;
            }
        }

        self.select_best();
        self.best
    }

    fn initialize_table(&mut self) {
        self.table = self
            .hits
            .iter()
            .map(|list| {
                list.iter()
                    .map(|c| DpEntry {
                        sum: 0,
                        start: c.span.start,
                        end: c.span.end,
                        query_start: c.hit.query_start,
                        query_end: c.hit.query_end,
                    })
                    .collect()
            })
            .collect();
        self.cache = match self.mode {
            PassMode::Coarse => None,
            PassMode::Spliced => Some(JunctionCache::new(
                self.hits.iter().map(Vec::len).collect(),
            )),
        };
    }

    /// Best `junction + sums` over the hits `from..` of part `k`.
    fn best_continuation(&mut self, i: usize, j: usize, k: usize, from: usize) -> Option<i64> {
        let limit = self.distance_limit(i, k);
        let end = self.table[i][j].end;
        let mut best: Option<i64> = None;
        for m in from..self.hits[k].len() {
            if self.table[k][m].start - end >= limit {
                if let Some(cache) = self.cache.as_mut() {
                    cache.mark_unreachable_from(i, j, k, m);
                }
                break;
            }
            if !self.is_reachable(i, j, k, m) {
                if let Some(cache) = self.cache.as_mut() {
                    cache.set(i, j, k, m, JunctionEntry::Unreachable);
                }
                continue;
            }
            if let Some(junction) = self.junction(i, j, k, m) {
                let value = junction + self.table[k][m].sum;
                best = Some(best.map_or(value, |b| b.max(value)));
            }
        }
        best
    }

    /// Scan the table for the best chain value including the start cost.
    pub(super) fn select_best(&mut self) {
        let mut best = None;
        let mut starts = Vec::new();
        for (i, row) in self.table.iter().enumerate() {
            for (j, entry) in row.iter().enumerate() {
                let value = entry.sum + self.start_cost(i, j);
                match best {
                    Some(b) if value < b => {}
                    Some(b) if value == b => starts.push((i, j)),
                    _ => {
                        best = Some(value);
                        starts = vec![(i, j)];
                    }
                }
            }
        }
        self.best = best;
        self.best_starts = starts;
    }

    /// Genomic distance bound for a jump from part `i` to part `k`
    pub(super) fn distance_limit(&self, i: usize, k: usize) -> i64 {
        (k - i).max(1) as i64 * self.ctx.scoring.max_intron_length
    }

    /// Whether hit `(k, m)` may directly follow hit `(i, j)` in a chain.
    #[must_use]
    pub fn is_reachable(&self, i: usize, j: usize, k: usize, m: usize) -> bool {
        let first = &self.table[i][j];
        let second = &self.table[k][m];
        second.start > first.start
            && second.end > first.end
            && (k > i
                || (first.query_start < second.query_start && first.query_end < second.query_end))
    }

    fn overlaps_too_much(&self, i: usize, j: usize, k: usize, m: usize) -> bool {
        if k != i {
            return false;
        }
        let first = &self.table[i][j];
        let second = &self.table[k][m];
        // residues of the upstream hit past the start of the downstream one
        let overlap = first.query_end.saturating_sub(second.query_start) as f64;
        let shorter = (first.query_end - first.query_start + 1)
            .min(second.query_end - second.query_start + 1) as f64;
        overlap > MAX_SAME_PART_OVERLAP * shorter
    }

    /// Cost of starting a chain at `(i, j)`.
    #[must_use]
    pub fn start_cost(&self, i: usize, j: usize) -> i64 {
        if self.mode == PassMode::Coarse {
            return 0;
        }
        let candidate = &self.hits[i][j];
        if i == 0 {
            candidate.profile.as_ref().map_or(0, |p| p.start_score())
        } else {
            let missing =
                candidate.hit.query_start - 1 + self.ctx.transcript.cumulative_length(i);
            self.ctx.scoring.gap_cost(missing, i as i64 - 1)
        }
    }

    /// Cost of ending a chain at `(i, j)`.
    #[must_use]
    pub fn end_cost(&self, i: usize, j: usize) -> i64 {
        if self.mode == PassMode::Coarse {
            return 0;
        }
        let candidate = &self.hits[i][j];
        let last = self.hits.len() - 1;
        if i == last {
            candidate.profile.as_ref().map_or(0, |p| p.stop_score())
        } else {
            let missing = candidate
                .hit
                .query_length
                .saturating_sub(candidate.hit.query_end)
                + self.ctx.transcript.remaining_length(i);
            self.ctx.scoring.gap_cost(missing, (last - i) as i64)
        }
    }

    /// Junction value of an evaluated pair, without computing anything.
    #[must_use]
    pub fn junction_value(&self, i: usize, j: usize, k: usize, m: usize) -> Option<i64> {
        match self.mode {
            PassMode::Coarse => (!self.overlaps_too_much(i, j, k, m)).then_some(0),
            PassMode::Spliced => self
                .cache
                .as_ref()
                .and_then(|cache| cache.get(i, j, k, m).score()),
        }
    }

    fn junction(&mut self, i: usize, j: usize, k: usize, m: usize) -> Option<i64> {
        if self.mode == PassMode::Coarse {
            return self.junction_value(i, j, k, m);
        }
        let cache = self.cache.as_mut()?;
        match cache.get(i, j, k, m) {
            JunctionEntry::Score(score) => Some(score),
            JunctionEntry::Unreachable => None,
            JunctionEntry::Pending => {
                let delta = self.ctx.transcript.skipped_length(i, k);
                let value = JunctionScorer::new(self.ctx)
                    .score(&self.hits[i][j], &self.hits[k][m], delta)
                    .map(|variant| variant.score);
                cache.set(i, j, k, m, value.into());
                value
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use bio::bio_types::strand::Strand;

    use crate::algorithms::context::{Candidate, ChainContext, PartCandidates};
    use crate::algorithms::dynamic_programming::{DpPass, PassMode};
    use crate::align::SubstitutionAligner;
    use crate::config::ScoringConfig;
    use crate::hit::{Hit, HitRecord, Part, Transcript};
    use crate::sequence::{GeneticCode, OrientedContig};
    use crate::splice::SpliceSiteModel;

    fn create_test_candidate(
        contig: &OrientedContig<'_>,
        part: usize,
        start: i64,
        query: (usize, usize),
        score: i64,
    ) -> Candidate {
        let residues = query.1 - query.0 + 1;
        let aligned = "A".repeat(residues);
        let hit = Hit::from_record(HitRecord {
            part,
            contig: "chr1".to_string(),
            target_start: start,
            target_end: start + 3 * residues as i64 - 1,
            query_start: query.0,
            query_end: query.1,
            query_length: 10,
            score,
            aligned_query: aligned.clone(),
            aligned_target: aligned,
        })
        .unwrap();
        Candidate::new(hit, contig).unwrap()
    }

    fn with_coarse_pass<R>(
        build: impl FnOnce(&OrientedContig<'_>) -> PartCandidates,
        f: impl FnOnce(&mut DpPass<'_, '_>) -> R,
    ) -> R {
        let transcript = Transcript::new(
            "t1",
            vec![
                Part::new("e1", "AAAAAAAAAA"),
                Part::new("e2", "AAAAAAAAAA"),
                Part::new("e3", "AAAAAAAAAA"),
            ],
        )
        .unwrap();
        let scoring = ScoringConfig {
            max_intron_length: 1000,
            ..Default::default()
        };
        let sequence = vec![b'A'; 20_000];
        let contig = OrientedContig::new("chr1", &sequence, Strand::Forward);
        let aligner = SubstitutionAligner::default();
        let code = GeneticCode::standard();
        let model = SpliceSiteModel::Consensus;
        let ctx = ChainContext {
            transcript: &transcript,
            scoring: &scoring,
            contig: &contig,
            aligner: &aligner,
            code: &code,
            splice_model: &model,
        };
        let hits = build(&contig);
        let mut pass = DpPass::new(&ctx, hits, PassMode::Coarse);
        f(&mut pass)
    }

    #[test]
    fn test_coarse_chain_sums_scores() {
        with_coarse_pass(
            |contig| {
                vec![
                    vec![create_test_candidate(contig, 0, 1, (1, 10), 30)],
                    vec![create_test_candidate(contig, 1, 200, (1, 10), 40)],
                    vec![create_test_candidate(contig, 2, 400, (1, 10), 50)],
                ]
            },
            |pass| {
                assert_eq!(pass.run(), Some(120));
                assert_eq!(pass.best_starts(), &[(0, 0)]);
                assert_eq!(pass.table()[1][0].sum, 90);
            },
        );
    }

    #[test]
    fn test_distance_bound_breaks_chain() {
        with_coarse_pass(
            |contig| {
                vec![
                    vec![create_test_candidate(contig, 0, 1, (1, 10), 30)],
                    vec![create_test_candidate(contig, 1, 2000, (1, 10), 40)],
                    vec![],
                ]
            },
            |pass| {
                assert_eq!(pass.run(), Some(40));
                assert_eq!(pass.table()[0][0].sum, 30);
            },
        );
    }

    #[test]
    fn test_upstream_hit_is_unreachable() {
        with_coarse_pass(
            |contig| {
                vec![
                    vec![create_test_candidate(contig, 0, 300, (1, 10), 30)],
                    vec![create_test_candidate(contig, 1, 290, (1, 10), 40)],
                    vec![],
                ]
            },
            |pass| {
                pass.run();
                assert!(!pass.is_reachable(0, 0, 1, 0));
                assert_eq!(pass.table()[0][0].sum, 30);
                assert_eq!(pass.best(), Some(40));
            },
        );
    }

    #[test]
    fn test_same_part_overlap_at_half_is_chained() {
        with_coarse_pass(
            |contig| {
                vec![
                    vec![
                        create_test_candidate(contig, 0, 1, (1, 4), 30),
                        create_test_candidate(contig, 0, 100, (2, 6), 30),
                    ],
                    vec![],
                    vec![],
                ]
            },
            |pass| {
                pass.run();
                assert_eq!(pass.junction_value(0, 0, 0, 1), Some(0));
                assert_eq!(pass.best(), Some(60));
            },
        );
    }

    #[test]
    fn test_same_part_overlap_not_chained() {
        with_coarse_pass(
            |contig| {
                vec![
                    vec![
                        create_test_candidate(contig, 0, 1, (1, 6), 30),
                        create_test_candidate(contig, 0, 100, (2, 8), 30),
                        create_test_candidate(contig, 0, 200, (7, 10), 30),
                    ],
                    vec![],
                    vec![],
                ]
            },
            |pass| {
                pass.run();
                assert!(pass.is_reachable(0, 0, 0, 1));
                assert_eq!(pass.junction_value(0, 0, 0, 1), None);
                assert_eq!(pass.junction_value(0, 0, 0, 2), Some(0));
                assert_eq!(pass.table()[0][0].sum, 60);
                assert_eq!(pass.best(), Some(60));
            },
        );
    }
}
