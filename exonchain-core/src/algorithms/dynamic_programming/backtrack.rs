use crate::algorithms::dynamic_programming::DpPass;
use crate::constants::MAX_TRACED_CHAINS;

/// Positions `(part, hit)` of one chain, in chain order, with its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainPath {
    pub steps: Vec<(usize, usize)>,
    pub value: i64,
}

impl DpPass<'_, '_> {
    /// Replay the recursion from every best start and hand each chain
    /// attaining the best value to `visit`, at most `limit` of them.
    ///
    /// Returns `false` if tracing stopped at the limit.
    pub fn trace_best(&self, limit: usize, mut visit: impl FnMut(ChainPath)) -> bool {
        let Some(best) = self.best else {
            return true;
        };
        let mut path = Vec::new();
        let mut budget = limit;
        for &(i, j) in &self.best_starts {
            if !self.trace(i, j, best, &mut path, &mut budget, &mut visit) {
                return false;
            }
        }
        true
    }

    /// All chains attaining the best value, up to [`MAX_TRACED_CHAINS`]
    #[must_use]
    pub fn best_chains(&self) -> Vec<ChainPath> {
        let mut chains = Vec::new();
        self.trace_best(MAX_TRACED_CHAINS, |chain| chains.push(chain));
        chains
    }

    /// Depth-first replay below `(i, j)`; `false` once the budget is spent.
    fn trace(
        &self,
        i: usize,
        j: usize,
        value: i64,
        path: &mut Vec<(usize, usize)>,
        budget: &mut usize,
        visit: &mut dyn FnMut(ChainPath),
    ) -> bool {
        if *budget == 0 {
            return false;
        }
        path.push((i, j));
        let entry = self.table[i][j];
        let remaining = entry.sum - self.hits[i][j].hit.score;
        if remaining == self.end_cost(i, j) {
            visit(ChainPath {
                steps: path.clone(),
                value,
            });
            *budget -= 1;
        }

        let parts = self.hits.len();
        for k in i..(i + self.ctx.scoring.max_gap).min(parts) {
            let limit = self.distance_limit(i, k);
            let from = if k == i { j + 1 } else { 0 };
            for m in from..self.hits[k].len() {
                if self.table[k][m].start - entry.end >= limit {
                    break;
                }
                if !self.is_reachable(i, j, k, m) {
                    continue;
                }
                if self.junction_value(i, j, k, m).map(|junction| junction + self.table[k][m].sum)
                    == Some(remaining)
                    && !self.trace(k, m, value, path, budget, visit)
                {
                    path.pop();
                    return false;
                }
            }
        }
        path.pop();
        true
    }

    /// Value of an explicit chain: hit scores, junctions and both terminal
    /// costs. `None` if two consecutive steps cannot be joined.
    #[must_use]
    pub fn chain_value(&self, steps: &[(usize, usize)]) -> Option<i64> {
        let &(first_part, first_hit) = steps.first()?;
        let &(last_part, last_hit) = steps.last()?;
        let mut value = self.start_cost(first_part, first_hit) + self.end_cost(last_part, last_hit);
        for &(i, j) in steps {
            value += self.hits[i][j].hit.score;
        }
        for pair in steps.windows(2) {
            let (i, j) = pair[0];
            let (k, m) = pair[1];
            let in_range = k >= i
                && k < i + self.ctx.scoring.max_gap
                && (k > i || m > j)
                && self.table[k][m].start - self.table[i][j].end < self.distance_limit(i, k);
            if !in_range || !self.is_reachable(i, j, k, m) {
                return None;
            }
            value += self.junction_value(i, j, k, m)?;
        }
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use bio::bio_types::strand::Strand;

    use crate::algorithms::context::{Candidate, ChainContext};
    use crate::algorithms::dynamic_programming::{ChainPath, DpPass, PassMode};
    use crate::align::SubstitutionAligner;
    use crate::config::ScoringConfig;
    use crate::hit::{Hit, HitRecord, Part, Transcript};
    use crate::sequence::{GeneticCode, OrientedContig};
    use crate::splice::SpliceSiteModel;

    fn create_test_candidate(contig: &OrientedContig<'_>, part: usize, start: i64, score: i64) -> Candidate {
        let hit = Hit::from_record(HitRecord {
            part,
            contig: "chr1".to_string(),
            target_start: start,
            target_end: start + 14,
            query_start: 1,
            query_end: 5,
            query_length: 5,
            score,
            aligned_query: "AAAAA".to_string(),
            aligned_target: "AAAAA".to_string(),
        })
        .unwrap();
        Candidate::new(hit, contig).unwrap()
    }

    fn with_chains<R>(starts: &[(usize, i64, i64)], f: impl FnOnce(&mut DpPass<'_, '_>) -> R) -> R {
        let transcript = Transcript::new(
            "t1",
            vec![
                Part::new("e1", "AAAAA"),
                Part::new("e2", "AAAAA"),
                Part::new("e3", "AAAAA"),
            ],
        )
        .unwrap();
        let scoring = ScoringConfig::default();
        let sequence = vec![b'A'; 3_000];
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
        let mut hits = vec![Vec::new(); 3];
        for &(part, start, score) in starts {
            hits[part].push(create_test_candidate(&contig, part, start, score));
        }
        let mut pass = DpPass::new(&ctx, hits, PassMode::Coarse);
        f(&mut pass)
    }

    #[test]
    fn test_best_chain_follows_table() {
        with_chains(&[(0, 1, 20), (1, 200, 30), (1, 400, 35), (2, 300, 25)], |pass| {
            assert_eq!(pass.run(), Some(75));
            let chains = pass.best_chains();
            assert_eq!(
                chains,
                vec![ChainPath {
                    steps: vec![(0, 0), (1, 0), (2, 0)],
                    value: 75,
                }]
            );
            assert_eq!(pass.chain_value(&chains[0].steps), Some(75));
        });
    }

    #[test]
    fn test_ties_yield_every_chain() {
        with_chains(&[(0, 1, 20), (1, 200, 30), (1, 600, 30)], |pass| {
            assert_eq!(pass.run(), Some(50));
            let chains = pass.best_chains();
            assert_eq!(chains.len(), 2);
            assert!(chains.iter().all(|c| c.value == 50 && c.steps[0] == (0, 0)));
        });
    }

    #[test]
    fn test_tracing_stops_at_limit() {
        // two tied hits per part give eight co-optimal chains
        let hits = [(0, 1, 10), (0, 50, 10), (1, 200, 10), (1, 260, 10), (2, 400, 10), (2, 460, 10)];
        with_chains(&hits, |pass| {
            assert_eq!(pass.run(), Some(30));
            assert_eq!(pass.best_chains().len(), 8);

            let mut traced = Vec::new();
            assert!(!pass.trace_best(3, |chain| traced.push(chain)));
            assert_eq!(traced.len(), 3);
            assert!(traced.iter().all(|c| c.steps.len() == 3 && c.value == 30));
            assert!(pass.trace_best(8, |_| {}));
        });
    }

    #[test]
    fn test_chain_value_rejects_upstream_step() {
        with_chains(&[(0, 500, 20), (1, 100, 30)], |pass| {
            pass.run();
            assert_eq!(pass.chain_value(&[(0, 0), (1, 0)]), None);
            assert_eq!(pass.chain_value(&[(1, 0)]), Some(30));
            assert_eq!(pass.chain_value(&[]), None);
        });
    }
}
