use log::debug;

use crate::algorithms::dynamic_programming::DpPass;

/// Hit counts around a reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReductionSummary {
    pub before: usize,
    pub after: usize,
}

impl ReductionSummary {
    /// Number of hits discarded
    #[must_use]
    pub const fn removed(&self) -> usize {
        self.before - self.after
    }
}

impl DpPass<'_, '_> {
    /// Discard every hit that takes part in no chain worth at least
    /// `threshold`, compacting table and cache over the survivors.
    ///
    /// Must follow [`DpPass::run`].
    pub fn reduce(&mut self, threshold: f64) -> ReductionSummary {
        let before = self.hit_count();
        let mut used: Vec<Vec<f64>> = self
            .hits
            .iter()
            .map(|list| vec![f64::NEG_INFINITY; list.len()])
            .collect();

        for i in 0..self.table.len() {
            for j in 0..self.table[i].len() {
                let slack = (self.table[i][j].sum + self.start_cost(i, j)) as f64 - threshold;
                self.mark(i, j, slack, &mut used);
            }
        }

        let keep: Vec<Vec<bool>> = used
            .iter()
            .map(|row| row.iter().map(|&slack| slack > f64::NEG_INFINITY).collect())
            .collect();
        self.retain(&keep);
        self.select_best();

        let summary = ReductionSummary {
            before,
            after: self.hit_count(),
        };
        debug!(
            "Reduced {} hits to {} at threshold {:.1}",
            summary.before, summary.after, threshold
        );
        summary
    }

    /// Mark `(i, j)` and every continuation that stays within `slack` of
    /// the best chain through it.
    fn mark(&self, i: usize, j: usize, slack: f64, used: &mut [Vec<f64>]) {
        if slack < 0.0 || slack <= used[i][j] {
            return;
        }
        used[i][j] = slack;

        let entry = self.table[i][j];
        let rest = slack - (entry.sum - self.hits[i][j].hit.score) as f64;
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
                if let Some(junction) = self.junction_value(i, j, k, m) {
                    let next = rest + (junction + self.table[k][m].sum) as f64;
                    if next >= 0.0 {
                        self.mark(k, m, next, used);
                    }
                }
            }
        }
    }

    fn retain(&mut self, keep: &[Vec<bool>]) {
        for (list, flags) in self.hits.iter_mut().zip(keep) {
            let mut flag = flags.iter();
            list.retain(|_| flag.next().copied().unwrap_or(false));
        }
        for (row, flags) in self.table.iter_mut().zip(keep) {
            let mut flag = flags.iter();
            row.retain(|_| flag.next().copied().unwrap_or(false));
        }
        self.cache = self.cache.as_ref().map(|cache| cache.compact(keep));
    }
}
