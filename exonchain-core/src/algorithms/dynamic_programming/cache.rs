/// Memoized junction score between two hits of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JunctionEntry {
    /// Not evaluated yet
    #[default]
    Pending,
    /// Out of reach or without a viable splice variant
    Unreachable,
    /// Best junction score
    Score(i64),
}

impl From<Option<i64>> for JunctionEntry {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Self::Unreachable, Self::Score)
    }
}

impl JunctionEntry {
    /// Score of an evaluated, viable junction
    #[must_use]
    pub const fn score(self) -> Option<i64> {
        match self {
            Self::Score(score) => Some(score),
            Self::Pending | Self::Unreachable => None,
        }
    }
}

/// Junction scores indexed `[i][j][k - i][m]` for hit `j` of part `i` and
/// hit `m` of part `k >= i`.
///
/// Rows `[i][j][k - i]` are allocated on first write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JunctionCache {
    sizes: Vec<usize>,
    cells: Vec<Vec<Vec<Vec<JunctionEntry>>>>,
}

impl JunctionCache {
    /// Empty cache for parts holding `sizes[i]` hits each
    #[must_use]
    pub fn new(sizes: Vec<usize>) -> Self {
        let parts = sizes.len();
        let cells = sizes
            .iter()
            .enumerate()
            .map(|(i, &n)| vec![vec![Vec::new(); parts - i]; n])
            .collect();
        Self { sizes, cells }
    }

    #[must_use]
    pub fn get(&self, i: usize, j: usize, k: usize, m: usize) -> JunctionEntry {
        self.cells[i][j][k - i].get(m).copied().unwrap_or_default()
    }

    pub fn set(&mut self, i: usize, j: usize, k: usize, m: usize, entry: JunctionEntry) {
        let row = self.row_mut(i, j, k);
        row[m] = entry;
    }

    /// Mark hits `from..` of part `k` unreachable from hit `j` of part `i`.
    pub fn mark_unreachable_from(&mut self, i: usize, j: usize, k: usize, from: usize) {
        let row = self.row_mut(i, j, k);
        for entry in row.iter_mut().skip(from) {
            *entry = JunctionEntry::Unreachable;
        }
    }

    fn row_mut(&mut self, i: usize, j: usize, k: usize) -> &mut Vec<JunctionEntry> {
        let size = self.sizes[k];
        let row = &mut self.cells[i][j][k - i];
        if row.is_empty() {
            *row = vec![JunctionEntry::Pending; size];
        }
        row
    }

    /// Number of evaluated entries
    #[must_use]
    pub fn evaluated(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .flatten()
            .filter(|e| !matches!(e, JunctionEntry::Pending))
            .count()
    }

    /// Keep only the hits flagged in `keep[part][hit]`, renumbering them
    /// densely.
    #[must_use]
    pub fn compact(&self, keep: &[Vec<bool>]) -> Self {
        let sizes: Vec<usize> = keep
            .iter()
            .map(|flags| flags.iter().filter(|&&k| k).count())
            .collect();
        let cells = self
            .cells
            .iter()
            .enumerate()
            .map(|(i, hits)| {
                hits.iter()
                    .zip(&keep[i])
                    .filter(|(_, &kept)| kept)
                    .map(|(rows, _)| {
                        rows.iter()
                            .enumerate()
                            .map(|(offset, row)| {
                                if row.is_empty() {
                                    Vec::new()
                                } else {
                                    row.iter()
                                        .zip(&keep[i + offset])
                                        .filter(|(_, &kept)| kept)
                                        .map(|(entry, _)| *entry)
                                        .collect()
                                }
                            })
                            .collect()
                    })
                    .collect()
            })
            .collect();
        Self { sizes, cells }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_rows() {
        let mut cache = JunctionCache::new(vec![2, 3]);
        assert_eq!(cache.get(0, 1, 1, 2), JunctionEntry::Pending);
        cache.set(0, 1, 1, 2, JunctionEntry::Score(-4));
        assert_eq!(cache.get(0, 1, 1, 2), JunctionEntry::Score(-4));
        assert_eq!(cache.get(0, 1, 1, 0), JunctionEntry::Pending);
        assert_eq!(cache.evaluated(), 1);
    }

    #[test]
    fn test_mark_unreachable_from() {
        let mut cache = JunctionCache::new(vec![1, 4]);
        cache.mark_unreachable_from(0, 0, 1, 2);
        assert_eq!(cache.get(0, 0, 1, 1), JunctionEntry::Pending);
        assert_eq!(cache.get(0, 0, 1, 2), JunctionEntry::Unreachable);
        assert_eq!(cache.get(0, 0, 1, 3), JunctionEntry::Unreachable);
    }

    #[test]
    fn test_compact_renumbers() {
        let mut cache = JunctionCache::new(vec![2, 3]);
        cache.set(0, 1, 1, 0, JunctionEntry::Score(1));
        cache.set(0, 1, 1, 2, JunctionEntry::Score(3));
        cache.set(0, 0, 1, 2, JunctionEntry::Score(5));

        let keep = vec![vec![false, true], vec![false, true, true]];
        let compacted = cache.compact(&keep);
        assert_eq!(compacted.get(0, 0, 1, 0), JunctionEntry::Pending);
        assert_eq!(compacted.get(0, 0, 1, 1), JunctionEntry::Score(3));
        assert_eq!(compacted.evaluated(), 1);
    }

    #[test]
    fn test_entry_from_option() {
        assert_eq!(JunctionEntry::from(Some(2)), JunctionEntry::Score(2));
        assert_eq!(JunctionEntry::from(None), JunctionEntry::Unreachable);
        assert_eq!(JunctionEntry::Unreachable.score(), None);
    }
}
