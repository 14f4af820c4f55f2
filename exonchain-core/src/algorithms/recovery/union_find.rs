/// Disjoint sets over `0..n` with path halving and union by size.
#[derive(Debug, Clone)]
pub(crate) struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl UnionFind {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    pub(crate) fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    pub(crate) fn union(&mut self, a: usize, b: usize) {
        let (mut a, mut b) = (self.find(a), self.find(b));
        if a == b {
            return;
        }
        if self.size[a] < self.size[b] {
            std::mem::swap(&mut a, &mut b);
        }
        self.parent[b] = a;
        self.size[a] += self.size[b];
    }

    /// Members of every set, each sorted, sets ordered by smallest member.
    pub(crate) fn components(&mut self) -> Vec<Vec<usize>> {
        let n = self.parent.len();
        let mut index = vec![usize::MAX; n];
        let mut components: Vec<Vec<usize>> = Vec::new();
        for x in 0..n {
            let root = self.find(x);
            if index[root] == usize::MAX {
                index[root] = components.len();
                components.push(Vec::new());
            }
            components[index[root]].push(x);
        }
        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components() {
        let mut sets = UnionFind::new(6);
        sets.union(0, 3);
        sets.union(4, 3);
        sets.union(1, 5);
        assert_eq!(sets.components(), vec![vec![0, 3, 4], vec![1, 5], vec![2]]);
        assert_eq!(sets.find(4), sets.find(0));
    }
}
