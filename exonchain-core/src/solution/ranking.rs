use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::solution::Solution;

/// Heap entry ordered by [`Solution::rank_cmp`].
#[derive(Debug)]
struct Ranked(Solution);

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.0.rank_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.rank_cmp(&other.0)
    }
}

/// Keeps the best `capacity` solutions seen so far.
///
/// The worst retained solution sits at the top of a min-heap, so a new
/// solution replaces it only if it ranks strictly higher.
///
/// # Examples
///
/// ```rust
/// use exonchain_core::solution::SolutionQueue;
///
/// let queue = SolutionQueue::new(3);
/// assert!(queue.is_empty());
/// assert_eq!(queue.into_sorted_vec().len(), 0);
/// ```
#[derive(Debug)]
pub struct SolutionQueue {
    capacity: usize,
    heap: BinaryHeap<Reverse<Ranked>>,
}

impl SolutionQueue {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity + 1),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Offer a solution; returns whether it was retained.
    pub fn push(&mut self, solution: Solution) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(Ranked(solution)));
            return true;
        }
        let improves = self
            .heap
            .peek()
            .is_some_and(|Reverse(worst)| solution.rank_cmp(&worst.0).is_gt());
        if improves {
            self.heap.pop();
            self.heap.push(Reverse(Ranked(solution)));
        }
        improves
    }

    /// Retained solutions, best first.
    #[must_use]
    pub fn into_sorted_vec(self) -> Vec<Solution> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(Ranked(solution))| solution)
            .collect()
    }
}

impl Extend<Solution> for SolutionQueue {
    fn extend<I: IntoIterator<Item = Solution>>(&mut self, iter: I) {
        for solution in iter {
            self.push(solution);
        }
    }
}
