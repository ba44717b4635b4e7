//! Private Module

use ndarray::NdFloat;
use num_traits::Float;

/// Window of the most recent accepted objective values
///
/// A fixed ring buffer written at `count mod memory`. The acceptance
/// reference is the largest value in the window, so a trial point only has
/// to beat the worst of the last `memory` iterates. With `memory == 1` the
/// reference is the current value and the search is monotone.
#[derive(Debug, Clone)]
pub(crate) struct NonMonotoneHistory<S> {
    values: Vec<S>,
    count: usize,
}

impl<S: NdFloat> NonMonotoneHistory<S> {
    /// `memory` is clamped to at least one slot
    pub fn new(memory: usize) -> Self {
        NonMonotoneHistory {
            values: vec![<S as Float>::neg_infinity(); memory.max(1)],
            count: 0,
        }
    }

    pub fn push(&mut self, f: S) {
        let slot = self.count % self.values.len();
        self.values[slot] = f;
        self.count += 1;
    }

    /// Largest live value, $`-\infty`$ before the first push
    pub fn reference(&self) -> S {
        self.values[..self.len()]
            .iter()
            .fold(<S as Float>::neg_infinity(), |acc, &v| Float::max(acc, v))
    }

    fn len(&self) -> usize {
        self.count.min(self.values.len())
    }
}
