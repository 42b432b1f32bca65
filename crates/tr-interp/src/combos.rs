/// Cartesian product over per-axis tap counts.
///
/// Yields index tuples in lexicographic order with the last axis varying
/// fastest, so `[2, 2]` yields `[0,0], [0,1], [1,0], [1,1]`. The order is
/// fixed, which keeps floating-point accumulation reproducible.
///
/// An empty `counts` yields a single empty tuple; any zero count yields
/// nothing.
#[derive(Debug, Clone)]
pub struct Combinations {
    counts: Vec<usize>,
    next: Option<Vec<usize>>,
}

impl Combinations {
    pub fn new(counts: &[usize]) -> Self {
        let next = if counts.contains(&0) {
            None
        } else {
            Some(vec![0; counts.len()])
        };
        Self {
            counts: counts.to_vec(),
            next,
        }
    }

    /// Total number of tuples.
    pub fn total(&self) -> usize {
        self.counts.iter().product()
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;

        let mut successor = current.clone();
        for axis in (0..successor.len()).rev() {
            successor[axis] += 1;
            if successor[axis] < self.counts[axis] {
                self.next = Some(successor);
                return Some(current);
            }
            successor[axis] = 0;
        }

        Some(current)
    }
}
