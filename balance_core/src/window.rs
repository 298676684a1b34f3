//! Fixed-capacity trailing window with an O(1) running mean.

/// Ring buffer of the last `N` samples, pre-filled with zeros.
///
/// `push` evicts the oldest sample and appends the newest; the running sum is
/// updated incrementally so `mean` never re-sums the buffer.
#[derive(Debug, Clone)]
pub struct IntegratorWindow {
    buf: Box<[f64]>,
    // Index of the oldest sample (next slot to overwrite).
    head: usize,
    sum: f64,
}

impl IntegratorWindow {
    /// Create a zero-filled window. `capacity` is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: vec![0.0; capacity.max(1)].into_boxed_slice(),
            head: 0,
            sum: 0.0,
        }
    }

    /// Number of samples held; always the configured capacity.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Replace the oldest sample with `sample`; returns the evicted value.
    #[inline]
    pub fn push(&mut self, sample: f64) -> f64 {
        let evicted = std::mem::replace(&mut self.buf[self.head], sample);
        self.sum += sample - evicted;
        self.head = (self.head + 1) % self.buf.len();
        evicted
    }

    #[inline]
    pub fn sum(&self) -> f64 {
        self.sum
    }

    #[inline]
    pub fn mean(&self) -> f64 {
        self.sum / self.buf.len() as f64
    }

    /// Samples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        let (newer, older) = self.buf.split_at(self.head);
        older.iter().chain(newer.iter()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn starts_full_of_zeros() {
        let w = IntegratorWindow::new(100);
        assert_eq!(w.len(), 100);
        assert_eq!(w.mean(), 0.0);
        assert!(w.iter().all(|v| v == 0.0));
    }

    #[test]
    fn evicts_in_fifo_order() {
        let mut w = IntegratorWindow::new(3);
        assert_eq!(w.push(1.0), 0.0);
        assert_eq!(w.push(2.0), 0.0);
        assert_eq!(w.push(3.0), 0.0);
        assert_eq!(w.push(4.0), 1.0);
        assert_eq!(w.iter().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
        assert_eq!(w.mean(), 3.0);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut w = IntegratorWindow::new(0);
        assert_eq!(w.len(), 1);
        w.push(5.0);
        assert_eq!(w.mean(), 5.0);
    }

    proptest! {
        #[test]
        fn running_mean_matches_brute_force(
            cap in 1usize..150,
            samples in proptest::collection::vec(-100.0f64..100.0, 0..400),
        ) {
            let mut w = IntegratorWindow::new(cap);
            for s in samples {
                w.push(s);
                prop_assert_eq!(w.len(), cap);
                let brute: f64 = w.iter().sum::<f64>() / cap as f64;
                prop_assert!((w.mean() - brute).abs() < 1e-9, "mean {} vs {}", w.mean(), brute);
            }
        }
    }
}
