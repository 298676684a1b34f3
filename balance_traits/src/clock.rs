//! Time source for tick pacing and the contact grace period.

use std::time::{Duration, Instant};

pub trait Clock {
    fn now(&self) -> Instant;

    /// Block (or pretend to) for `d`.
    fn sleep(&self, d: Duration);

    /// Time since `epoch`; zero if `epoch` lies in the future.
    fn elapsed_since(&self, epoch: Instant) -> Duration {
        self.now().saturating_duration_since(epoch)
    }
}

/// Wall clock backed by `Instant::now` and `thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl MonotonicClock {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, d: Duration) {
        if !d.is_zero() {
            std::thread::sleep(d);
        }
    }
}

#[cfg(any(test, feature = "test-util"))]
pub mod test_clock {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::{Clock, Duration, Instant};

    /// Manually driven clock. `sleep` moves time forward instantly.
    ///
    /// Clones share one timeline, so a test can hold a handle while the
    /// balancer owns another.
    #[derive(Debug, Clone)]
    pub struct TestClock {
        origin: Instant,
        offset_ns: Arc<AtomicU64>,
    }

    impl Default for TestClock {
        fn default() -> Self {
            Self::new()
        }
    }

    fn as_ns(d: Duration) -> u64 {
        u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
    }

    impl TestClock {
        pub fn new() -> Self {
            Self {
                origin: Instant::now(),
                offset_ns: Arc::new(AtomicU64::new(0)),
            }
        }

        pub fn advance(&self, d: Duration) {
            let step = as_ns(d);
            let _ = self
                .offset_ns
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |cur| {
                    Some(cur.saturating_add(step))
                });
        }

        /// Jump to an absolute offset from the clock's origin.
        pub fn set_offset(&self, d: Duration) {
            self.offset_ns.store(as_ns(d), Ordering::SeqCst);
        }

        /// Total time advanced so far.
        pub fn elapsed(&self) -> Duration {
            Duration::from_nanos(self.offset_ns.load(Ordering::SeqCst))
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> Instant {
            self.origin + self.elapsed()
        }

        fn sleep(&self, d: Duration) {
            self.advance(d);
        }
    }

}
