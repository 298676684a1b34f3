//! Ball-off-beam watchdog.

use std::time::Duration;

use crate::config::ContactCfg;

/// Counts consecutive no-contact ticks after a startup grace period and
/// latches a fault once the streak exceeds the threshold.
#[derive(Debug, Clone)]
pub struct ContactMonitor {
    grace: Duration,
    // Nominal tick length; the grace edge is judged to within half of it.
    tick: Duration,
    fault_ticks: u32,
    counter: u32,
    tripped: bool,
}

impl From<&ContactCfg> for ContactMonitor {
    fn from(c: &ContactCfg) -> Self {
        Self::new(Duration::from_millis(c.grace_ms), c.fault_ticks)
    }
}

impl ContactMonitor {
    pub fn new(grace: Duration, fault_ticks: u32) -> Self {
        Self {
            grace,
            tick: Duration::ZERO,
            fault_ticks,
            counter: 0,
            tripped: false,
        }
    }

    /// Current no-contact streak (ticks).
    #[inline]
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Align the grace edge to the tick grid.
    ///
    /// Tick periods are truncated to whole nanoseconds, so the tick that
    /// nominally lands on the grace edge can start a few ns early. With a
    /// tick length set, a tick counts once it starts within half a period of
    /// the edge.
    pub fn with_tick_period(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }

    /// Number of leading ticks (at the configured tick length) that fall
    /// inside the grace period. The first counted tick has this index.
    pub fn grace_ticks(&self) -> u64 {
        let period = self.tick.as_nanos().max(1);
        let edge = self.grace.saturating_sub(self.tick / 2).as_nanos();
        u64::try_from(edge.div_ceil(period)).unwrap_or(u64::MAX)
    }

    pub fn fault_ticks(&self) -> u32 {
        self.fault_ticks
    }

    #[inline]
    pub fn is_tripped(&self) -> bool {
        self.tripped
    }

    /// Evaluate one tick. Returns `true` only on the tick the fault latches.
    ///
    /// `elapsed` is time since process start; ticks before `grace` are
    /// ignored entirely.
    pub fn observe(&mut self, touching: bool, elapsed: Duration) -> bool {
        if elapsed.saturating_add(self.tick / 2) < self.grace {
            return false;
        }
        if touching {
            self.counter = 0;
        } else {
            self.counter = self.counter.saturating_add(1);
        }
        if !self.tripped && self.counter > self.fault_ticks {
            self.tripped = true;
            return true;
        }
        false
    }
}
