//! Tick-rate arithmetic.

use std::time::Duration;

/// One tick at `hz`, nanosecond resolution. `hz == 0` is treated as 1.
#[inline]
pub fn tick_period(hz: u32) -> Duration {
    Duration::from_secs(1) / hz.max(1)
}

/// Tick period in whole microseconds, never below 1.
#[inline]
pub fn period_us(hz: u32) -> u64 {
    u64::try_from(tick_period(hz).as_micros())
        .unwrap_or(u64::MAX)
        .max(1)
}
