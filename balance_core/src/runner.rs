//! Fixed-rate driver for `BalanceCore::update`.
//!
//! Ticks are paced against the core's clock. A tick that overruns its slot is
//! not followed by catch-up ticks: the schedule restarts from the moment the
//! late tick finished, and the overrun is counted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use balance_traits::PhysicsWorld;

use crate::core::BalanceCore;
use crate::error::Result;
use crate::status::{Snapshot, TickStatus};

#[derive(Debug, Clone, Copy, Default)]
pub struct RunParams {
    /// Stop after this many ticks; `None` runs until shutdown.
    pub max_ticks: Option<u64>,
    /// Emit a `debug!` state line every N ticks (0 disables).
    pub log_every: u64,
}

impl RunParams {
    /// `max_ticks == 0` means unbounded, matching the config file.
    pub fn from_max_ticks(max_ticks: u64) -> Self {
        Self {
            max_ticks: (max_ticks > 0).then_some(max_ticks),
            log_every: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub overruns: u64,
    pub frozen_at: Option<u64>,
    pub max_tick_us: u64,
    pub mean_tick_us: f64,
    pub last: Snapshot,
}

#[inline]
fn as_us(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}

/// Drive `core` at its configured tick rate until `shutdown` is set or
/// `params.max_ticks` is reached.
///
/// `on_tick` sees every tick's snapshot and status. A freeze does not stop the
/// run. Errors from `update` end the run and are returned as-is.
pub fn run<W, F>(
    core: &mut BalanceCore<W>,
    params: &RunParams,
    shutdown: &AtomicBool,
    mut on_tick: F,
) -> Result<RunSummary>
where
    W: PhysicsWorld,
    F: FnMut(&Snapshot, TickStatus),
{
    let clock = core.clock();
    let period = core.period();
    let start_ticks = core.ticks();
    let mut overruns = 0u64;
    let mut busy_total = Duration::ZERO;
    let mut busy_max = Duration::ZERO;
    let mut deadline = clock.now() + period;

    tracing::info!(
        tick_hz = core.timing().tick_hz,
        time_scale = core.time_scale().scale(),
        mode = ?core.mode(),
        max_ticks = params.max_ticks,
        grace_ticks = core.contact().grace_ticks(),
        fault_ticks = core.contact().fault_ticks(),
        "balance run start"
    );

    loop {
        let done = core.ticks() - start_ticks;
        if shutdown.load(Ordering::Relaxed) {
            tracing::info!(ticks = done, "shutdown requested");
            break;
        }
        if let Some(max) = params.max_ticks
            && done >= max
        {
            break;
        }

        let started = clock.now();
        let status = match core.update(period) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(tick = core.ticks(), error = %e, "tick failed");
                return Err(e);
            }
        };
        let snap = core.draw();
        on_tick(&snap, status);

        if params.log_every > 0 && snap.ticks % params.log_every == 0 {
            tracing::debug!(
                ticks = snap.ticks,
                position_m = snap.position_m,
                velocity_mps = snap.velocity_mps,
                angle = snap.actuator_angle,
                state = %snap.state,
                "balance state"
            );
        }

        let finished = clock.now();
        let busy = finished.saturating_duration_since(started);
        busy_total += busy;
        busy_max = busy_max.max(busy);

        if finished < deadline {
            clock.sleep(deadline - finished);
            deadline += period;
        } else {
            overruns += 1;
            tracing::trace!(
                late_us = as_us(finished - deadline),
                "tick overran its slot"
            );
            deadline = finished + period;
        }
    }

    let ticks = core.ticks() - start_ticks;
    let mean_tick_us = if ticks > 0 {
        busy_total.as_secs_f64() * 1e6 / ticks as f64
    } else {
        0.0
    };
    let summary = RunSummary {
        ticks,
        overruns,
        frozen_at: core.frozen_at(),
        max_tick_us: as_us(busy_max),
        mean_tick_us,
        last: core.draw(),
    };
    tracing::info!(
        ticks,
        overruns,
        frozen_at = summary.frozen_at,
        state = %summary.last.state,
        "balance run end"
    );
    Ok(summary)
}
