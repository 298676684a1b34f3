//! Config mapping, rig assembly, and loop execution.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use balance_core::error::Result as CoreResult;
use balance_core::{BalanceCfg, Balancer, ControlMode, RunParams, RunSummary, Snapshot, TickStatus};
use balance_sim::{RigParams, SimulatedRig};
use serde_json::json;

/// Command-line overrides layered on top of the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOverrides {
    pub ticks: Option<u64>,
    pub time_scale: Option<f64>,
    pub tick_hz: Option<u32>,
    pub mode: Option<ControlMode>,
}

#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
    pub every: u64,
    pub stats: bool,
}

pub fn rig_params(s: &balance_config::SimCfg) -> RigParams {
    RigParams {
        ball_offset: s.ball_offset,
        ball_speed: s.ball_speed,
        actuator_angle: s.actuator_angle,
        gravity: s.gravity,
    }
}

/// Map the file config plus overrides into the core's runtime config.
pub fn core_config(cfg: &balance_config::Config, ov: &RunOverrides) -> BalanceCfg {
    let mut core: BalanceCfg = cfg.into();
    if let Some(n) = ov.ticks {
        core.timing.max_ticks = n;
    }
    if let Some(x) = ov.time_scale {
        core.timing.time_scale = x;
    }
    if let Some(hz) = ov.tick_hz {
        core.timing.tick_hz = hz;
    }
    if let Some(m) = ov.mode {
        core.controller.mode = m;
    }
    core
}

pub fn build(cfg: &balance_config::Config, ov: &RunOverrides) -> CoreResult<Balancer> {
    Balancer::builder()
        .with_world(SimulatedRig::new(rig_params(&cfg.sim)))
        .with_config(core_config(cfg, ov))
        .build()
}

pub fn mode_name(m: ControlMode) -> &'static str {
    match m {
        ControlMode::Feedback => "feedback",
        ControlMode::Sweep => "sweep",
    }
}

pub fn snapshot_json(snap: &Snapshot, status: TickStatus) -> serde_json::Value {
    json!({
        "event": "tick",
        "tick": snap.ticks,
        "measurement_m": snap.measurement_m,
        "position_m": snap.position_m,
        "velocity_mps": snap.velocity_mps,
        "raw_command": snap.raw_command,
        "angle": snap.actuator_angle,
        "fault_ticks": snap.fault_ticks,
        "time_scale": snap.time_scale,
        "state": snap.state.as_str(),
        "status": status.as_str(),
    })
}

pub fn summary_json(s: &RunSummary) -> serde_json::Value {
    json!({
        "event": "summary",
        "ticks": s.ticks,
        "overruns": s.overruns,
        "frozen_at": s.frozen_at,
        "state": s.last.state.as_str(),
        "position_m": s.last.position_m,
        "angle": s.last.actuator_angle,
        "max_tick_us": s.max_tick_us,
        "mean_tick_us": s.mean_tick_us,
    })
}

pub fn run_balance(
    cfg: &balance_config::Config,
    ov: &RunOverrides,
    out: Output,
    shutdown: Arc<AtomicBool>,
) -> CoreResult<RunSummary> {
    let mut balancer = build(cfg, ov)?;
    let core = balancer.core_mut();
    let params = RunParams {
        max_ticks: RunParams::from_max_ticks(core.timing().max_ticks).max_ticks,
        log_every: u64::from(core.timing().tick_hz),
    };
    let every = out.every.max(1);

    let summary = balance_core::run(core, &params, &shutdown, |snap, status| {
        if status == TickStatus::Tripped && !out.json {
            println!(
                "Ball off the beam: physics frozen at tick {}",
                snap.ticks.saturating_sub(1)
            );
        }
        if out.json && (snap.ticks % every == 0 || status == TickStatus::Tripped) {
            println!("{}", snapshot_json(snap, status));
        }
    })?;

    if out.json {
        println!("{}", summary_json(&summary));
    } else {
        println!(
            "Run finished: {} ticks, state {}, position {:.4} m, angle {:.4} rad",
            summary.ticks, summary.last.state, summary.last.position_m, summary.last.actuator_angle
        );
    }
    if out.stats {
        print_stats(&summary, core.timing().tick_hz);
    }
    Ok(summary)
}

/// Print tick timing stats to stderr.
fn print_stats(s: &RunSummary, tick_hz: u32) {
    let period_us = balance_core::util::period_us(tick_hz);
    eprintln!("\n--- Balance Stats ---");
    eprintln!("Ticks: {}", s.ticks);
    eprintln!("Period (us): {period_us}");
    eprintln!(
        "Tick busy mean/max (us): {:.1} / {}",
        s.mean_tick_us, s.max_tick_us
    );
    eprintln!("Overruns (> period): {}", s.overruns);
    match s.frozen_at {
        Some(t) => eprintln!("Frozen at tick: {t}"),
        None => eprintln!("Frozen at tick: -"),
    }
    eprintln!("---------------------\n");
}

/// Build against the simulator and run a single tick.
pub fn self_check(cfg: &balance_config::Config) -> CoreResult<Snapshot> {
    let mut balancer = build(cfg, &RunOverrides::default())?;
    let period = balancer.period();
    balancer.update(period)?;
    Ok(balancer.draw())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_over_file() {
        let cfg = balance_config::Config::default();
        let ov = RunOverrides {
            ticks: Some(12),
            time_scale: Some(2.0),
            tick_hz: Some(100),
            mode: Some(ControlMode::Sweep),
        };
        let core = core_config(&cfg, &ov);
        assert_eq!(core.timing.max_ticks, 12);
        assert_eq!(core.timing.time_scale, 2.0);
        assert_eq!(core.timing.tick_hz, 100);
        assert_eq!(core.controller.mode, ControlMode::Sweep);
    }

    #[test]
    fn self_check_measures_default_rig() {
        let snap = self_check(&balance_config::Config::default()).unwrap();
        assert_eq!(snap.ticks, 1);
        assert!((snap.measurement_m + 0.25).abs() < 1e-9);
    }
}
