//! `From` implementations bridging `balance_config` types to `balance_core` types.

use crate::config::{BalanceCfg, ContactCfg, ControlMode, ControllerCfg, LoopCfg, ObserverCfg, SensorCfg};

// ── LoopCfg ──────────────────────────────────────────────────────────────────

impl From<&balance_config::LoopCfg> for LoopCfg {
    fn from(c: &balance_config::LoopCfg) -> Self {
        Self {
            tick_hz: c.tick_hz,
            time_scale: c.time_scale,
            max_ticks: c.max_ticks,
        }
    }
}

// ── SensorCfg ────────────────────────────────────────────────────────────────

impl From<&balance_config::SensorCfg> for SensorCfg {
    fn from(c: &balance_config::SensorCfg) -> Self {
        Self {
            offset_along: c.offset_along,
            offset_normal: c.offset_normal,
            units_per_meter: c.units_per_meter,
        }
    }
}

// ── ObserverCfg ──────────────────────────────────────────────────────────────

impl From<&balance_config::ObserverCfg> for ObserverCfg {
    fn from(c: &balance_config::ObserverCfg) -> Self {
        Self {
            window: c.window,
            a: c.a,
            b: c.b,
            c: c.c,
            l: c.l,
        }
    }
}

// ── ControllerCfg ────────────────────────────────────────────────────────────

impl From<balance_config::ControlMode> for ControlMode {
    fn from(m: balance_config::ControlMode) -> Self {
        match m {
            balance_config::ControlMode::Feedback => Self::Feedback,
            balance_config::ControlMode::Sweep => Self::Sweep,
        }
    }
}

impl From<&balance_config::ControllerCfg> for ControllerCfg {
    fn from(c: &balance_config::ControllerCfg) -> Self {
        Self {
            gains: c.gains,
            setpoint_bias: c.setpoint_bias,
            max_angle: c.max_angle,
            mode: c.mode.into(),
        }
    }
}

// ── ContactCfg ───────────────────────────────────────────────────────────────

impl From<&balance_config::ContactCfg> for ContactCfg {
    fn from(c: &balance_config::ContactCfg) -> Self {
        Self {
            grace_ms: c.grace_ms,
            fault_ticks: c.fault_ticks,
        }
    }
}

// ── BalanceCfg ───────────────────────────────────────────────────────────────

impl From<&balance_config::Config> for BalanceCfg {
    fn from(c: &balance_config::Config) -> Self {
        Self {
            timing: (&c.timing).into(),
            sensor: (&c.sensor).into(),
            observer: (&c.observer).into(),
            controller: (&c.controller).into(),
            contact: (&c.contact).into(),
        }
    }
}
