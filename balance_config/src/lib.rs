#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the balancer.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Every section is optional; omitted keys fall back to the rig's stock values.
use serde::Deserialize;

/// Tick cadence and world speed-up.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoopCfg {
    /// Control tick rate in Hz (wall clock).
    pub tick_hz: u32,
    /// Nominal multiplier applied to the physics step while running.
    pub time_scale: f64,
    /// Stop after this many ticks (0 = run until interrupted).
    pub max_ticks: u64,
}

impl Default for LoopCfg {
    fn default() -> Self {
        Self {
            tick_hz: 60,
            time_scale: 10.0,
            max_ticks: 0,
        }
    }
}

/// Mounting point of the virtual distance sensor, in beam-frame raw units.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SensorCfg {
    pub offset_along: f64,
    pub offset_normal: f64,
    pub units_per_meter: f64,
}

impl Default for SensorCfg {
    fn default() -> Self {
        Self {
            offset_along: 250.0,
            offset_normal: 25.0,
            units_per_meter: 1000.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ObserverCfg {
    /// Velocity averaging window length (samples).
    pub window: usize,
    /// Model matrix, row-major.
    pub a: [[f64; 2]; 2],
    /// Input vector.
    pub b: [f64; 2],
    /// Output row (selects the measured component).
    pub c: [f64; 2],
    /// Observer gain vector.
    pub l: [f64; 2],
}

impl Default for ObserverCfg {
    fn default() -> Self {
        Self {
            window: 100,
            a: [[0.0, 1.0], [0.0, 0.0]],
            b: [0.0, -0.0023],
            c: [1.0, 0.0],
            l: [1.0, 60.0],
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ControlMode {
    /// State feedback from the observer estimate.
    #[default]
    Feedback,
    /// Open-loop back-and-forth sweep of the actuator.
    Sweep,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ControllerCfg {
    /// State-feedback gain row `K`.
    pub gains: [f64; 2],
    /// Open-loop trim; the raw command is `setpoint_bias - K·x̂`.
    pub setpoint_bias: f64,
    /// Symmetric actuator limit in radians.
    pub max_angle: f64,
    pub mode: ControlMode,
}

impl Default for ControllerCfg {
    fn default() -> Self {
        Self {
            gains: [-10.0, -4.0],
            setpoint_bias: 2.5,
            max_angle: 1.3962,
            mode: ControlMode::Feedback,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ContactCfg {
    /// Contact loss is ignored until this much time has elapsed since start.
    pub grace_ms: u64,
    /// Freeze once more than this many consecutive no-contact ticks are seen.
    pub fault_ticks: u32,
}

impl Default for ContactCfg {
    fn default() -> Self {
        Self {
            grace_ms: 2000,
            fault_ticks: 40,
        }
    }
}

/// Initial conditions for the bundled simulator.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimCfg {
    /// Ball position along the beam, measured from the beam center (raw units).
    pub ball_offset: f64,
    /// Initial ball speed along the beam (raw units per second).
    pub ball_speed: f64,
    /// Initial actuator angle (radians).
    pub actuator_angle: f64,
    /// Gravity in raw units per second squared.
    pub gravity: f64,
}

impl Default for SimCfg {
    fn default() -> Self {
        Self {
            ball_offset: 0.0,
            ball_speed: 0.0,
            actuator_angle: -std::f64::consts::PI / 10.0,
            gravity: 9.8,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default, rename = "loop")]
    pub timing: LoopCfg,
    #[serde(default)]
    pub sensor: SensorCfg,
    #[serde(default)]
    pub observer: ObserverCfg,
    #[serde(default)]
    pub controller: ControllerCfg,
    #[serde(default)]
    pub contact: ContactCfg,
    #[serde(default)]
    pub sim: SimCfg,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse, and validate a config file.
pub fn load_file(path: &std::path::Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {:?}: {}", path, e))?;
    let cfg = load_toml(&text).map_err(|e| eyre::eyre!("parse config {:?}: {}", path, e))?;
    cfg.validate()?;
    Ok(cfg)
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Loop
        if self.timing.tick_hz == 0 {
            eyre::bail!("loop.tick_hz must be > 0");
        }
        if self.timing.tick_hz > 10_000 {
            eyre::bail!("loop.tick_hz is unreasonably large (>10 kHz)");
        }
        if !self.timing.time_scale.is_finite() || self.timing.time_scale < 0.0 {
            eyre::bail!("loop.time_scale must be finite and >= 0");
        }

        // Sensor
        if !all_finite(&[self.sensor.offset_along, self.sensor.offset_normal]) {
            eyre::bail!("sensor offsets must be finite");
        }
        if !(self.sensor.units_per_meter.is_finite() && self.sensor.units_per_meter > 0.0) {
            eyre::bail!("sensor.units_per_meter must be > 0");
        }

        // Observer
        if self.observer.window == 0 {
            eyre::bail!("observer.window must be >= 1");
        }
        if self.observer.window > 100_000 {
            eyre::bail!("observer.window is unreasonably large (>100000)");
        }
        let o = &self.observer;
        if !all_finite(&[
            o.a[0][0], o.a[0][1], o.a[1][0], o.a[1][1], o.b[0], o.b[1], o.c[0], o.c[1], o.l[0],
            o.l[1],
        ]) {
            eyre::bail!("observer matrices must be finite");
        }

        // Controller
        let c = &self.controller;
        if !all_finite(&[c.gains[0], c.gains[1], c.setpoint_bias]) {
            eyre::bail!("controller gains and setpoint_bias must be finite");
        }
        if !(c.max_angle > 0.0 && c.max_angle < std::f64::consts::FRAC_PI_2) {
            eyre::bail!("controller.max_angle must be in (0, pi/2)");
        }

        // Contact
        if self.contact.grace_ms > 10 * 60 * 1000 {
            eyre::bail!("contact.grace_ms is unreasonably large (>10min)");
        }

        // Sim
        let s = &self.sim;
        if !all_finite(&[s.ball_offset, s.ball_speed, s.actuator_angle, s.gravity]) {
            eyre::bail!("sim initial conditions must be finite");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got {rot}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_stock_rig() {
        let cfg = load_toml("").expect("empty TOML parses");
        assert_eq!(cfg.timing.tick_hz, 60);
        assert_eq!(cfg.observer.window, 100);
        assert_eq!(cfg.controller.setpoint_bias, 2.5);
        assert_eq!(cfg.controller.mode, ControlMode::Feedback);
        assert_eq!(cfg.contact.fault_ticks, 40);
        cfg.validate().expect("defaults validate");
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg = load_toml("[controller]\nmode = \"sweep\"\n").expect("parse");
        assert_eq!(cfg.controller.mode, ControlMode::Sweep);
        assert_eq!(cfg.controller.max_angle, 1.3962);
    }
}
