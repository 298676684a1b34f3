//! Configuration types for the balancing loop.
//!
//! These are the runtime configuration structs used by `BalanceCore`.
//! They are separate from the TOML-deserialized config in `balance_config`.

/// Tick cadence and physics speed-up.
#[derive(Debug, Clone)]
pub struct LoopCfg {
    /// Control tick rate in Hz (wall clock).
    pub tick_hz: u32,
    /// Multiplier applied to the physics step while running. Default: 10.
    pub time_scale: f64,
    /// Stop the runner after this many ticks (0 = unbounded).
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

/// Where the virtual distance sensor sits on the beam.
///
/// The reference point is `offset_along` units along the beam axis from its
/// center and `offset_normal` units above it, which puts it at the height of
/// the ball's center at the beam's far end.
#[derive(Debug, Clone)]
pub struct SensorCfg {
    pub offset_along: f64,
    pub offset_normal: f64,
    /// Raw units per meter (measurements are reported in meters).
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

/// Observer model and gains. Matrices are row-major.
#[derive(Debug, Clone)]
pub struct ObserverCfg {
    /// Velocity averaging window length (samples).
    pub window: usize,
    pub a: [[f64; 2]; 2],
    pub b: [f64; 2],
    pub c: [f64; 2],
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

/// Source of the actuator command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ControlMode {
    #[default]
    Feedback,
    /// Open-loop sweep between the actuator limits.
    Sweep,
}

#[derive(Debug, Clone)]
pub struct ControllerCfg {
    /// Gain row `K` applied to `[position, velocity]`.
    pub gains: [f64; 2],
    /// Open-loop trim. Default: 2.5.
    pub setpoint_bias: f64,
    /// Symmetric actuator limit in radians. Default: 1.3962 (about 80 degrees).
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

/// Contact-loss watchdog.
#[derive(Debug, Clone)]
pub struct ContactCfg {
    /// Contact loss is ignored until this many ms after start.
    pub grace_ms: u64,
    /// Freeze once the no-contact streak exceeds this many ticks.
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

/// Everything `BalanceCore` needs, bundled.
#[derive(Debug, Clone, Default)]
pub struct BalanceCfg {
    pub timing: LoopCfg,
    pub sensor: SensorCfg,
    pub observer: ObserverCfg,
    pub controller: ControllerCfg,
    pub contact: ContactCfg,
}
