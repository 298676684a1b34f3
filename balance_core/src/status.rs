//! Per-tick status and the read-only telemetry snapshot.

use crate::time_scale::SimState;

/// Outcome of a single `update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// Physics advancing at the nominal scale.
    Running,
    /// The contact fault latched on this tick; physics is frozen from now on.
    Tripped,
    /// Frozen on an earlier tick.
    Frozen,
}

impl TickStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TickStatus::Running => "running",
            TickStatus::Tripped => "tripped",
            TickStatus::Frozen => "frozen",
        }
    }
}

/// Everything a renderer or logger needs, copied out of the core.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Snapshot {
    /// Completed ticks.
    pub ticks: u64,
    pub measurement_m: f64,
    pub position_m: f64,
    pub velocity_mps: f64,
    pub raw_command: f64,
    pub actuator_angle: f64,
    pub fault_ticks: u32,
    pub time_scale: f64,
    pub state: SimState,
}
