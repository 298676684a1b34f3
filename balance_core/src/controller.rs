//! State-feedback control law, actuator saturation, and the open-loop sweep.

use nalgebra::{RowVector2, Vector2};

use crate::config::ControllerCfg;

/// Clamp `cmd` into `[-limit, limit]`.
#[inline]
pub fn saturate(cmd: f64, limit: f64) -> f64 {
    cmd.clamp(-limit, limit)
}

/// One tick's actuator decision.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Command {
    /// Unsaturated command.
    pub raw: f64,
    /// Saturated angle written to the actuator; fed back into the observer
    /// on the next tick.
    pub angle: f64,
}

/// `u = bias − K·x`, clamped to the actuator limit.
#[derive(Debug, Clone, Copy)]
pub struct FeedbackController {
    gains: RowVector2<f64>,
    bias: f64,
    limit: f64,
}

impl From<&ControllerCfg> for FeedbackController {
    fn from(c: &ControllerCfg) -> Self {
        Self::new(RowVector2::new(c.gains[0], c.gains[1]), c.setpoint_bias, c.max_angle)
    }
}

impl FeedbackController {
    pub fn new(gains: RowVector2<f64>, bias: f64, limit: f64) -> Self {
        Self {
            gains,
            bias,
            limit,
        }
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    #[inline]
    pub fn command(&self, state: &Vector2<f64>) -> Command {
        let raw = self.bias - (self.gains * state)[0];
        Command {
            raw,
            angle: saturate(raw, self.limit),
        }
    }
}

/// Open-loop exercise of the actuator: ramps by a fixed step each tick and
/// reverses at the limits.
#[derive(Debug, Clone, Copy)]
pub struct Sweep {
    angle: f64,
    step: f64,
    limit: f64,
}

impl Sweep {
    pub const DEFAULT_STEP: f64 = std::f64::consts::PI / 100.0;

    pub fn new(start: f64, step: f64, limit: f64) -> Self {
        Self {
            angle: saturate(start, limit),
            step,
            limit,
        }
    }

    pub fn next_command(&mut self) -> Command {
        if self.angle.abs() >= self.limit {
            // Only turn around if still heading outward.
            if self.angle.signum() == self.step.signum() {
                self.step = -self.step;
            }
        }
        let raw = self.angle + self.step;
        self.angle = saturate(raw, self.limit);
        Command {
            raw,
            angle: self.angle,
        }
    }
}
