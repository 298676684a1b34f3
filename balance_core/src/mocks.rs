//! Test and helper mocks for balance_core

use balance_traits::{Body, PhysicsWorld, Pose, Shape};

/// A world that never moves on its own.
///
/// Poses and the contact flag are plain fields so tests can script them
/// between ticks through `BalanceCore::world_mut`. Every step and actuator
/// write is recorded.
#[derive(Debug, Clone)]
pub struct StaticWorld {
    pub beam: Pose,
    pub ball: Pose,
    pub actuator: Pose,
    pub touching: bool,
    /// Reject actuator writes with an error.
    pub fail_writes: bool,
    pub steps: u64,
    pub stepped_s: f64,
    pub last_step_s: Option<f64>,
}

impl Default for StaticWorld {
    /// Level beam centered at (365, 480) with the ball resting on its middle.
    fn default() -> Self {
        Self {
            beam: Pose::new(365.0, 480.0, 0.0),
            ball: Pose::new(365.0, 505.0, 0.0),
            actuator: Pose::default(),
            touching: true,
            fail_writes: false,
            steps: 0,
            stepped_s: 0.0,
            last_step_s: None,
        }
    }
}

impl StaticWorld {
    /// Level beam with the ball at `x` on the contact line.
    pub fn with_ball_at(x: f64) -> Self {
        Self {
            ball: Pose::new(x, 505.0, 0.0),
            ..Self::default()
        }
    }
}

impl PhysicsWorld for StaticWorld {
    fn step_world(&mut self, dt_s: f64) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.steps += 1;
        self.stepped_s += dt_s;
        self.last_step_s = Some(dt_s);
        Ok(())
    }

    fn pose(&self, body: Body) -> Pose {
        match body {
            Body::Beam => self.beam,
            Body::Ball => self.ball,
            Body::Actuator => self.actuator,
        }
    }

    fn contact_points(&self, a: Shape, b: Shape) -> usize {
        usize::from(a != b && self.touching)
    }

    fn set_angle(
        &mut self,
        body: Body,
        angle: f64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.fail_writes {
            return Err(Box::new(std::io::Error::other("actuator write rejected")));
        }
        match body {
            Body::Actuator => self.actuator.angle = angle,
            Body::Beam => self.beam.angle = angle,
            Body::Ball => self.ball.angle = angle,
        }
        Ok(())
    }
}
