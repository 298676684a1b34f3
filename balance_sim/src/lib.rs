//! Minimal kinematic ball-and-beam rig.
//!
//! This is not a rigid-body engine. The beam hangs from a wall pivot and is
//! lifted at its far end by a support rod driven by the actuator arm. The ball
//! is a point rolling along the beam's top surface; once it rolls past either
//! end it leaves the beam and falls under gravity, never to return.
pub mod error;

use balance_traits::{Body, PhysicsWorld, Pose, Shape};

use crate::error::SimError;

/// Wall pivot the beam rotates about.
pub const PIVOT: (f64, f64) = (115.0, 480.0);
/// Half of the beam's 500-unit length.
pub const BEAM_HALF_LEN: f64 = 250.0;
/// Half of the beam's 10-unit thickness.
pub const BEAM_HALF_THICK: f64 = 5.0;
pub const BALL_RADIUS: f64 = 20.0;
/// Horizontal distance from the wall pivot to the support's top joint (x = 613).
pub const SUPPORT_LEVER: f64 = 498.0;
pub const ARMATURE_CENTER: (f64, f64) = (513.0, 180.0);
/// Distance from the armature center to the joint with the support rod.
pub const ARMATURE_HALF_LEN: f64 = 100.0;
pub const SUPPORT_LEN: f64 = 300.0;

// Solid sphere rolling without slipping.
const ROLLING_FACTOR: f64 = 5.0 / 7.0;
const MAX_SUBSTEP_S: f64 = 0.002;

#[derive(Debug, Clone, Copy, PartialEq)]
enum BallState {
    /// Rolling along the beam; `s` is measured from the beam center.
    Rolling { s: f64, v: f64 },
    /// Left the beam; free flight in world coordinates.
    Falling { x: f64, y: f64, vx: f64, vy: f64 },
}

/// Initial conditions for [`SimulatedRig`].
#[derive(Debug, Clone, Copy)]
pub struct RigParams {
    pub ball_offset: f64,
    pub ball_speed: f64,
    pub actuator_angle: f64,
    pub gravity: f64,
}

impl Default for RigParams {
    fn default() -> Self {
        Self {
            ball_offset: 0.0,
            ball_speed: 0.0,
            actuator_angle: -std::f64::consts::PI / 10.0,
            gravity: 9.8,
        }
    }
}

/// Simulated ball-and-beam rig.
#[derive(Debug, Clone)]
pub struct SimulatedRig {
    actuator_angle: f64,
    gravity: f64,
    ball: BallState,
    sim_time_s: f64,
}

impl Default for SimulatedRig {
    fn default() -> Self {
        Self::new(RigParams::default())
    }
}

impl SimulatedRig {
    pub fn new(p: RigParams) -> Self {
        Self {
            actuator_angle: p.actuator_angle,
            gravity: p.gravity,
            ball: BallState::Rolling {
                s: p.ball_offset,
                v: p.ball_speed,
            },
            sim_time_s: 0.0,
        }
    }

    /// Beam inclination produced by the current actuator angle.
    ///
    /// The arm's joint height moves the support, which lifts the beam's far end
    /// over a fixed lever.
    pub fn beam_angle(&self) -> f64 {
        let lift = ARMATURE_HALF_LEN * self.actuator_angle.sin();
        (lift / SUPPORT_LEVER).clamp(-1.0, 1.0).asin()
    }

    /// Total simulated time the world has been advanced by.
    pub fn sim_time_s(&self) -> f64 {
        self.sim_time_s
    }

    pub fn ball_on_beam(&self) -> bool {
        matches!(self.ball, BallState::Rolling { .. })
    }

    /// Ball position along the beam from its center, while it is still rolling.
    pub fn ball_offset(&self) -> Option<f64> {
        match self.ball {
            BallState::Rolling { s, .. } => Some(s),
            BallState::Falling { .. } => None,
        }
    }

    fn beam_center(phi: f64) -> (f64, f64) {
        (
            PIVOT.0 + BEAM_HALF_LEN * phi.cos(),
            PIVOT.1 + BEAM_HALF_LEN * phi.sin(),
        )
    }

    fn substep(&mut self, dt: f64) {
        let phi = self.beam_angle();
        self.ball = match self.ball {
            BallState::Rolling { s, v } => {
                let a = -ROLLING_FACTOR * self.gravity * phi.sin();
                let v = v + a * dt;
                let s = s + v * dt;
                if s.abs() > BEAM_HALF_LEN {
                    let (cx, cy) = Self::beam_center(phi);
                    let h = BEAM_HALF_THICK + BALL_RADIUS;
                    let (sin, cos) = phi.sin_cos();
                    tracing::debug!(s, v, "ball left the beam");
                    BallState::Falling {
                        x: cx + s * cos - h * sin,
                        y: cy + s * sin + h * cos,
                        vx: v * cos,
                        vy: v * sin,
                    }
                } else {
                    BallState::Rolling { s, v }
                }
            }
            BallState::Falling { x, y, vx, vy } => {
                let vy = vy - self.gravity * dt;
                BallState::Falling {
                    x: x + vx * dt,
                    y: y + vy * dt,
                    vx,
                    vy,
                }
            }
        };
    }
}

impl PhysicsWorld for SimulatedRig {
    fn step_world(&mut self, dt_s: f64) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if !dt_s.is_finite() || dt_s < 0.0 {
            return Err(Box::new(SimError::InvalidStep(dt_s)));
        }
        if dt_s == 0.0 {
            return Ok(());
        }
        let n = (dt_s / MAX_SUBSTEP_S).ceil().max(1.0);
        let h = dt_s / n;
        for _ in 0..(n as u64) {
            self.substep(h);
        }
        self.sim_time_s += dt_s;
        Ok(())
    }

    fn pose(&self, body: Body) -> Pose {
        let phi = self.beam_angle();
        match body {
            Body::Beam => {
                let (x, y) = Self::beam_center(phi);
                Pose::new(x, y, phi)
            }
            Body::Ball => match self.ball {
                BallState::Rolling { s, .. } => {
                    let (cx, cy) = Self::beam_center(phi);
                    let h = BEAM_HALF_THICK + BALL_RADIUS;
                    let (sin, cos) = phi.sin_cos();
                    Pose::new(cx + s * cos - h * sin, cy + s * sin + h * cos, 0.0)
                }
                BallState::Falling { x, y, .. } => Pose::new(x, y, 0.0),
            },
            Body::Actuator => Pose::new(ARMATURE_CENTER.0, ARMATURE_CENTER.1, self.actuator_angle),
        }
    }

    fn contact_points(&self, a: Shape, b: Shape) -> usize {
        match (a, b) {
            (Shape::Ball, Shape::Beam) | (Shape::Beam, Shape::Ball) if self.ball_on_beam() => 1,
            _ => 0,
        }
    }

    fn set_angle(
        &mut self,
        body: Body,
        angle: f64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if body != Body::Actuator {
            return Err(Box::new(SimError::NotKinematic(body)));
        }
        if !angle.is_finite() {
            return Err(Box::new(SimError::NonFiniteAngle(angle)));
        }
        self.actuator_angle = angle;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn level_rig(offset: f64) -> SimulatedRig {
        SimulatedRig::new(RigParams {
            ball_offset: offset,
            actuator_angle: 0.0,
            ..RigParams::default()
        })
    }

    #[test]
    fn level_beam_sits_on_pivot_line() {
        let rig = level_rig(0.0);
        let beam = rig.pose(Body::Beam);
        assert!((beam.x - 365.0).abs() < 1e-9);
        assert!((beam.y - 480.0).abs() < 1e-9);
        assert_eq!(beam.angle, 0.0);
        let ball = rig.pose(Body::Ball);
        assert!((ball.y - 505.0).abs() < 1e-9);
    }

    #[test]
    fn level_beam_holds_ball_still() {
        let mut rig = level_rig(10.0);
        rig.step_world(1.0).unwrap();
        assert_eq!(rig.ball_offset(), Some(10.0));
        assert_eq!(rig.contact_points(Shape::Ball, Shape::Beam), 1);
    }

    #[test]
    fn raised_far_end_rolls_ball_toward_wall() {
        let mut rig = level_rig(0.0);
        rig.set_angle(Body::Actuator, 0.5).unwrap();
        assert!(rig.beam_angle() > 0.0);
        rig.step_world(2.0).unwrap();
        assert!(rig.ball_offset().unwrap() < 0.0);
    }

    #[test]
    fn ball_falls_off_and_loses_contact() {
        let mut rig = level_rig(240.0);
        rig.set_angle(Body::Actuator, -1.3962).unwrap();
        for _ in 0..200 {
            rig.step_world(0.1).unwrap();
        }
        assert!(!rig.ball_on_beam());
        assert_eq!(rig.contact_points(Shape::Beam, Shape::Ball), 0);
        assert!(rig.pose(Body::Ball).y < 480.0);
    }

    #[test]
    fn zero_step_is_a_no_op() {
        let mut rig = level_rig(0.0);
        rig.set_angle(Body::Actuator, 1.0).unwrap();
        let before = rig.pose(Body::Ball);
        rig.step_world(0.0).unwrap();
        assert_eq!(rig.pose(Body::Ball), before);
        assert_eq!(rig.sim_time_s(), 0.0);
    }

    #[rstest]
    #[case(-0.1)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn rejects_invalid_steps(#[case] dt: f64) {
        let mut rig = SimulatedRig::default();
        assert!(matches!(
            *rig.step_world(dt).unwrap_err().downcast::<SimError>().unwrap(),
            SimError::InvalidStep(_)
        ));
        assert_eq!(rig.sim_time_s(), 0.0);
    }

    #[test]
    fn only_actuator_is_kinematic() {
        let mut rig = SimulatedRig::default();
        assert!(rig.set_angle(Body::Beam, 0.1).is_err());
        assert!(rig.set_angle(Body::Actuator, f64::NAN).is_err());
        assert!(rig.step_world(-0.1).is_err());
        assert_eq!(rig.pose(Body::Actuator).angle, -std::f64::consts::PI / 10.0);
    }
}
