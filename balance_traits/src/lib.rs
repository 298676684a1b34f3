//! Narrow collaborator seams for the ball-and-beam balancer.
//!
//! The core never holds references into a physics engine. Everything it needs
//! crosses this boundary by value: a plain [`Pose`] per body, a contact count per
//! shape pair, and a single actuator angle written back.

pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// Position and orientation of a rigid body, in the collaborator's raw units
/// (positions) and radians (angle).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
}

impl Pose {
    pub const fn new(x: f64, y: f64, angle: f64) -> Self {
        Self { x, y, angle }
    }
}

/// Bodies the core reads (and, for the actuator, writes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    Beam,
    Ball,
    Actuator,
}

/// Collision shapes the core queries for contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Beam,
    Ball,
}

/// The physics collaborator, as seen from the control loop.
///
/// Reads are infallible: the collaborator is assumed to always hold a
/// consistent world. Writes may fail and are reported through the boxed error,
/// mirroring how hardware drivers surface faults.
pub trait PhysicsWorld {
    /// Advance every rigid body by `dt_s` seconds. A zero duration leaves the
    /// world untouched.
    fn step_world(&mut self, dt_s: f64) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    fn pose(&self, body: Body) -> Pose;

    /// Number of narrow-phase contact points currently shared by `a` and `b`.
    fn contact_points(&self, a: Shape, b: Shape) -> usize;

    /// Kinematically override a body's orientation.
    fn set_angle(
        &mut self,
        body: Body,
        angle: f64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

impl<W: PhysicsWorld + ?Sized> PhysicsWorld for Box<W> {
    fn step_world(&mut self, dt_s: f64) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).step_world(dt_s)
    }

    fn pose(&self, body: Body) -> Pose {
        (**self).pose(body)
    }

    fn contact_points(&self, a: Shape, b: Shape) -> usize {
        (**self).contact_points(a, b)
    }

    fn set_angle(
        &mut self,
        body: Body,
        angle: f64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).set_angle(body, angle)
    }
}
