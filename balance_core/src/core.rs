//! The balancing control loop (`BalanceCore`).
//!
//! Owns every piece of mutable loop state: the observer and its window, the
//! contact watchdog, the time scaler and the previously applied command. All of
//! it changes only inside [`BalanceCore::update`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use balance_traits::{Body, Clock, PhysicsWorld, Shape};
use eyre::WrapErr;

use crate::config::{ControlMode, LoopCfg};
use crate::contact::ContactMonitor;
use crate::controller::{Command, FeedbackController, Sweep};
use crate::error::Result;
use crate::measurement::SensorMount;
use crate::observer::StateObserver;
use crate::physics_error::map_physics_error;
use crate::status::{Snapshot, TickStatus};
use crate::time_scale::{SimState, TimeScaler};

pub struct BalanceCore<W: PhysicsWorld> {
    pub(crate) world: W,
    pub(crate) timing: LoopCfg,
    pub(crate) sensor: SensorMount,
    pub(crate) observer: StateObserver,
    pub(crate) controller: FeedbackController,
    pub(crate) sweep: Sweep,
    pub(crate) mode: ControlMode,
    pub(crate) contact: ContactMonitor,
    pub(crate) scaler: TimeScaler,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    pub(crate) epoch: Instant,

    pub(crate) prev_command: f64,
    pub(crate) last_command: Command,
    pub(crate) last_measurement: f64,
    pub(crate) ticks: u64,
    pub(crate) frozen_at: Option<u64>,
}

impl<W: PhysicsWorld> std::fmt::Debug for BalanceCore<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BalanceCore")
            .field("ticks", &self.ticks)
            .field("position_m", &self.observer.position())
            .field("velocity_mps", &self.observer.velocity())
            .field("angle", &self.last_command.angle)
            .field("state", &self.scaler.state())
            .finish()
    }
}

impl<W: PhysicsWorld> BalanceCore<W> {
    /// Advance the loop by one tick of nominal length `dt`.
    ///
    /// The physics world receives `dt` times the current time scale, which is
    /// zero once frozen. Measurement, estimation and the actuator write happen
    /// on every tick regardless.
    pub fn update(&mut self, dt: Duration) -> Result<TickStatus> {
        let step_s = self.scaler.effective(dt.as_secs_f64());
        self.world
            .step_world(step_s)
            .map_err(|e| eyre::Report::new(map_physics_error(&*e)))
            .wrap_err("stepping physics world")?;

        let beam = self.world.pose(Body::Beam);
        let ball = self.world.pose(Body::Ball);
        let measurement = self.sensor.measure(beam, ball);

        let state = self.observer.update(measurement, self.prev_command);
        let cmd = match self.mode {
            ControlMode::Feedback => self.controller.command(&state),
            ControlMode::Sweep => self.sweep.next_command(),
        };

        self.world
            .set_angle(Body::Actuator, cmd.angle)
            .map_err(|e| eyre::Report::new(map_physics_error(&*e)))
            .wrap_err("writing actuator angle")?;
        self.prev_command = cmd.angle;
        self.last_command = cmd;
        self.last_measurement = measurement;

        let touching = self.world.contact_points(Shape::Ball, Shape::Beam) > 0;
        let elapsed = self.clock.elapsed_since(self.epoch);
        let tick = self.ticks;
        self.ticks += 1;

        tracing::trace!(
            tick,
            measurement,
            position = state.x,
            velocity = state.y,
            raw = cmd.raw,
            angle = cmd.angle,
            touching,
            "tick"
        );

        if self.contact.observe(touching, elapsed) {
            self.scaler.freeze();
            self.frozen_at = Some(tick);
            tracing::warn!(
                tick,
                elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                streak = self.contact.counter(),
                "ball lost contact with the beam; freezing physics"
            );
            return Ok(TickStatus::Tripped);
        }

        Ok(match self.scaler.state() {
            SimState::Running => TickStatus::Running,
            SimState::Frozen => TickStatus::Frozen,
        })
    }

    /// Copy of the state a renderer needs. Never mutates the core.
    pub fn draw(&self) -> Snapshot {
        Snapshot {
            ticks: self.ticks,
            measurement_m: self.last_measurement,
            position_m: self.observer.position(),
            velocity_mps: self.observer.velocity(),
            raw_command: self.last_command.raw,
            actuator_angle: self.last_command.angle,
            fault_ticks: self.contact.counter(),
            time_scale: self.scaler.scale(),
            state: self.scaler.state(),
        }
    }

    /// Nominal tick period derived from `tick_hz`.
    pub fn period(&self) -> Duration {
        crate::util::tick_period(self.timing.tick_hz)
    }

    pub fn timing(&self) -> &LoopCfg {
        &self.timing
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn clock(&self) -> Arc<dyn Clock + Send + Sync> {
        Arc::clone(&self.clock)
    }

    pub fn observer(&self) -> &StateObserver {
        &self.observer
    }

    pub fn contact(&self) -> &ContactMonitor {
        &self.contact
    }

    pub fn time_scale(&self) -> &TimeScaler {
        &self.scaler
    }

    pub fn last_command(&self) -> Command {
        self.last_command
    }

    /// Completed ticks.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Index of the tick on which the contact fault latched, if it has.
    pub fn frozen_at(&self) -> Option<u64> {
        self.frozen_at
    }

    /// Give the world back, e.g. to inspect a simulator after a run.
    pub fn into_world(self) -> W {
        self.world
    }
}
