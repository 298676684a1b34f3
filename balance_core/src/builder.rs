//! Type-state builder for `Balancer` and generic `build_balancer` constructor.
//!
//! The builder enforces at compile time that a physics world is provided
//! before `build()` is available. `try_build()` is always available for
//! dynamic checks.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use balance_traits::clock::{Clock, MonotonicClock};
use balance_traits::PhysicsWorld;

use crate::config::*;
use crate::contact::ContactMonitor;
use crate::controller::{Command, FeedbackController, Sweep};
use crate::core::BalanceCore;
use crate::error::{BuildError, Result};
use crate::measurement::SensorMount;
use crate::observer::{StateObserver, SystemMatrices};
use crate::status::{Snapshot, TickStatus};
use crate::time_scale::TimeScaler;

/// Default sweep start angle (radians).
pub const SWEEP_START: f64 = -std::f64::consts::PI / 10.0;

// ── Public dynamic-dispatch wrapper ──────────────────────────────────────────

/// Balancer over a boxed physics world.
pub struct Balancer {
    pub(crate) inner: BalanceCore<Box<dyn PhysicsWorld>>,
}

impl std::fmt::Debug for Balancer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.inner, f)
    }
}

impl Balancer {
    /// Start building a Balancer.
    pub fn builder() -> BalancerBuilder<Missing> {
        BalancerBuilder::default()
    }

    /// One tick of the control loop.
    pub fn update(&mut self, dt: Duration) -> Result<TickStatus> {
        self.inner.update(dt)
    }

    pub fn draw(&self) -> Snapshot {
        self.inner.draw()
    }

    pub fn period(&self) -> Duration {
        self.inner.period()
    }

    pub fn last_command(&self) -> Command {
        self.inner.last_command()
    }

    pub fn frozen_at(&self) -> Option<u64> {
        self.inner.frozen_at()
    }

    /// Borrow the generic core, e.g. to hand it to the runner.
    pub fn core_mut(&mut self) -> &mut BalanceCore<Box<dyn PhysicsWorld>> {
        &mut self.inner
    }

    pub fn into_core(self) -> BalanceCore<Box<dyn PhysicsWorld>> {
        self.inner
    }
}

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `Balancer`. All fields are validated on `build()`.
pub struct BalancerBuilder<W> {
    world: Option<Box<dyn PhysicsWorld>>,
    cfg: BalanceCfg,
    clock: Option<Box<dyn Clock + Send + Sync>>,
    sweep_start: Option<f64>,
    _w: PhantomData<W>,
}

impl Default for BalancerBuilder<Missing> {
    fn default() -> Self {
        Self {
            world: None,
            cfg: BalanceCfg::default(),
            clock: None,
            sweep_start: None,
            _w: PhantomData,
        }
    }
}

fn all_finite(xs: &[f64]) -> bool {
    xs.iter().all(|v| v.is_finite())
}

/// Validate configuration and construct a `BalanceCore`.
///
/// Single source of truth for validation and construction, used by both
/// `BalancerBuilder::try_build()` and `build_balancer()`.
fn validate_and_build<W: PhysicsWorld>(
    world: W,
    cfg: BalanceCfg,
    clock: Option<Box<dyn Clock + Send + Sync>>,
    sweep_start: f64,
) -> Result<BalanceCore<W>> {
    // ── Validation ───────────────────────────────────────────────────────────
    let BalanceCfg {
        timing,
        sensor,
        observer,
        controller,
        contact,
    } = cfg;

    if timing.tick_hz == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "tick_hz must be > 0",
        )));
    }
    if !timing.time_scale.is_finite() || timing.time_scale < 0.0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "time_scale must be finite and >= 0",
        )));
    }
    if !all_finite(&[sensor.offset_along, sensor.offset_normal]) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "sensor offsets must be finite",
        )));
    }
    if !(sensor.units_per_meter.is_finite() && sensor.units_per_meter > 0.0) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "units_per_meter must be > 0",
        )));
    }
    if observer.window == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "observer window must be >= 1",
        )));
    }
    let matrices = [
        observer.a[0][0],
        observer.a[0][1],
        observer.a[1][0],
        observer.a[1][1],
        observer.b[0],
        observer.b[1],
        observer.c[0],
        observer.c[1],
        observer.l[0],
        observer.l[1],
    ];
    if !all_finite(&matrices) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "observer matrices must be finite",
        )));
    }
    if !all_finite(&[controller.gains[0], controller.gains[1], controller.setpoint_bias]) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "controller gains and bias must be finite",
        )));
    }
    if !(controller.max_angle > 0.0 && controller.max_angle < std::f64::consts::FRAC_PI_2) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "max_angle must be in (0, pi/2)",
        )));
    }
    if !sweep_start.is_finite() {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "sweep start must be finite",
        )));
    }

    // ── Assemble ─────────────────────────────────────────────────────────────
    let clock: Arc<dyn Clock + Send + Sync> = match clock {
        Some(b) => Arc::from(b),
        None => Arc::new(MonotonicClock::new()),
    };
    let epoch = clock.now();

    let feedback = FeedbackController::from(&controller);
    let sweep = Sweep::new(
        sweep_start,
        Sweep::DEFAULT_STEP,
        controller.max_angle,
    );

    tracing::debug!(
        tick_hz = timing.tick_hz,
        time_scale = timing.time_scale,
        window = observer.window,
        mode = ?controller.mode,
        "balance core built"
    );

    Ok(BalanceCore {
        world,
        sensor: SensorMount::from(&sensor),
        observer: StateObserver::new(SystemMatrices::from(&observer), observer.window),
        controller: feedback,
        sweep,
        mode: controller.mode,
        contact: ContactMonitor::from(&contact)
            .with_tick_period(crate::util::tick_period(timing.tick_hz)),
        scaler: TimeScaler::new(timing.time_scale),
        clock,
        epoch,
        timing,
        prev_command: 0.0,
        last_command: Command::default(),
        last_measurement: 0.0,
        ticks: 0,
        frozen_at: None,
    })
}

impl<W> BalancerBuilder<W> {
    /// Fallible build available in any type-state; returns detailed error for missing pieces.
    pub fn try_build(self) -> Result<Balancer> {
        let world = self
            .world
            .ok_or_else(|| eyre::Report::new(BuildError::MissingWorld))?;
        let inner = validate_and_build(
            world,
            self.cfg,
            self.clock,
            self.sweep_start.unwrap_or(SWEEP_START),
        )?;
        Ok(Balancer { inner })
    }
}

/// Chainable setters that do not affect type-state.
impl<W> BalancerBuilder<W> {
    pub fn with_config(mut self, cfg: BalanceCfg) -> Self {
        self.cfg = cfg;
        self
    }
    pub fn with_timing(mut self, timing: LoopCfg) -> Self {
        self.cfg.timing = timing;
        self
    }
    pub fn with_sensor(mut self, sensor: SensorCfg) -> Self {
        self.cfg.sensor = sensor;
        self
    }
    pub fn with_observer(mut self, observer: ObserverCfg) -> Self {
        self.cfg.observer = observer;
        self
    }
    pub fn with_controller(mut self, controller: ControllerCfg) -> Self {
        self.cfg.controller = controller;
        self
    }
    pub fn with_contact(mut self, contact: ContactCfg) -> Self {
        self.cfg.contact = contact;
        self
    }
    /// Angle the open-loop sweep starts from; defaults to `-pi/10`.
    pub fn with_sweep_start(mut self, angle: f64) -> Self {
        self.sweep_start = Some(angle);
        self
    }
    /// Provide a custom clock implementation; defaults to `MonotonicClock` when not provided.
    pub fn with_clock(mut self, clock: Box<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }
}

// Setter that advances type-state
impl BalancerBuilder<Missing> {
    pub fn with_world(self, world: impl PhysicsWorld + 'static) -> BalancerBuilder<Set> {
        BalancerBuilder {
            world: Some(Box::new(world)),
            cfg: self.cfg,
            clock: self.clock,
            sweep_start: self.sweep_start,
            _w: PhantomData,
        }
    }
}

impl BalancerBuilder<Set> {
    /// Validate and build the Balancer. Only available once a world is set.
    pub fn build(self) -> Result<Balancer> {
        self.try_build()
    }
}

/// Build a statically-dispatched `BalanceCore` around a concrete world.
///
/// Delegates to the shared `validate_and_build`.
pub fn build_balancer<W: PhysicsWorld>(
    world: W,
    cfg: BalanceCfg,
    clock: Option<Box<dyn Clock + Send + Sync>>,
) -> Result<BalanceCore<W>> {
    validate_and_build(world, cfg, clock, SWEEP_START)
}
