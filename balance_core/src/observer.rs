//! Position/velocity state observer.
//!
//! Position is taken straight from the measurement. Velocity is reconstructed
//! from three contributions evaluated on the prior estimate:
//!
//! - `L · (y − C·x)`: gain-weighted innovation,
//! - `A · x`: model-predicted derivative,
//! - `B · u`: effect of the command applied on the previous tick,
//!
//! and the sum of their velocity components is pushed through a trailing
//! moving average. The average is the low-pass stage; its length sets how
//! much discretization noise from the physics step reaches the controller.

use nalgebra::{Matrix2, RowVector2, Vector2};

use crate::config::ObserverCfg;
use crate::window::IntegratorWindow;

/// Constant model and gain matrices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemMatrices {
    pub a: Matrix2<f64>,
    pub b: Vector2<f64>,
    pub c: RowVector2<f64>,
    pub l: Vector2<f64>,
}

impl From<&ObserverCfg> for SystemMatrices {
    fn from(c: &ObserverCfg) -> Self {
        Self {
            a: Matrix2::new(c.a[0][0], c.a[0][1], c.a[1][0], c.a[1][1]),
            b: Vector2::new(c.b[0], c.b[1]),
            c: RowVector2::new(c.c[0], c.c[1]),
            l: Vector2::new(c.l[0], c.l[1]),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StateObserver {
    m: SystemMatrices,
    state: Vector2<f64>,
    window: IntegratorWindow,
    last_sample: f64,
}

impl StateObserver {
    pub fn new(m: SystemMatrices, window: usize) -> Self {
        Self {
            m,
            state: Vector2::zeros(),
            window: IntegratorWindow::new(window),
            last_sample: 0.0,
        }
    }

    /// Current `[position, velocity]` estimate.
    #[inline]
    pub fn state(&self) -> Vector2<f64> {
        self.state
    }

    #[inline]
    pub fn position(&self) -> f64 {
        self.state.x
    }

    #[inline]
    pub fn velocity(&self) -> f64 {
        self.state.y
    }

    pub fn window(&self) -> &IntegratorWindow {
        &self.window
    }

    pub fn matrices(&self) -> &SystemMatrices {
        &self.m
    }

    /// Velocity contribution pushed on the most recent update.
    pub fn last_sample(&self) -> f64 {
        self.last_sample
    }

    /// Fold one measurement into the estimate. Call exactly once per tick.
    ///
    /// `prev_command` is the actuator angle written on the previous tick
    /// (after saturation); zero before the first tick.
    pub fn update(&mut self, measurement: f64, prev_command: f64) -> Vector2<f64> {
        let prior = self.state;

        let innovation = measurement - (self.m.c * prior)[0];
        let corrected = self.m.l * innovation;
        let predicted = self.m.a * prior;
        let driven = self.m.b * prev_command;

        let sample = corrected.y + predicted.y + driven.y;
        self.window.push(sample);
        self.last_sample = sample;

        self.state = Vector2::new(measurement, self.window.mean());
        tracing::trace!(
            measurement,
            innovation,
            sample,
            velocity = self.state.y,
            "observer update"
        );
        self.state
    }
}
