//! Physics time scaling and the one-way freeze.

use std::fmt;

/// Process-wide simulation state. There is no transition out of `Frozen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimState {
    #[default]
    Running,
    Frozen,
}

impl SimState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimState::Running => "running",
            SimState::Frozen => "frozen",
        }
    }
}

impl fmt::Display for SimState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps the control tick's duration to the physics step's duration.
#[derive(Debug, Clone, Copy)]
pub struct TimeScaler {
    nominal: f64,
    state: SimState,
}

impl TimeScaler {
    pub fn new(nominal: f64) -> Self {
        Self {
            nominal,
            state: SimState::Running,
        }
    }

    #[inline]
    pub fn state(&self) -> SimState {
        self.state
    }

    /// Current multiplier: nominal while running, zero once frozen.
    #[inline]
    pub fn scale(&self) -> f64 {
        match self.state {
            SimState::Running => self.nominal,
            SimState::Frozen => 0.0,
        }
    }

    #[inline]
    pub fn effective(&self, tick_s: f64) -> f64 {
        tick_s * self.scale()
    }

    /// Latch `Frozen`. Returns `true` if this call made the transition.
    pub fn freeze(&mut self) -> bool {
        let was_running = self.state == SimState::Running;
        self.state = SimState::Frozen;
        was_running
    }
}
