#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core balancing logic (physics-agnostic).
//!
//! This crate provides the engine-independent control loop. All interaction
//! with the simulated rig goes through the `balance_traits::PhysicsWorld`
//! trait.
//!
//! ## Architecture
//!
//! - **Measurement**: ball distance from a beam-mounted reference point (`measurement`)
//! - **Observer**: position substitution plus windowed velocity estimate (`observer`, `window`)
//! - **Control**: state feedback with saturation, or an open-loop sweep (`controller`)
//! - **Safety**: contact-loss watchdog with a one-way freeze (`contact`, `time_scale`)
//! - **Loop**: `BalanceCore::update` / `draw`, and a fixed-rate `runner`
//!
//! Positions are meters and angles radians throughout; raw collaborator units
//! are converted once, in `SensorMount::measure`.

pub mod builder;
pub mod config;
pub mod contact;
pub mod controller;
pub mod conversions;
pub mod core;
pub mod error;
pub mod measurement;
pub mod mocks;
pub mod observer;
pub mod physics_error;
pub mod runner;
pub mod status;
pub mod time_scale;
pub mod util;
pub mod window;

pub use crate::builder::{Balancer, BalancerBuilder, Missing, SWEEP_START, Set, build_balancer};
pub use crate::config::{
    BalanceCfg, ContactCfg, ControlMode, ControllerCfg, LoopCfg, ObserverCfg, SensorCfg,
};
pub use crate::contact::ContactMonitor;
pub use crate::controller::{Command, FeedbackController, Sweep, saturate};
pub use crate::core::BalanceCore;
pub use crate::error::{BalanceError, BuildError, Report, Result};
pub use crate::measurement::SensorMount;
pub use crate::observer::{StateObserver, SystemMatrices};
pub use crate::physics_error::map_physics_error;
pub use crate::runner::{RunParams, RunSummary, run};
pub use crate::status::{Snapshot, TickStatus};
pub use crate::time_scale::{SimState, TimeScaler};
pub use crate::window::IntegratorWindow;
