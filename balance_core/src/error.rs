//! Typed errors raised at the core's boundaries.

use thiserror::Error;

/// Failures surfaced by `BalanceCore::update` and its collaborators.
#[derive(Debug, Error, Clone)]
pub enum BalanceError {
    /// The physics world rejected a read or an actuator write.
    #[error("physics collaborator error: {0}")]
    Physics(String),
    #[error("configuration error: {0}")]
    Config(String),
    /// The world could not advance with the requested step.
    #[error("invalid state: {0}")]
    State(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing physics world")]
    MissingWorld,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
