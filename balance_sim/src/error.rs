use balance_traits::Body;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("body {0:?} is not kinematic; only the actuator angle can be set")]
    NotKinematic(Body),
    #[error("non-finite actuator angle: {0}")]
    NonFiniteAngle(f64),
    #[error("invalid step duration: {0}")]
    InvalidStep(f64),
}

pub type Result<T> = std::result::Result<T, SimError>;
