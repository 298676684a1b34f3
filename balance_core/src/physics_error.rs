//! Maps `Box<dyn Error>` from the physics seam to typed `BalanceError`.
//!
//! The traits in `balance_traits` use `Box<dyn Error + Send + Sync>` so any
//! engine can sit behind them; this module converts those to our typed error
//! enum, with an optional feature-gated path for `balance_sim::SimError`.

use crate::error::BalanceError;

/// Map a trait-boundary error to a typed `BalanceError`.
pub fn map_physics_error(e: &(dyn std::error::Error + 'static)) -> BalanceError {
    #[cfg(feature = "sim-errors")]
    {
        if let Some(sim) = e.downcast_ref::<balance_sim::error::SimError>() {
            return match sim {
                balance_sim::error::SimError::InvalidStep(dt) => {
                    BalanceError::State(format!("world refused step of {dt} s"))
                }
                other => BalanceError::Physics(other.to_string()),
            };
        }
    }

    BalanceError::Physics(e.to_string())
}
