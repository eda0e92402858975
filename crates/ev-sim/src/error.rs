use ev_core::CoreError;
use ev_hazard::HazardError;
use thiserror::Error;

/// Failures that prevent a session from starting.  Nothing in the per-tick
/// pipeline returns an error; per-evacuee faults are isolated and logged.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation initialisation failed: {0}")]
    Init(String),

    #[error("{evacuees} evacuee(s) spawned but no shelters are defined")]
    NoShelters { evacuees: usize },

    #[error("invalid configuration: {0}")]
    Core(#[from] CoreError),

    #[error("hazard model: {0}")]
    Hazard(#[from] HazardError),
}

pub type SimResult<T> = Result<T, SimError>;
