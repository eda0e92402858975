use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HazardError {
    #[error("propagation speed must be positive and finite, got {0}")]
    InvalidSpeed(f64),

    #[error("hazard source {index} is not a finite coordinate")]
    InvalidSource { index: usize },

    #[error("inundation zone {index} has no polygons")]
    EmptyZone { index: usize },

    #[error("inundation zone {index} has a non-finite arrival time")]
    InvalidArrival { index: usize },

    #[error("polygon hazard zones from {} must be loaded before building the model", .0.display())]
    ZonesNotLoaded(PathBuf),
}

pub type HazardResult<T> = Result<T, HazardError>;
