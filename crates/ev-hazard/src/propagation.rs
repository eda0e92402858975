//! Dynamic propagation from source points.
//!
//! The front expands from every source at a constant ground speed, so the
//! arrival time at a point is its distance to the nearest source divided by
//! that speed.  Distances are haversine metres.

use ev_core::Coordinate;

use crate::{ArrivalModel, HazardError, HazardResult};

#[derive(Clone, Debug)]
pub struct PropagationHazard {
    sources:   Vec<Coordinate>,
    speed_mps: f64,
}

impl PropagationHazard {
    /// An empty source list is accepted and covers nothing.
    pub fn new(sources: Vec<Coordinate>, speed_mps: f64) -> HazardResult<Self> {
        if !speed_mps.is_finite() || speed_mps <= 0.0 {
            return Err(HazardError::InvalidSpeed(speed_mps));
        }
        if let Some(index) = sources.iter().position(|s| !s.is_finite()) {
            return Err(HazardError::InvalidSource { index });
        }
        Ok(Self { sources, speed_mps })
    }

    pub fn sources(&self) -> &[Coordinate] {
        &self.sources
    }

    pub fn speed_mps(&self) -> f64 {
        self.speed_mps
    }

    /// Metres from `point` to the nearest source.
    pub fn distance_to_front_origin(&self, point: Coordinate) -> Option<f64> {
        self.sources
            .iter()
            .map(|s| s.distance_m(point))
            .min_by(f64::total_cmp)
    }
}

impl ArrivalModel for PropagationHazard {
    fn time_to_inundation(&self, point: Coordinate) -> Option<f64> {
        self.distance_to_front_origin(point).map(|d| d / self.speed_mps)
    }
}
