//! The arrival-time query seam.
//!
//! Movement code only ever asks "when does the water reach this point?", so
//! it depends on this trait rather than on a concrete model.

use ev_core::Coordinate;

/// Anything that can answer hazard arrival-time queries.
pub trait ArrivalModel: Send + Sync {
    /// Seconds after simulation start at which `point` is inundated, or
    /// `None` if the model has no coverage there.
    fn time_to_inundation(&self, point: Coordinate) -> Option<f64>;

    /// `true` iff the arrival time at `point` is known and `<= t`.
    #[inline]
    fn is_inundated_at(&self, point: Coordinate, t: f64) -> bool {
        self.time_to_inundation(point).is_some_and(|arrival| arrival <= t)
    }
}
