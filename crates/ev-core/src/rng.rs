//! Deterministic simulation-level RNG.
//!
//! The only randomness in an evacuation run is the order in which evacuees
//! are activated each tick.  The shuffle is a fairness device (no evacuee
//! always wins the marginal density increment on a shared segment), so it
//! must be reproducible: the same seed always yields the same orders.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Seeded RNG owned by a simulation session.
///
/// Used only from the single-threaded step pipeline.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.0);
    }
}
