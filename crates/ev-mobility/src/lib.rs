//! `ev-mobility`: congestion and the evacuee movement state machine.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                       |
//! |----------------|----------------------------------------------------------------|
//! | [`congestion`] | `CongestionModel`, `CongestionEntry`: per-segment density      |
//! | [`engine`]     | `MobilityEngine<R>`, `Movement`, `Reroute`, `release`           |
//! | [`error`]      | `MobilityError`, `MobilityResult<T>`                           |
//!
//! # Movement model (continuous walk along a node route)
//!
//! 1. `MobilityEngine::assign_route` puts an evacuee on a route of at least
//!    two nodes and registers it on the first segment.
//! 2. Each tick, `MobilityEngine::advance` spends
//!    `speed * congestion multiplier * tick_seconds` metres of budget along
//!    the route, rolling over segment boundaries and moving its single
//!    congestion occupancy along with it.
//! 3. On the final node the evacuee becomes `safe`; the caller counts it at
//!    the shelter.
//!
//! An evacuee occupies at most one segment at a time (`Evacuee::occupied`),
//! so releases are exact and a terminal evacuee holds nothing.

pub mod congestion;
pub mod engine;
pub mod error;

#[cfg(test)]
mod tests;

pub use congestion::{
    CongestionEntry, CongestionModel, DEFAULT_CONGESTION_STRENGTH, DEFAULT_SEGMENT_CAPACITY,
};
pub use engine::{release, MobilityEngine, Movement, Reroute};
pub use error::{MobilityError, MobilityResult};
