//! `ev-hazard`: tsunami arrival-time models.
//!
//! # Crate layout
//!
//! | Module          | Contents                                               |
//! |-----------------|--------------------------------------------------------|
//! | [`arrival`]     | `ArrivalModel` trait                                   |
//! | [`polygons`]    | `PolygonHazard`, `HazardZone` (precomputed inundation) |
//! | [`propagation`] | `PropagationHazard` (distance-to-source / speed)       |
//! | [`model`]       | `HazardModel` (clock + strategy), summaries, snapshots |
//! | [`error`]       | `HazardError`, `HazardResult<T>`                       |
//!
//! Arrival times are seconds since the start of the simulation.  `None`
//! means the location is not covered by the model, which callers treat as
//! "never inundated" rather than as an error.

pub mod arrival;
pub mod error;
pub mod model;
pub mod polygons;
pub mod propagation;


pub use arrival::ArrivalModel;
pub use error::{HazardError, HazardResult};
pub use model::{HazardMode, HazardModel, HazardSnapshot, HazardStrategy, HazardSummary, ZoneSnapshot};
pub use polygons::{HazardZone, PolygonHazard};
pub use propagation::PropagationHazard;
