//! `ev-agent`: evacuee and shelter entities for the evacuation simulator.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`state`]     | `EvacueeState` (allowed transitions), `RouteCursor`       |
//! | [`evacuee`]   | `Evacuee`                                                 |
//! | [`shelter`]   | `Shelter` (capacity-bounded occupant counter)             |
//! | [`builder`]   | `PopulationBuilder`, `BuildingSite`, `ShelterSite`        |
//!
//! Entities here are plain data with local invariants.  Anything touching
//! the road graph, congestion or the hazard lives in `ev-mobility` and
//! `ev-sim`.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                   |
//! |---------|----------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on all public types.   |

pub mod builder;
pub mod evacuee;
pub mod shelter;
pub mod state;


pub use builder::{BuildingSite, Population, PopulationBuilder, ShelterSite};
pub use evacuee::Evacuee;
pub use shelter::Shelter;
pub use state::{EvacueeState, RouteCursor};
