//! `ev-core`: foundational types for the tsunami evacuation simulator.
//!
//! This crate is a dependency of every other `ev-*` crate.  It intentionally
//! has no `ev-*` dependencies and minimal external ones (`rand`, `thiserror`
//! and `geo`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `ShelterId`, `NodeId`, `EdgeId`            |
//! | [`geo`]         | `Coordinate`, distances, `geo::Point` conversions     |
//! | [`time`]        | `Tick`, `SimClock`                                    |
//! | [`config`]      | `SimConfig`, `HazardConfig`                           |
//! | [`rng`]         | `SimRng` (seeded activation-order shuffling)          |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!
//! `ev-io` enables `serde` to read `SimConfig` from TOML.

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{HazardConfig, SimConfig};
pub use error::{CoreError, CoreResult};
pub use geo::Coordinate;
pub use ids::{AgentId, EdgeId, NodeId, ShelterId};
pub use rng::SimRng;
pub use time::{SimClock, Tick};
