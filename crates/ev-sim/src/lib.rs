//! `ev-sim`: evacuation session orchestrator.
//!
//! # Step pipeline
//!
//! ```text
//! step():
//!   ① Clock    : advance one tick; hazard.update(elapsed seconds).
//!   ② Movement : shuffle evacuating evacuees with the session RNG and
//!                advance each once.  Arrivals are counted into their
//!                shelter; faults mark the evacuee stuck.
//!   ③ Hazard   : per evacuating evacuee, in index order:
//!                  water already here      → overtaken
//!                  water due ≤ threshold   → recompute_route
//!                  assigned shelter full   → recompute_route
//!   ④ Stats    : push SimStats onto history.
//! ```
//!
//! Sessions start through [`SimBuilder`], which spawns evacuees from
//! building sites, registers every road segment with the congestion model
//! and routes each evacuee to its nearest shelter.
//!
//! # Cargo features
//!
//! | Feature | Effect                                                    |
//! |---------|-----------------------------------------------------------|
//! | `serde` | `Serialize` on stats, positions and segment loads.        |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ev_core::SimConfig;
//! use ev_sim::{NoopObserver, SimBuilder};
//! use ev_spatial::DijkstraRouter;
//!
//! let mut sim = SimBuilder::new(SimConfig::default(), DijkstraRouter)
//!     .roads(roads)
//!     .buildings(buildings)
//!     .shelters(shelters)
//!     .build()?;
//! sim.run_until_settled(3_600, &mut NoopObserver);
//! println!("{} safe", sim.stats().counts.safe);
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;
pub mod stats;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
pub use stats::{AgentPosition, SegmentLoad, ShelterOccupancy, SimStats, StartInfo, StateCounts};
