//! `ev-spatial`: road network, node snapping, spatial indexing, and routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `RoadNetwork` (CSR + R-tree), `RoadNetworkBuilder`, `NodeKey`, `SegmentKey` |
//! | [`router`]  | `Router` trait, `Route`, `DijkstraRouter`, `shortest_path`  |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Two distances
//!
//! Edge weights (what Dijkstra minimises) and nearest-node snapping use
//! planar degree-space distance.  Movement in `ev-mobility` measures the
//! route's segments in haversine metres itself.  The two are never mixed.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod network;
pub mod router;


pub use error::{SpatialError, SpatialResult};
pub use network::{NodeKey, RoadNetwork, RoadNetworkBuilder, SegmentKey};
pub use router::{shortest_path, DijkstraRouter, Route, Router};
