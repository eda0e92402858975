//! `ev-io`: scenario input for the evacuation simulator.
//!
//! | Module     | Contents                                                    |
//! |------------|-------------------------------------------------------------|
//! | `geojson`  | `FeatureCollection` wire types (`serde_json`)               |
//! | `loader`   | Road, building, shelter and inundation layers               |
//! | `scenario` | `ScenarioInputs`, `load_scenario`, TOML config, hazard load |
//! | `error`    | `IoError`, `IoResult`                                       |
//!
//! A data directory holds `roads.geojson`, `buildings.geojson` and
//! `evac.geojson`, plus an inundation layer when the config selects polygon
//! hazard mode.

pub mod error;
pub mod geojson;
pub mod loader;
pub mod scenario;


pub use error::{IoError, IoResult};
pub use loader::{
    load_buildings, load_inundation, load_roads, load_shelters, read_buildings, read_inundation,
    read_roads, read_shelters, RoadRecord,
};
pub use scenario::{
    load_config, load_hazard, load_scenario, parse_config, ScenarioInputs, BUILDINGS_FILE,
    ROADS_FILE, SHELTERS_FILE,
};
