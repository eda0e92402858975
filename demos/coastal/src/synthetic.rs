//! A small synthetic coastal town for running without a data directory.
//!
//! A 6 × 6 street grid (~100 m blocks) runs inland from a shoreline along its
//! southern edge.  Houses line the two southernmost streets; two shelters sit
//! on high ground at the northern corners, one of them small enough to fill.

use ev_agent::{BuildingSite, ShelterSite};
use ev_core::{Coordinate, HazardConfig};
use ev_io::ScenarioInputs;

const ORIGIN: Coordinate = Coordinate { lon: 122.690, lat: 14.290 };
const BLOCK_DEG: f64 = 0.0009;
const GRID: usize = 6;

fn at(col: usize, row: usize) -> Coordinate {
    Coordinate::new(ORIGIN.lon + col as f64 * BLOCK_DEG, ORIGIN.lat + row as f64 * BLOCK_DEG)
}

pub fn scenario() -> ScenarioInputs {
    let mut roads = Vec::new();
    for i in 0..GRID {
        roads.push((0..GRID).map(|j| at(j, i)).collect());
        roads.push((0..GRID).map(|j| at(i, j)).collect());
    }

    let buildings = (0..GRID)
        .flat_map(|col| (0..2).map(move |row| at(col, row)))
        .map(|p| BuildingSite::new(p, Some(12)))
        .collect();

    let shelters = vec![
        ShelterSite::new(at(0, GRID - 1), Some(40), Some("chapel".into())),
        ShelterSite::new(at(GRID - 1, GRID - 1), None, Some("school".into())),
    ];

    ScenarioInputs { roads, buildings, shelters }
}

/// A front rising from two points offshore at 2 m/s.
pub fn hazard() -> HazardConfig {
    HazardConfig::Propagation {
        sources:   vec![
            Coordinate::new(ORIGIN.lon + BLOCK_DEG, ORIGIN.lat - 3.0 * BLOCK_DEG),
            Coordinate::new(ORIGIN.lon + 4.0 * BLOCK_DEG, ORIGIN.lat - 3.0 * BLOCK_DEG),
        ],
        speed_mps: 2.0,
    }
}
