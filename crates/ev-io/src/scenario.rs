//! A scenario data directory and its configuration.

use std::path::{Path, PathBuf};

use ev_agent::{BuildingSite, ShelterSite};
use ev_core::{Coordinate, HazardConfig, SimConfig};
use ev_hazard::HazardModel;
use tracing::info;

use crate::loader::{load_buildings, load_inundation, load_roads, load_shelters};
use crate::{IoError, IoResult};

pub const ROADS_FILE: &str = "roads.geojson";
pub const BUILDINGS_FILE: &str = "buildings.geojson";
pub const SHELTERS_FILE: &str = "evac.geojson";

/// Everything a session needs from the data directory besides the hazard.
#[derive(Clone, Debug, Default)]
pub struct ScenarioInputs {
    pub roads:     Vec<Vec<Coordinate>>,
    pub buildings: Vec<BuildingSite>,
    pub shelters:  Vec<ShelterSite>,
}

/// Read the three scenario layers from `data_dir`.  Any missing or malformed
/// layer fails the whole load.
pub fn load_scenario(data_dir: &Path) -> IoResult<ScenarioInputs> {
    let roads = load_roads(&data_dir.join(ROADS_FILE))?;
    let buildings = load_buildings(&data_dir.join(BUILDINGS_FILE))?;
    let shelters = load_shelters(&data_dir.join(SHELTERS_FILE))?;
    Ok(ScenarioInputs { roads: roads.lines, buildings, shelters })
}

/// Parse a TOML config.  Missing fields take their defaults; the result is
/// validated.
pub fn parse_config(text: &str) -> IoResult<SimConfig> {
    let cfg: SimConfig = toml::from_str(text)?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_config(path: &Path) -> IoResult<SimConfig> {
    let cfg = std::fs::read_to_string(path)
        .map_err(IoError::from)
        .and_then(|text| parse_config(&text))
        .map_err(|e| e.in_file(path))?;
    info!(path = %path.display(), seed = cfg.seed, tick_seconds = cfg.tick_seconds, "loaded config");
    Ok(cfg)
}

/// Build the hazard model `cfg` asks for.  Inundation polygons are read
/// from disk, a relative path being resolved against `data_dir`.
pub fn load_hazard(cfg: &SimConfig, data_dir: &Path) -> IoResult<HazardModel> {
    match &cfg.hazard {
        HazardConfig::Polygons { path } => {
            let path = resolve(data_dir, path);
            let zones = load_inundation(&path)?;
            HazardModel::polygons(zones).map_err(|e| IoError::from(e).in_file(path))
        }
        other => Ok(HazardModel::from_config(other)?),
    }
}

fn resolve(data_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() { path.to_path_buf() } else { data_dir.join(path) }
}
