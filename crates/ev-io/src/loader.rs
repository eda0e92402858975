//! Scenario layer loaders.
//!
//! Each layer is a GeoJSON `FeatureCollection`:
//!
//! | Layer       | Geometry                              | Properties                                  |
//! |-------------|---------------------------------------|---------------------------------------------|
//! | roads       | `LineString`, `MultiLineString`       | (none)                                      |
//! | buildings   | any point or polygon type             | `population` or `pop`                       |
//! | shelters    | any point or polygon type             | `capacity`, `name`                          |
//! | inundation  | `Polygon`, `MultiPolygon`             | `arrival_time` / `time_to_inundation` / `t_arrival` / `t0` (seconds) |
//!
//! Points and multipoints locate a site at their first point; polygons and
//! multipolygons at an interior point of the whole footprint.  Features with no geometry or an unusable
//! geometry type are skipped with a warning.  Malformed coordinates fail the
//! whole layer.
//!
//! Every `read_*` function takes the file text; the matching `load_*`
//! function reads a path and tags errors with it.

use std::path::Path;

use ev_agent::{BuildingSite, ShelterSite};
use ev_core::Coordinate;
use ev_hazard::HazardZone;
use geo::InteriorPoint;
use tracing::{info, warn};

use crate::geojson::{parse_collection, Ctx, Feature, Geometry};
use crate::{IoError, IoResult};

/// Property names checked, in order, for an inundation arrival time.
pub const ARRIVAL_KEYS: [&str; 4] = ["arrival_time", "time_to_inundation", "t_arrival", "t0"];

/// Property names checked, in order, for a building's population.
pub const POPULATION_KEYS: [&str; 2] = ["population", "pop"];

/// Walkable road polylines.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoadRecord {
    pub lines: Vec<Vec<Coordinate>>,
}

impl RoadRecord {
    pub fn vertex_count(&self) -> usize {
        self.lines.iter().map(Vec::len).sum()
    }
}

// ── Roads ─────────────────────────────────────────────────────────────────────

pub fn read_roads(text: &str) -> IoResult<RoadRecord> {
    let mut record = RoadRecord::default();
    for_each_feature(text, "roads", |ctx, geometry, _| {
        match geometry {
            Geometry::LineString { coordinates } => record.lines.push(ctx.line(coordinates)?),
            Geometry::MultiLineString { coordinates } => {
                for line in coordinates {
                    record.lines.push(ctx.line(line)?);
                }
            }
            other => skip(&ctx, other),
        }
        Ok(())
    })?;
    Ok(record)
}

pub fn load_roads(path: &Path) -> IoResult<RoadRecord> {
    let record = with_file(path, read_roads)?;
    info!(path = %path.display(), lines = record.lines.len(), "loaded roads");
    Ok(record)
}

// ── Buildings and shelters ────────────────────────────────────────────────────

pub fn read_buildings(text: &str) -> IoResult<Vec<BuildingSite>> {
    let mut sites = Vec::new();
    for_each_feature(text, "buildings", |ctx, geometry, feature| {
        let Some(location) = site_location(&ctx, geometry)? else {
            skip(&ctx, geometry);
            return Ok(());
        };
        let population = feature.number(&POPULATION_KEYS).and_then(|n| count(&ctx, "population", n));
        sites.push(BuildingSite::new(location, population));
        Ok(())
    })?;
    Ok(sites)
}

pub fn load_buildings(path: &Path) -> IoResult<Vec<BuildingSite>> {
    let sites = with_file(path, read_buildings)?;
    info!(path = %path.display(), buildings = sites.len(), "loaded buildings");
    Ok(sites)
}

pub fn read_shelters(text: &str) -> IoResult<Vec<ShelterSite>> {
    let mut sites = Vec::new();
    for_each_feature(text, "shelters", |ctx, geometry, feature| {
        let Some(location) = site_location(&ctx, geometry)? else {
            skip(&ctx, geometry);
            return Ok(());
        };
        let capacity = feature.number(&["capacity"]).and_then(|n| count(&ctx, "capacity", n));
        sites.push(ShelterSite::new(location, capacity, feature.string("name")));
        Ok(())
    })?;
    Ok(sites)
}

pub fn load_shelters(path: &Path) -> IoResult<Vec<ShelterSite>> {
    let sites = with_file(path, read_shelters)?;
    info!(path = %path.display(), shelters = sites.len(), "loaded shelters");
    Ok(sites)
}

// ── Inundation ────────────────────────────────────────────────────────────────

/// One zone per usable feature, in file order.  A zone without an arrival
/// property is flooded from the start.
pub fn read_inundation(text: &str) -> IoResult<Vec<HazardZone>> {
    let mut zones = Vec::new();
    for_each_feature(text, "inundation", |ctx, geometry, feature| {
        let polygons = match geometry {
            Geometry::Polygon { coordinates } => vec![ctx.polygon(coordinates)?],
            Geometry::MultiPolygon { coordinates } => ctx.multi_polygon(coordinates)?.0,
            other => {
                skip(&ctx, other);
                return Ok(());
            }
        };
        if polygons.is_empty() {
            skip(&ctx, geometry);
            return Ok(());
        }
        zones.push(HazardZone::new(polygons, feature.number(&ARRIVAL_KEYS)));
        Ok(())
    })?;
    Ok(zones)
}

pub fn load_inundation(path: &Path) -> IoResult<Vec<HazardZone>> {
    let zones = with_file(path, read_inundation)?;
    info!(path = %path.display(), zones = zones.len(), "loaded inundation zones");
    Ok(zones)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn with_file<T>(path: &Path, read: impl FnOnce(&str) -> IoResult<T>) -> IoResult<T> {
    std::fs::read_to_string(path)
        .map_err(IoError::from)
        .and_then(|text| read(&text))
        .map_err(|e| e.in_file(path))
}

fn for_each_feature(
    text: &str,
    layer: &'static str,
    mut visit: impl FnMut(Ctx, &Geometry, &Feature) -> IoResult<()>,
) -> IoResult<()> {
    let collection = parse_collection(text)?;
    for (index, feature) in collection.features.iter().enumerate() {
        let ctx = Ctx { layer, index };
        match &feature.geometry {
            Some(geometry) => visit(ctx, geometry, feature)?,
            None => warn!(layer, index, "feature without geometry skipped"),
        }
    }
    Ok(())
}

fn skip(ctx: &Ctx, geometry: &Geometry) {
    warn!(layer = ctx.layer, index = ctx.index, kind = geometry.kind(), "unusable geometry skipped");
}

/// Where a building or shelter stands, or `None` for line and unknown types
/// and for footprints with no interior point.
fn site_location(ctx: &Ctx, geometry: &Geometry) -> IoResult<Option<Coordinate>> {
    let location = match geometry {
        Geometry::Point { coordinates } => Some(ctx.coordinate(coordinates)?),
        Geometry::MultiPoint { coordinates } => match coordinates.first() {
            Some(p) => Some(ctx.coordinate(p)?),
            None => None,
        },
        Geometry::Polygon { coordinates } => ctx.polygon(coordinates)?.interior_point().map(Coordinate::from),
        Geometry::MultiPolygon { coordinates } => {
            ctx.multi_polygon(coordinates)?.interior_point().map(Coordinate::from)
        }
        _ => None,
    };
    Ok(location)
}

/// A non-negative whole count.  Fractions are truncated; anything else is
/// ignored so the configured default applies.
fn count(ctx: &Ctx, what: &str, n: f64) -> Option<u32> {
    if n.is_finite() && n >= 0.0 {
        Some(n.min(u32::MAX as f64) as u32)
    } else {
        warn!(layer = ctx.layer, index = ctx.index, what, value = n, "ignoring invalid count");
        None
    }
}
