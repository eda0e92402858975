//! Minimal GeoJSON wire types.
//!
//! Only what the scenario layers need: a `FeatureCollection` of features
//! with an optional geometry and a free-form property map.  Geometry types
//! the loaders do not use deserialize as [`Geometry::Unsupported`] so one odd
//! feature never rejects a whole layer.

use ev_core::Coordinate;
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{IoError, IoResult};

/// `[lon, lat, ...]`.  Extra ordinates (altitude) are ignored.
pub type Position = Vec<f64>;

#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub geometry:   Option<Geometry>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    #[serde(other)]
    Unsupported,
}

impl Geometry {
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Point { .. }           => "Point",
            Geometry::MultiPoint { .. }      => "MultiPoint",
            Geometry::LineString { .. }      => "LineString",
            Geometry::MultiLineString { .. } => "MultiLineString",
            Geometry::Polygon { .. }         => "Polygon",
            Geometry::MultiPolygon { .. }    => "MultiPolygon",
            Geometry::Unsupported            => "unsupported",
        }
    }
}

impl Feature {
    /// First property among `keys` that holds a number or a numeric string.
    pub fn number(&self, keys: &[&str]) -> Option<f64> {
        let props = self.properties.as_ref()?;
        keys.iter().find_map(|k| match props.get(*k)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
    }

    pub fn string(&self, key: &str) -> Option<String> {
        match self.properties.as_ref()?.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

pub fn parse_collection(text: &str) -> IoResult<FeatureCollection> {
    Ok(serde_json::from_str(text)?)
}

// ── Conversions ───────────────────────────────────────────────────────────────

/// Converts wire positions into typed geometry, attributing failures to one
/// feature of one layer.
pub struct Ctx {
    pub layer: &'static str,
    pub index: usize,
}

impl Ctx {
    pub fn invalid(&self, reason: impl Into<String>) -> IoError {
        IoError::InvalidFeature { layer: self.layer, index: self.index, reason: reason.into() }
    }

    pub fn coordinate(&self, p: &[f64]) -> IoResult<Coordinate> {
        match p {
            [lon, lat, ..] if lon.is_finite() && lat.is_finite() => Ok(Coordinate::new(*lon, *lat)),
            _ => Err(self.invalid(format!("bad position {p:?}"))),
        }
    }

    pub fn line(&self, ps: &[Position]) -> IoResult<Vec<Coordinate>> {
        ps.iter().map(|p| self.coordinate(p)).collect()
    }

    /// A closed ring of at least three distinct vertices.  A repeated
    /// closing vertex is accepted and dropped.
    pub fn ring(&self, ps: &[Position]) -> IoResult<LineString<f64>> {
        let mut coords = self.line(ps)?;
        if coords.len() > 1 && coords.first() == coords.last() {
            coords.pop();
        }
        if coords.len() < 3 {
            return Err(self.invalid(format!(
                "polygon ring needs at least 3 vertices, got {}",
                coords.len()
            )));
        }
        Ok(coords.into_iter().map(Coord::from).collect())
    }

    /// First ring is the exterior, the rest are holes.
    pub fn polygon(&self, rings: &[Vec<Position>]) -> IoResult<Polygon<f64>> {
        let Some((exterior, holes)) = rings.split_first() else {
            return Err(self.invalid("polygon without rings"));
        };
        let holes = holes.iter().map(|r| self.ring(r)).collect::<IoResult<Vec<_>>>()?;
        Ok(Polygon::new(self.ring(exterior)?, holes))
    }

    pub fn multi_polygon(&self, parts: &[Vec<Vec<Position>>]) -> IoResult<MultiPolygon<f64>> {
        parts.iter().map(|rings| self.polygon(rings)).collect::<IoResult<Vec<_>>>().map(MultiPolygon::new)
    }
}
