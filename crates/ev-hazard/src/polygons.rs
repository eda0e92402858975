//! Precomputed inundation polygons.
//!
//! Each zone is one input feature: one or more polygons sharing a single
//! arrival time.  Queries scan the zones in input order and return the first
//! one whose geometry contains or touches the point; overlapping zones are
//! not merged or sorted.

use ev_core::Coordinate;
use geo::{Contains, Intersects, MultiPolygon, Point, Polygon};

use crate::{ArrivalModel, HazardError, HazardResult};

/// One inundation feature.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HazardZone {
    pub area:         MultiPolygon<f64>,
    pub arrival_secs: f64,
}

impl HazardZone {
    /// A zone without an arrival attribute is inundated from t = 0.
    pub fn new(polygons: Vec<Polygon<f64>>, arrival_secs: Option<f64>) -> Self {
        Self { area: MultiPolygon::new(polygons), arrival_secs: arrival_secs.unwrap_or(0.0) }
    }

    /// Interior, outer ring and hole rings all count.
    pub fn contains_or_touches(&self, point: Coordinate) -> bool {
        let p = Point::from(point);
        self.area.0.iter().any(|poly| {
            poly.contains(&p)
                || poly.exterior().intersects(&p)
                || poly.interiors().iter().any(|ring| ring.intersects(&p))
        })
    }

    pub fn polygon_count(&self) -> usize {
        self.area.0.len()
    }
}

/// Ordered list of inundation zones.
#[derive(Clone, Debug, Default)]
pub struct PolygonHazard {
    zones: Vec<HazardZone>,
}

impl PolygonHazard {
    pub fn new(zones: Vec<HazardZone>) -> HazardResult<Self> {
        for (index, zone) in zones.iter().enumerate() {
            if zone.area.0.is_empty() {
                return Err(HazardError::EmptyZone { index });
            }
            if !zone.arrival_secs.is_finite() {
                return Err(HazardError::InvalidArrival { index });
            }
        }
        Ok(Self { zones })
    }

    pub fn zones(&self) -> &[HazardZone] {
        &self.zones
    }

    /// First zone, in input order, that contains or touches `point`.
    pub fn zone_at(&self, point: Coordinate) -> Option<&HazardZone> {
        self.zones.iter().find(|z| z.contains_or_touches(point))
    }

    pub fn polygon_count(&self) -> usize {
        self.zones.iter().map(HazardZone::polygon_count).sum()
    }
}

impl ArrivalModel for PolygonHazard {
    fn time_to_inundation(&self, point: Coordinate) -> Option<f64> {
        self.zone_at(point).map(|z| z.arrival_secs)
    }
}
