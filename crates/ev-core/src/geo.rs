//! Geographic coordinate type and distance helpers.
//!
//! `Coordinate` stores WGS-84 degrees as `f64` in **(longitude, latitude)**
//! order, the same axis order GeoJSON uses.  Two distance notions coexist and
//! must not be mixed:
//!
//! - [`Coordinate::planar_distance`]: Euclidean distance in degree space.
//!   Used for shortest-path edge weights, nearest-node snapping and
//!   nearest-shelter selection.
//! - [`Coordinate::distance_m`]: haversine great-circle distance in metres.
//!   Used for movement, arrival detection and hazard propagation, where the
//!   result is compared against simulated seconds.
//!
//! Area geometry (inundation zones, building footprints) is held as
//! `geo::Polygon`/`geo::MultiPolygon` with `x = lon`, `y = lat`; the `From`
//! impls below cross between the two.

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 geographic coordinate, `(lon, lat)` in degrees.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    #[inline]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: Coordinate) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Squared Euclidean distance in degree space.
    #[inline]
    pub fn planar_distance_sq(self, other: Coordinate) -> f64 {
        let dx = self.lon - other.lon;
        let dy = self.lat - other.lat;
        dx * dx + dy * dy
    }

    /// Euclidean distance in degree space.
    #[inline]
    pub fn planar_distance(self, other: Coordinate) -> f64 {
        self.planar_distance_sq(other).sqrt()
    }

    /// Linear interpolation towards `other`; `t` is clamped to `[0, 1]`.
    #[inline]
    pub fn lerp(self, other: Coordinate, t: f64) -> Coordinate {
        let t = t.clamp(0.0, 1.0);
        Coordinate {
            lon: self.lon + (other.lon - self.lon) * t,
            lat: self.lat + (other.lat - self.lat) * t,
        }
    }

    /// `(lat, lon)` pair, the order web map libraries expect.
    #[inline]
    pub fn lat_lon(self) -> (f64, f64) {
        (self.lat, self.lon)
    }

    /// `true` if both components are finite numbers.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

impl From<[f64; 2]> for Coordinate {
    /// GeoJSON position order: `[lon, lat]`.
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}

impl From<Coordinate> for ::geo::Coord<f64> {
    fn from(c: Coordinate) -> Self {
        ::geo::Coord { x: c.lon, y: c.lat }
    }
}

impl From<Coordinate> for ::geo::Point<f64> {
    fn from(c: Coordinate) -> Self {
        ::geo::Point::new(c.lon, c.lat)
    }
}

impl From<::geo::Point<f64>> for Coordinate {
    fn from(p: ::geo::Point<f64>) -> Self {
        Self { lon: p.x(), lat: p.y() }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.7}, {:.7})", self.lon, self.lat)
    }
}
