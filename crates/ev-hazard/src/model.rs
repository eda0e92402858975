//! The session's hazard model: one strategy plus the current hazard time.
//!
//! `update(t)` is called once per step by the orchestrator; every other call
//! is a read.  With [`HazardStrategy::None`] every query answers `None`.

use ev_core::{Coordinate, HazardConfig};
use geo::MultiPolygon;
use tracing::info;

use crate::{
    ArrivalModel, HazardError, HazardResult, HazardZone, PolygonHazard, PropagationHazard,
};

// ── Strategy ──────────────────────────────────────────────────────────────────

/// The mutually exclusive arrival-time strategies.
#[derive(Clone, Debug, Default)]
pub enum HazardStrategy {
    #[default]
    None,
    Polygons(PolygonHazard),
    Propagation(PropagationHazard),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HazardMode {
    None,
    Polygons,
    Propagation,
}

impl HazardMode {
    pub fn as_str(self) -> &'static str {
        match self {
            HazardMode::None        => "none",
            HazardMode::Polygons    => "polygons",
            HazardMode::Propagation => "propagation",
        }
    }
}

impl std::fmt::Display for HazardMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Reports ───────────────────────────────────────────────────────────────────

/// Static description of the model plus its clock, for stats reporting.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HazardSummary {
    pub mode:                  HazardMode,
    pub polygon_count:         usize,
    pub source_count:          usize,
    pub propagation_speed_mps: Option<f64>,
    pub current_time_secs:     f64,
}

/// One inundation zone as seen at the model's current time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ZoneSnapshot {
    pub area:          MultiPolygon<f64>,
    pub arrival_secs:  f64,
    pub inundated_now: bool,
}

/// Current hazard extent.  Only polygon mode has geometry to report.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HazardSnapshot {
    pub time_secs: f64,
    pub zones:     Vec<ZoneSnapshot>,
}

impl HazardSnapshot {
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Zones already reached by the water.
    pub fn inundated(&self) -> impl Iterator<Item = &ZoneSnapshot> {
        self.zones.iter().filter(|z| z.inundated_now)
    }
}

// ── HazardModel ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct HazardModel {
    strategy:     HazardStrategy,
    current_time: f64,
}

impl HazardModel {
    pub fn new(strategy: HazardStrategy) -> Self {
        Self { strategy, current_time: 0.0 }
    }

    /// A model with no coverage anywhere.
    pub fn none() -> Self {
        Self::new(HazardStrategy::None)
    }

    pub fn polygons(zones: Vec<HazardZone>) -> HazardResult<Self> {
        Ok(Self::new(HazardStrategy::Polygons(PolygonHazard::new(zones)?)))
    }

    pub fn propagation(sources: Vec<Coordinate>, speed_mps: f64) -> HazardResult<Self> {
        Ok(Self::new(HazardStrategy::Propagation(PropagationHazard::new(sources, speed_mps)?)))
    }

    /// Build from configuration.  Polygon mode needs its zones read from disk
    /// first, so it is rejected here; use [`HazardModel::polygons`].
    pub fn from_config(cfg: &HazardConfig) -> HazardResult<Self> {
        let model = match cfg {
            HazardConfig::None => Self::none(),
            HazardConfig::Propagation { sources, speed_mps } => {
                Self::propagation(sources.clone(), *speed_mps)?
            }
            HazardConfig::Polygons { path } => {
                return Err(HazardError::ZonesNotLoaded(path.clone()));
            }
        };
        info!(mode = %model.mode(), "hazard model configured");
        Ok(model)
    }

    pub fn strategy(&self) -> &HazardStrategy {
        &self.strategy
    }

    pub fn mode(&self) -> HazardMode {
        match self.strategy {
            HazardStrategy::None           => HazardMode::None,
            HazardStrategy::Polygons(_)    => HazardMode::Polygons,
            HazardStrategy::Propagation(_) => HazardMode::Propagation,
        }
    }

    // ── Clock ─────────────────────────────────────────────────────────────

    /// Set the model's current time (seconds since simulation start).
    pub fn update(&mut self, t: f64) {
        self.current_time = t;
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// `time_to_inundation(point) <= t`, with `t` defaulting to the model's
    /// current time.  Unknown arrival is never inundated.
    pub fn is_inundated(&self, point: Coordinate, t: Option<f64>) -> bool {
        self.is_inundated_at(point, t.unwrap_or(self.current_time))
    }

    /// Seconds remaining until the water reaches `point`, negative once it
    /// has.  `None` if the point is not covered.
    pub fn time_left(&self, point: Coordinate) -> Option<f64> {
        self.time_to_inundation(point).map(|arrival| arrival - self.current_time)
    }

    /// First polygon zone containing `point` (polygon mode only).
    pub fn zone_at(&self, point: Coordinate) -> Option<&HazardZone> {
        match &self.strategy {
            HazardStrategy::Polygons(p) => p.zone_at(point),
            _ => None,
        }
    }

    pub fn summary(&self) -> HazardSummary {
        let (polygon_count, source_count, speed) = match &self.strategy {
            HazardStrategy::None => (0, 0, None),
            HazardStrategy::Polygons(p) => (p.polygon_count(), 0, None),
            HazardStrategy::Propagation(p) => (0, p.sources().len(), Some(p.speed_mps())),
        };
        HazardSummary {
            mode: self.mode(),
            polygon_count,
            source_count,
            propagation_speed_mps: speed,
            current_time_secs: self.current_time,
        }
    }

    /// Zone geometry with an `inundated_now` flag at the current time.
    /// Empty outside polygon mode.
    pub fn snapshot(&self) -> HazardSnapshot {
        let zones = match &self.strategy {
            HazardStrategy::Polygons(p) => p
                .zones()
                .iter()
                .map(|z| ZoneSnapshot {
                    area:          z.area.clone(),
                    arrival_secs:  z.arrival_secs,
                    inundated_now: z.arrival_secs <= self.current_time,
                })
                .collect(),
            _ => Vec::new(),
        };
        HazardSnapshot { time_secs: self.current_time, zones }
    }
}

impl ArrivalModel for HazardModel {
    fn time_to_inundation(&self, point: Coordinate) -> Option<f64> {
        match &self.strategy {
            HazardStrategy::None => None,
            HazardStrategy::Polygons(p) => p.time_to_inundation(point),
            HazardStrategy::Propagation(p) => p.time_to_inundation(point),
        }
    }
}
