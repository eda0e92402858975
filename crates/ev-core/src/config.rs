//! Top-level simulation configuration.
//!
//! Typically loaded from a TOML file by `ev-io::load_config` and passed to
//! `ev_sim::SimBuilder`.  Every field has a default taken from the coastal
//! deployment the simulator was built for, so an empty file is valid.

use std::path::PathBuf;

use crate::{CoreError, CoreResult, Coordinate};

/// Which hazard strategy the session uses.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "snake_case"))]
pub enum HazardConfig {
    /// No hazard: every arrival-time query answers "unknown".
    None,

    /// Dynamic propagation from coastal source points.
    Propagation {
        sources:   Vec<Coordinate>,
        speed_mps: f64,
    },

    /// Precomputed inundation polygons read from a GeoJSON file.  A relative
    /// path is resolved against the scenario data directory.
    Polygons { path: PathBuf },
}

impl Default for HazardConfig {
    /// Three coastline sources at 15 m/s (near-shore approximation).
    fn default() -> Self {
        HazardConfig::Propagation {
            sources: vec![
                Coordinate::new(122.6955, 14.2895),
                Coordinate::new(122.7030, 14.2935),
                Coordinate::new(122.6875, 14.2840),
            ],
            speed_mps: 15.0,
        }
    }
}

/// Simulation parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Simulated seconds advanced by one `step`.
    pub tick_seconds: f64,

    /// Reroute when the hazard reaches an evacuee's position within this
    /// many seconds.
    pub reroute_threshold_secs: f64,

    /// Base walking speed of every evacuee.
    pub walking_speed_mps: f64,

    /// Nominal agent count of a road segment before slowdown starts.
    pub segment_capacity: u32,

    /// `k` in `1 / (1 + k * (density - capacity))`.
    pub congestion_strength: f64,

    /// Capacity for shelters whose source feature has none.
    pub default_shelter_capacity: u32,

    /// Evacuees spawned for buildings whose source feature has no population.
    pub default_building_population: u32,

    /// An evacuee on its final node within this radius has arrived.
    pub arrival_epsilon_m: f64,

    /// Seed for the per-tick activation-order shuffle.
    pub seed: u64,

    pub hazard: HazardConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_seconds:                1.0,
            reroute_threshold_secs:      30.0,
            walking_speed_mps:           1.4,
            segment_capacity:            8,
            congestion_strength:         0.8,
            default_shelter_capacity:    9_999,
            default_building_population: 1,
            arrival_epsilon_m:           1.0,
            seed:                        42,
            hazard:                      HazardConfig::default(),
        }
    }
}

impl SimConfig {
    /// Reject values that would stall or invert the simulation.
    pub fn validate(&self) -> CoreResult<()> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(CoreError::Config(format!("{name} must be positive, got {v}")))
            }
        };
        positive("tick_seconds", self.tick_seconds)?;
        positive("walking_speed_mps", self.walking_speed_mps)?;
        positive("arrival_epsilon_m", self.arrival_epsilon_m)?;

        if !self.reroute_threshold_secs.is_finite() || self.reroute_threshold_secs < 0.0 {
            return Err(CoreError::Config(format!(
                "reroute_threshold_secs must be >= 0, got {}",
                self.reroute_threshold_secs
            )));
        }
        if !self.congestion_strength.is_finite() || self.congestion_strength < 0.0 {
            return Err(CoreError::Config(format!(
                "congestion_strength must be >= 0, got {}",
                self.congestion_strength
            )));
        }
        if self.segment_capacity == 0 {
            return Err(CoreError::Config("segment_capacity must be at least 1".into()));
        }
        if let HazardConfig::Propagation { speed_mps, .. } = &self.hazard {
            positive("hazard.speed_mps", *speed_mps)?;
        }
        Ok(())
    }
}
