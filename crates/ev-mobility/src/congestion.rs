//! Per-segment occupancy and the congestion speed penalty.
//!
//! Every road segment has a nominal `capacity` and a live `density` (agents
//! currently walking it).  Past capacity, walking speed on the segment is
//! scaled by
//!
//! ```text
//!   1 / (1 + k * (density - capacity))
//! ```
//!
//! which is always in `(0, 1]`: agents slow down but are never blocked, so
//! congestion alone cannot deadlock the simulation.
//!
//! All operations are keyed by the unordered endpoint pair.  `enter` and
//! `leave` on a segment that was never registered are silent no-ops.

use rustc_hash::FxHashMap;

use ev_core::{Coordinate, SimConfig};
use ev_spatial::{RoadNetwork, SegmentKey};

pub const DEFAULT_SEGMENT_CAPACITY: u32 = 8;
pub const DEFAULT_CONGESTION_STRENGTH: f64 = 0.8;

/// State of one registered segment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CongestionEntry {
    /// Endpoints as first registered.
    pub a:        Coordinate,
    pub b:        Coordinate,
    pub capacity: u32,
    pub density:  u32,
}

impl CongestionEntry {
    /// `min(1, density / capacity)`, for visualisation.
    pub fn intensity(&self) -> f64 {
        if self.capacity == 0 {
            return if self.density > 0 { 1.0 } else { 0.0 };
        }
        (self.density as f64 / self.capacity as f64).min(1.0)
    }
}

pub struct CongestionModel {
    entries:          FxHashMap<SegmentKey, CongestionEntry>,
    default_capacity: u32,
    strength:         f64,
}

impl CongestionModel {
    pub fn new(default_capacity: u32, strength: f64) -> Self {
        Self { entries: FxHashMap::default(), default_capacity, strength }
    }

    pub fn from_config(cfg: &SimConfig) -> Self {
        Self::new(cfg.segment_capacity, cfg.congestion_strength)
    }

    // ── Registration ──────────────────────────────────────────────────────

    /// Register with the default capacity.  Idempotent; returns `true` if the
    /// segment was new.
    pub fn register(&mut self, a: Coordinate, b: Coordinate) -> bool {
        self.register_with_capacity(a, b, self.default_capacity)
    }

    /// Register with an explicit capacity.  An existing entry is untouched.
    pub fn register_with_capacity(&mut self, a: Coordinate, b: Coordinate, capacity: u32) -> bool {
        let key = SegmentKey::new(a, b);
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, CongestionEntry { a, b, capacity, density: 0 });
        true
    }

    /// Register every segment of `network`.  Returns the number registered.
    pub fn register_network(&mut self, network: &RoadNetwork) -> usize {
        network
            .segment_coords()
            .filter(|&(a, b)| self.register(a, b))
            .count()
    }

    // ── Occupancy ─────────────────────────────────────────────────────────

    /// Increment density.  Returns `false` (and does nothing) if the segment
    /// is not registered.
    pub fn enter(&mut self, a: Coordinate, b: Coordinate) -> bool {
        self.enter_key(SegmentKey::new(a, b))
    }

    /// Decrement density, clamped at zero.  Returns `false` (and does
    /// nothing) if the segment is not registered.
    pub fn leave(&mut self, a: Coordinate, b: Coordinate) -> bool {
        self.leave_key(SegmentKey::new(a, b))
    }

    pub fn enter_key(&mut self, key: SegmentKey) -> bool {
        match self.entries.get_mut(&key) {
            Some(e) => {
                e.density += 1;
                true
            }
            None => false,
        }
    }

    pub fn leave_key(&mut self, key: SegmentKey) -> bool {
        match self.entries.get_mut(&key) {
            Some(e) => {
                e.density = e.density.saturating_sub(1);
                true
            }
            None => false,
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Speed factor in `(0, 1]`.  Unregistered segments are unpenalised.
    pub fn speed_multiplier(&self, a: Coordinate, b: Coordinate) -> f64 {
        self.speed_multiplier_key(SegmentKey::new(a, b))
    }

    pub fn speed_multiplier_key(&self, key: SegmentKey) -> f64 {
        match self.entries.get(&key) {
            Some(e) if e.density > e.capacity => {
                let overflow = (e.density - e.capacity) as f64;
                1.0 / (1.0 + self.strength * overflow)
            }
            _ => 1.0,
        }
    }

    pub fn entry(&self, a: Coordinate, b: Coordinate) -> Option<&CongestionEntry> {
        self.entries.get(&SegmentKey::new(a, b))
    }

    pub fn density(&self, a: Coordinate, b: Coordinate) -> Option<u32> {
        self.entry(a, b).map(|e| e.density)
    }

    pub fn capacity(&self, a: Coordinate, b: Coordinate) -> Option<u32> {
        self.entry(a, b).map(|e| e.capacity)
    }

    /// Sum of all densities.
    pub fn total_density(&self) -> u64 {
        self.entries.values().map(|e| e.density as u64).sum()
    }

    /// All registered segments in unspecified order.
    pub fn segments(&self) -> impl Iterator<Item = (&SegmentKey, &CongestionEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CongestionModel {
    fn default() -> Self {
        Self::new(DEFAULT_SEGMENT_CAPACITY, DEFAULT_CONGESTION_STRENGTH)
    }
}
