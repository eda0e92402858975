//! Plain data row types written by output backends.

use ev_agent::{Evacuee, EvacueeState};
use ev_core::Tick;
use ev_sim::SimStats;

/// One evacuee at a given tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshotRow {
    pub agent_id: u32,
    pub tick:     u64,
    pub lat:      f64,
    pub lon:      f64,
    pub state:    EvacueeState,
    /// Assigned shelter, if any.
    pub shelter:  Option<u32>,
}

impl AgentSnapshotRow {
    pub fn new(tick: Tick, e: &Evacuee) -> Self {
        let (lat, lon) = e.lat_lon();
        Self {
            agent_id: e.id.0,
            tick:     tick.0,
            lat,
            lon,
            state:    e.state,
            shelter:  e.shelter.map(|s| s.0),
        }
    }
}

/// Aggregate counts after one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSummaryRow {
    pub tick:       u64,
    pub time_secs:  f64,
    pub population: u64,
    pub idle:       u64,
    pub evacuating: u64,
    pub safe:       u64,
    pub stuck:      u64,
    pub overtaken:  u64,
    pub reached:    u64,
    /// Occupants counted across all shelters.
    pub sheltered:  u64,
}

impl From<&SimStats> for StepSummaryRow {
    fn from(s: &SimStats) -> Self {
        Self {
            tick:       s.tick.0,
            time_secs:  s.time_secs,
            population: s.population as u64,
            idle:       s.counts.idle as u64,
            evacuating: s.counts.evacuating as u64,
            safe:       s.counts.safe as u64,
            stuck:      s.counts.stuck as u64,
            overtaken:  s.counts.overtaken as u64,
            reached:    s.reached as u64,
            sheltered:  s.shelters.iter().map(|o| o.occupants as u64).sum(),
        }
    }
}
