//! Read-only views of a session for reporting.

use ev_agent::{Evacuee, EvacueeState, Shelter};
use ev_core::{AgentId, Coordinate, ShelterId, Tick};
use ev_hazard::HazardSummary;

/// Evacuee counts by state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StateCounts {
    pub idle:       usize,
    pub evacuating: usize,
    pub safe:       usize,
    pub stuck:      usize,
    pub overtaken:  usize,
}

impl StateCounts {
    pub fn tally<'a>(evacuees: impl IntoIterator<Item = &'a Evacuee>) -> Self {
        let mut c = Self::default();
        for e in evacuees {
            match e.state {
                EvacueeState::Idle       => c.idle += 1,
                EvacueeState::Evacuating => c.evacuating += 1,
                EvacueeState::Safe       => c.safe += 1,
                EvacueeState::Stuck      => c.stuck += 1,
                EvacueeState::Overtaken  => c.overtaken += 1,
            }
        }
        c
    }

    pub fn total(&self) -> usize {
        self.idle + self.evacuating + self.safe + self.stuck + self.overtaken
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ShelterOccupancy {
    pub id:        ShelterId,
    pub name:      String,
    pub occupants: u32,
    pub capacity:  u32,
}

impl From<&Shelter> for ShelterOccupancy {
    fn from(s: &Shelter) -> Self {
        Self {
            id:        s.id,
            name:      s.name.clone(),
            occupants: s.occupants(),
            capacity:  s.capacity,
        }
    }
}

/// Aggregate statistics after a step.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SimStats {
    pub tick:       Tick,
    pub time_secs:  f64,
    pub population: usize,
    pub counts:     StateCounts,
    /// Evacuees that reached their final node.
    pub reached:    usize,
    pub hazard:     HazardSummary,
    pub shelters:   Vec<ShelterOccupancy>,
}

/// Returned once a session is initialised.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StartInfo {
    pub population:    usize,
    pub shelter_count: usize,
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AgentPosition {
    pub id:    AgentId,
    pub lat:   f64,
    pub lon:   f64,
    pub state: EvacueeState,
}

impl From<&Evacuee> for AgentPosition {
    fn from(e: &Evacuee) -> Self {
        let (lat, lon) = e.lat_lon();
        Self { id: e.id, lat, lon, state: e.state }
    }
}

/// One segment's congestion for visualisation.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SegmentLoad {
    pub a:         Coordinate,
    pub b:         Coordinate,
    pub capacity:  u32,
    pub density:   u32,
    /// `min(1, density / capacity)`.
    pub intensity: f64,
}
