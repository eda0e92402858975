//! A pedestrian walking from home to a shelter.

use ev_core::{AgentId, Coordinate, ShelterId};
use ev_spatial::SegmentKey;

use crate::{EvacueeState, RouteCursor};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evacuee {
    pub id:        AgentId,
    pub home:      Coordinate,
    /// Interpolated position; not necessarily a graph node.
    pub pos:       Coordinate,
    pub speed_mps: f64,
    pub state:     EvacueeState,
    pub shelter:   Option<ShelterId>,
    pub route:     Vec<Coordinate>,
    pub cursor:    RouteCursor,
    /// The one congestion segment this evacuee currently counts towards.
    pub occupied:  Option<SegmentKey>,
    /// Set once the final route node is reached.
    pub reached:   bool,
}

impl Evacuee {
    /// A new idle evacuee standing at `home`.
    pub fn new(id: AgentId, home: Coordinate, speed_mps: f64) -> Self {
        Self {
            id,
            home,
            pos:      home,
            speed_mps,
            state:    EvacueeState::Idle,
            shelter:  None,
            route:    Vec::new(),
            cursor:   RouteCursor::START,
            occupied: None,
            reached:  false,
        }
    }

    #[inline]
    pub fn is_evacuating(&self) -> bool {
        self.state == EvacueeState::Evacuating
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Move along an allowed state-machine edge.  Returns `false` and leaves
    /// the state unchanged otherwise.
    pub fn transition(&mut self, next: EvacueeState) -> bool {
        if self.state.can_transition_to(next) {
            self.state = next;
            true
        } else {
            false
        }
    }

    /// Endpoints of the segment under the cursor, or `None` when standing on
    /// the last node or without a route.
    pub fn current_segment(&self) -> Option<(Coordinate, Coordinate)> {
        let i = self.cursor.segment;
        match (self.route.get(i), self.route.get(i + 1)) {
            (Some(&a), Some(&b)) => Some((a, b)),
            _ => None,
        }
    }

    /// `true` when the cursor is on the route's final node.
    pub fn at_final_node(&self) -> bool {
        !self.route.is_empty() && self.cursor.segment + 1 >= self.route.len()
    }

    /// Route nodes not yet passed, starting with the current segment's start.
    pub fn remaining_route(&self) -> &[Coordinate] {
        self.route.get(self.cursor.segment..).unwrap_or(&[])
    }

    pub fn destination(&self) -> Option<Coordinate> {
        self.route.last().copied()
    }

    /// `(lat, lon)` of the current position.
    pub fn lat_lon(&self) -> (f64, f64) {
        self.pos.lat_lon()
    }
}
