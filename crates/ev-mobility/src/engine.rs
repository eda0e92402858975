//! Per-evacuee movement: route assignment, the tick-by-tick walk, arrival,
//! overtake and congestion bookkeeping.
//!
//! The engine never touches shelters or other evacuees.  Outcomes that
//! concern the rest of the world (an arrival to count, an overtake to report)
//! are returned to the caller as a [`Movement`].

use ev_core::{AgentId, Coordinate, ShelterId, SimConfig};
use ev_agent::{Evacuee, EvacueeState};
use ev_hazard::ArrivalModel;
use ev_spatial::{RoadNetwork, Router, SegmentKey};

use crate::{CongestionModel, MobilityError, MobilityResult};

/// What one call to [`MobilityEngine::advance`] did.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Movement {
    /// The evacuee was not evacuating; nothing happened.
    Skipped,
    /// Walked (possibly across several segments) and is still underway.
    Moved,
    /// Reached the final node and is now safe.
    Arrived { shelter: Option<ShelterId> },
    /// Its new position is already under water.
    Overtaken,
}

/// Result of [`MobilityEngine::reroute`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reroute {
    /// The new path continues the current one; cursor kept.
    Continued,
    /// The route was replaced and the cursor reset.
    Replaced,
}

/// Wraps a [`Router`] with the movement parameters of a session.
///
/// # Type parameter
///
/// `R` must implement [`Router`] (e.g. [`ev_spatial::DijkstraRouter`]).
pub struct MobilityEngine<R: Router> {
    pub router: R,

    /// Simulated seconds per tick.
    pub tick_seconds: f64,

    /// An evacuee on its final node within this many metres has arrived.
    pub arrival_epsilon_m: f64,
}

impl<R: Router> MobilityEngine<R> {
    pub fn new(router: R, tick_seconds: f64, arrival_epsilon_m: f64) -> Self {
        Self { router, tick_seconds, arrival_epsilon_m }
    }

    pub fn from_config(router: R, cfg: &SimConfig) -> Self {
        Self::new(router, cfg.tick_seconds, cfg.arrival_epsilon_m)
    }

    // ── Routing ───────────────────────────────────────────────────────────

    /// Shortest walkable path between the nodes nearest `from` and `to`.
    pub fn plan_route(
        &self,
        agent: AgentId,
        network: &RoadNetwork,
        from: Coordinate,
        to: Coordinate,
    ) -> MobilityResult<Vec<Coordinate>> {
        let route = self.router.route_between(network, from, to)?;
        if route.is_trivial() {
            return Err(MobilityError::RouteTooShort { agent, len: route.nodes.len() });
        }
        Ok(route.coordinates(network))
    }

    /// Start (or restart) `agent` on `route` towards `shelter`.
    ///
    /// A route of fewer than two nodes marks the evacuee stuck and returns
    /// [`MobilityError::RouteTooShort`].  On success the evacuee is
    /// evacuating, its cursor is at the start and it occupies the first
    /// segment.  Its position is not moved; the first step snaps it onto the
    /// route.
    pub fn assign_route(
        &self,
        agent: &mut Evacuee,
        route: Vec<Coordinate>,
        shelter: ShelterId,
        congestion: &mut CongestionModel,
    ) -> MobilityResult<()> {
        if agent.is_terminal() {
            return Err(MobilityError::NotEvacuating(agent.id));
        }
        release(agent, congestion);

        if route.len() < 2 {
            let len = route.len();
            agent.route.clear();
            agent.shelter = None;
            agent.transition(EvacueeState::Stuck);
            return Err(MobilityError::RouteTooShort { agent: agent.id, len });
        }

        agent.route = route;
        agent.cursor.reset();
        agent.shelter = Some(shelter);
        agent.transition(EvacueeState::Evacuating);
        occupy_current(agent, congestion);
        Ok(())
    }

    /// Switch `agent` to a freshly planned `route`.
    ///
    /// When the target is unchanged and `route` is the unwalked tail of the
    /// current route (from the current segment's start or end node), the
    /// cursor is kept so the evacuee does not step back to a node it has
    /// already left.
    pub fn reroute(
        &self,
        agent: &mut Evacuee,
        route: Vec<Coordinate>,
        shelter: ShelterId,
        congestion: &mut CongestionModel,
    ) -> MobilityResult<Reroute> {
        if !agent.is_evacuating() {
            return Err(MobilityError::NotEvacuating(agent.id));
        }
        if agent.shelter == Some(shelter) {
            let rest = agent.remaining_route();
            if rest == route.as_slice() || rest.get(1..) == Some(route.as_slice()) {
                return Ok(Reroute::Continued);
            }
        }
        self.assign_route(agent, route, shelter, congestion)?;
        Ok(Reroute::Replaced)
    }

    // ── Movement ──────────────────────────────────────────────────────────

    /// Advance one evacuating agent by one tick.
    ///
    /// The distance budget is `speed * congestion multiplier * tick_seconds`,
    /// taken as a fraction of the current segment's haversine length.  Whole
    /// segments roll over (leave, advance, `progress -= 1`, enter).
    /// Zero-length segments are hopped without spending budget.  After
    /// moving, the agent is overtaken if the water already covers its
    /// position at `now`.
    pub fn advance(
        &self,
        agent: &mut Evacuee,
        congestion: &mut CongestionModel,
        hazard: &dyn ArrivalModel,
        now: f64,
    ) -> MobilityResult<Movement> {
        if !agent.is_evacuating() {
            return Ok(Movement::Skipped);
        }
        let len = agent.route.len();
        if !agent.cursor.is_within(len) {
            return Err(MobilityError::CursorOutOfBounds {
                agent:   agent.id,
                segment: agent.cursor.segment,
                len,
            });
        }

        // Instantaneous hops over zero-length segments.
        while let Some((a, b)) = agent.current_segment() {
            if a.distance_m(b) > 0.0 {
                break;
            }
            step_to_next_segment(agent, congestion);
            agent.cursor.progress = 0.0;
        }

        if let Some((a, b)) = agent.current_segment() {
            let seg_len = a.distance_m(b);
            let budget = agent.speed_mps * congestion.speed_multiplier(a, b) * self.tick_seconds;
            agent.cursor.progress += budget / seg_len;

            while agent.cursor.progress >= 1.0 && !agent.at_final_node() {
                step_to_next_segment(agent, congestion);
                agent.cursor.progress -= 1.0;
            }
        }

        agent.pos = match agent.current_segment() {
            Some((a, b)) => a.lerp(b, agent.cursor.progress),
            None => agent.destination().unwrap_or(agent.pos),
        };

        if agent.at_final_node() {
            if let Some(dest) = agent.destination() {
                if agent.pos.distance_m(dest) <= self.arrival_epsilon_m {
                    return Ok(self.arrive(agent, congestion));
                }
            }
        }

        if hazard.is_inundated_at(agent.pos, now) {
            self.overtake(agent, congestion);
            return Ok(Movement::Overtaken);
        }
        Ok(Movement::Moved)
    }

    fn arrive(&self, agent: &mut Evacuee, congestion: &mut CongestionModel) -> Movement {
        release(agent, congestion);
        agent.transition(EvacueeState::Safe);
        agent.reached = true;
        Movement::Arrived { shelter: agent.shelter }
    }

    /// `evacuating → overtaken`.  Returns `false` for any other state.
    pub fn overtake(&self, agent: &mut Evacuee, congestion: &mut CongestionModel) -> bool {
        if !agent.is_evacuating() {
            return false;
        }
        release(agent, congestion);
        agent.reached = false;
        agent.transition(EvacueeState::Overtaken)
    }

    /// Move a non-terminal agent to `stuck`, dropping its occupancy.
    pub fn mark_stuck(&self, agent: &mut Evacuee, congestion: &mut CongestionModel) -> bool {
        release(agent, congestion);
        agent.transition(EvacueeState::Stuck)
    }
}

// ── Congestion bookkeeping ────────────────────────────────────────────────────

/// Drop whatever segment `agent` occupies.  A no-op when it occupies none.
pub fn release(agent: &mut Evacuee, congestion: &mut CongestionModel) {
    if let Some(key) = agent.occupied.take() {
        congestion.leave_key(key);
    }
}

/// Occupy the segment under the cursor, if any.
fn occupy_current(agent: &mut Evacuee, congestion: &mut CongestionModel) {
    if let Some((a, b)) = agent.current_segment() {
        let key = SegmentKey::new(a, b);
        if congestion.enter_key(key) {
            agent.occupied = Some(key);
        }
    }
}

fn step_to_next_segment(agent: &mut Evacuee, congestion: &mut CongestionModel) {
    release(agent, congestion);
    agent.cursor.segment += 1;
    occupy_current(agent, congestion);
}
