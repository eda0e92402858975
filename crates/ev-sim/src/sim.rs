//! The `Sim` session and its per-tick pipeline.

use ev_agent::{Evacuee, Shelter};
use ev_core::{AgentId, Coordinate, ShelterId, SimClock, SimConfig, SimRng, Tick};
use ev_hazard::{ArrivalModel, HazardModel, HazardSnapshot};
use ev_mobility::{CongestionModel, MobilityEngine, Movement, release};
use ev_spatial::{DijkstraRouter, RoadNetwork, Router};
use tracing::{debug, trace, warn};

use crate::{
    AgentPosition, SegmentLoad, ShelterOccupancy, SimObserver, SimStats, StartInfo, StateCounts,
};

/// One evacuation session.
///
/// Each [`step`](Sim::step) runs the same pipeline:
///
/// 1. **Clock**: advance one tick and move the hazard to the new time.
/// 2. **Movement**: every evacuating evacuee advances once, in an order
///    shuffled by the session RNG.  Arrivals are counted into their shelter.
///    A faulting evacuee is logged and marked stuck.
/// 3. **Hazard pass**: for each evacuee still evacuating, in index order:
///    water already at its position overtakes it; otherwise water due within
///    `reroute_threshold_secs` triggers a reroute; otherwise a full assigned
///    shelter triggers a reroute.
/// 4. **Stats**: counts are appended to [`history`](Sim::history).
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<R: Router = DijkstraRouter> {
    pub config: SimConfig,

    pub clock: SimClock,

    pub network: RoadNetwork,

    /// Per-segment density, shared by every evacuee.
    pub congestion: CongestionModel,

    pub hazard: HazardModel,

    pub mobility: MobilityEngine<R>,

    /// Indexed by `AgentId`.
    pub evacuees: Vec<Evacuee>,

    /// Indexed by `ShelterId`.
    pub shelters: Vec<Shelter>,

    /// Drives the activation-order shuffle only.
    pub rng: SimRng,

    /// Stats after each completed step.
    pub history: Vec<SimStats>,
}

impl<R: Router> Sim<R> {
    // ── Running ───────────────────────────────────────────────────────────

    /// Advance one tick.  Returns the stats recorded for it.
    pub fn step(&mut self) -> SimStats {
        self.clock.advance();
        let now = self.clock.elapsed_secs();
        self.hazard.update(now);

        self.move_evacuees(now);
        self.hazard_pass(now);

        let stats = self.stats();
        self.history.push(stats.clone());
        stats
    }

    /// [`step`](Sim::step) wrapped in observer callbacks.
    pub fn step_observed<O: SimObserver>(&mut self, observer: &mut O) -> SimStats {
        observer.on_step_start(self.clock.current_tick + 1);
        let stats = self.step();
        let tick = self.clock.current_tick;
        observer.on_step_end(tick, &stats);
        observer.on_snapshot(tick, &self.evacuees, &self.shelters);
        stats
    }

    /// Run exactly `n` steps.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.step_observed(observer);
        }
        observer.on_sim_end(self.clock.current_tick, &self.stats());
    }

    /// Step until nobody is evacuating or `max_ticks` steps have run.
    /// Returns the number of steps taken.
    pub fn run_until_settled<O: SimObserver>(&mut self, max_ticks: u64, observer: &mut O) -> u64 {
        let mut ran = 0;
        while ran < max_ticks && self.evacuees.iter().any(Evacuee::is_evacuating) {
            self.step_observed(observer);
            ran += 1;
        }
        observer.on_sim_end(self.clock.current_tick, &self.stats());
        ran
    }

    // ── Pipeline phases ───────────────────────────────────────────────────

    fn move_evacuees(&mut self, now: f64) {
        let mut order: Vec<usize> = self
            .evacuees
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_evacuating())
            .map(|(i, _)| i)
            .collect();
        self.rng.shuffle(&mut order);

        for i in order {
            let agent = &mut self.evacuees[i];
            match self.mobility.advance(agent, &mut self.congestion, &self.hazard, now) {
                Ok(Movement::Arrived { shelter: Some(sid) }) => {
                    let counted = self
                        .shelters
                        .get_mut(sid.index())
                        .is_some_and(Shelter::add_occupant);
                    if counted {
                        trace!(agent = %agent.id, shelter = %sid, "arrived");
                    } else {
                        debug!(agent = %agent.id, shelter = %sid, "arrived at a full shelter");
                    }
                }
                Ok(Movement::Overtaken) => debug!(agent = %agent.id, "overtaken while moving"),
                Ok(_) => {}
                Err(e) => {
                    warn!(agent = %agent.id, error = %e, "movement failed; marking stuck");
                    self.mobility.mark_stuck(agent, &mut self.congestion);
                }
            }
        }
    }

    fn hazard_pass(&mut self, now: f64) {
        let threshold = self.config.reroute_threshold_secs;
        for i in 0..self.evacuees.len() {
            if self.evacuees[i].is_evacuating() {
                let pos = self.evacuees[i].pos;
                match self.hazard.time_to_inundation(pos) {
                    Some(arrival) if arrival <= now => {
                        let agent = &mut self.evacuees[i];
                        self.mobility.overtake(agent, &mut self.congestion);
                        debug!(agent = %agent.id, "overtaken in place");
                    }
                    Some(arrival) if arrival - now <= threshold => {
                        self.recompute_route(AgentId::from_index(i));
                    }
                    _ => {
                        let full = self.evacuees[i]
                            .shelter
                            .and_then(|s| self.shelters.get(s.index()))
                            .is_some_and(|s| !s.can_accept());
                        if full {
                            self.recompute_route(AgentId::from_index(i));
                        }
                    }
                }
            }
            let agent = &mut self.evacuees[i];
            if agent.is_terminal() && agent.occupied.is_some() {
                release(agent, &mut self.congestion);
            }
        }
    }

    // ── Rerouting ─────────────────────────────────────────────────────────

    /// Plan a fresh route for an evacuating evacuee from where it stands.
    ///
    /// Keeps the assigned shelter while it can accept; otherwise switches to
    /// the accepting shelter nearest the evacuee.  Returns `false`, leaving
    /// the evacuee untouched, when no shelter accepts or no path exists.
    pub fn recompute_route(&mut self, id: AgentId) -> bool {
        let Some(agent) = self.evacuees.get(id.index()) else {
            return false;
        };
        if !agent.is_evacuating() {
            return false;
        }
        let pos = agent.pos;

        let keep = agent
            .shelter
            .filter(|s| self.shelters.get(s.index()).is_some_and(Shelter::can_accept));
        let Some(target) = keep.or_else(|| self.nearest_shelter(pos, true)) else {
            debug!(agent = %id, "no shelter can accept; keeping current route");
            return false;
        };
        let dest = self.shelters[target.index()].location;

        let route = match self.mobility.plan_route(id, &self.network, pos, dest) {
            Ok(r) => r,
            Err(e) => {
                debug!(agent = %id, shelter = %target, error = %e, "reroute failed");
                return false;
            }
        };
        match self.mobility.reroute(&mut self.evacuees[id.index()], route, target, &mut self.congestion) {
            Ok(outcome) => {
                debug!(agent = %id, shelter = %target, ?outcome, "rerouted");
                true
            }
            Err(e) => {
                debug!(agent = %id, error = %e, "reroute rejected");
                false
            }
        }
    }

    /// Nearest shelter to `pos` by planar distance; first wins ties.
    fn nearest_shelter(&self, pos: Coordinate, accepting_only: bool) -> Option<ShelterId> {
        self.shelters
            .iter()
            .filter(|s| !accepting_only || s.can_accept())
            .min_by(|a, b| {
                pos.planar_distance_sq(a.location)
                    .total_cmp(&pos.planar_distance_sq(b.location))
            })
            .map(|s| s.id)
    }

    /// Route every idle evacuee from home to its nearest shelter.
    /// Evacuees with no route become stuck.
    pub(crate) fn assign_initial_routes(&mut self) {
        for i in 0..self.evacuees.len() {
            let id = AgentId::from_index(i);
            let home = self.evacuees[i].home;
            let Some(target) = self.nearest_shelter(home, false) else {
                self.mobility.mark_stuck(&mut self.evacuees[i], &mut self.congestion);
                continue;
            };
            let dest = self.shelters[target.index()].location;
            let assigned = self
                .mobility
                .plan_route(id, &self.network, home, dest)
                .and_then(|route| {
                    self.mobility.assign_route(
                        &mut self.evacuees[i],
                        route,
                        target,
                        &mut self.congestion,
                    )
                });
            if let Err(e) = assigned {
                debug!(agent = %id, shelter = %target, error = %e, "no route; evacuee stuck");
                self.mobility.mark_stuck(&mut self.evacuees[i], &mut self.congestion);
            }
        }
    }

    // ── Views ─────────────────────────────────────────────────────────────

    pub fn start_info(&self) -> StartInfo {
        StartInfo { population: self.population(), shelter_count: self.shelter_count() }
    }

    pub fn population(&self) -> usize {
        self.evacuees.len()
    }

    pub fn shelter_count(&self) -> usize {
        self.shelters.len()
    }

    pub fn evacuee(&self, id: AgentId) -> Option<&Evacuee> {
        self.evacuees.get(id.index())
    }

    pub fn time_secs(&self) -> f64 {
        self.clock.elapsed_secs()
    }

    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }

    /// Stats for the current tick.  Does not touch `history`.
    pub fn stats(&self) -> SimStats {
        SimStats {
            tick:       self.clock.current_tick,
            time_secs:  self.clock.elapsed_secs(),
            population: self.evacuees.len(),
            counts:     StateCounts::tally(&self.evacuees),
            reached:    self.evacuees.iter().filter(|e| e.reached).count(),
            hazard:     self.hazard.summary(),
            shelters:   self.shelters.iter().map(ShelterOccupancy::from).collect(),
        }
    }

    pub fn history(&self) -> &[SimStats] {
        &self.history
    }

    pub fn agent_positions(&self) -> Vec<AgentPosition> {
        self.evacuees.iter().map(AgentPosition::from).collect()
    }

    pub fn hazard_snapshot(&self) -> HazardSnapshot {
        self.hazard.snapshot()
    }

    /// Every registered segment with its load, in no particular order.
    pub fn congestion_snapshot(&self) -> Vec<SegmentLoad> {
        self.congestion
            .segments()
            .map(|(_, e)| SegmentLoad {
                a:         e.a,
                b:         e.b,
                capacity:  e.capacity,
                density:   e.density,
                intensity: e.intensity(),
            })
            .collect()
    }
}
