//! Integration tests for ev-sim.

use ev_agent::{BuildingSite, EvacueeState, ShelterSite};
use ev_core::{AgentId, Coordinate, HazardConfig, ShelterId, SimConfig, Tick};
use ev_hazard::{HazardModel, HazardZone};
use ev_spatial::DijkstraRouter;

use crate::{NoopObserver, Sim, SimBuilder, SimError, SimObserver, SimStats};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn c(lon: f64, lat: f64) -> Coordinate {
    Coordinate::new(lon, lat)
}

/// ~100 m of latitude.
const STEP_DEG: f64 = 0.0009;

/// Node `i` of the straight north-running test road.
fn node(i: usize) -> Coordinate {
    c(0.0, i as f64 * STEP_DEG)
}

fn road(n: usize) -> Vec<Coordinate> {
    (0..=n).map(node).collect()
}

fn building(at: Coordinate, population: u32) -> BuildingSite {
    BuildingSite::new(at, Some(population))
}

fn shelter(at: Coordinate, capacity: Option<u32>, name: &str) -> ShelterSite {
    ShelterSite::new(at, capacity, Some(name.to_string()))
}

/// `population` evacuees at node 0 of a 5-segment road, shelter at node 5.
fn corridor(population: u32) -> SimBuilder<DijkstraRouter> {
    SimBuilder::new(SimConfig::default(), DijkstraRouter)
        .roads([road(5)])
        .buildings([building(node(0), population)])
        .shelters([shelter(node(5), None, "hill")])
}

#[derive(Default)]
struct Counting {
    starts:    u64,
    ends:      u64,
    snapshots: u64,
    finished:  Option<Tick>,
    last:      Option<SimStats>,
}

impl SimObserver for Counting {
    fn on_step_start(&mut self, _tick: Tick) {
        self.starts += 1;
    }
    fn on_step_end(&mut self, _tick: Tick, stats: &SimStats) {
        self.ends += 1;
        self.last = Some(stats.clone());
    }
    fn on_snapshot(&mut self, _tick: Tick, _e: &[ev_agent::Evacuee], _s: &[ev_agent::Shelter]) {
        self.snapshots += 1;
    }
    fn on_sim_end(&mut self, final_tick: Tick, _stats: &SimStats) {
        self.finished = Some(final_tick);
    }
}

fn assert_no_terminal_occupancy(sim: &Sim) {
    for e in &sim.evacuees {
        if e.is_terminal() {
            assert!(e.occupied.is_none(), "{} still occupies a segment", e.id);
        }
    }
}

// ── SimBuilder ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;

    #[test]
    fn population_limit_caps_spawn() {
        let sim = corridor(10).population_limit(Some(5)).build().unwrap();
        let start = sim.start_info();
        assert_eq!(start.population, 5);
        assert_eq!(start.shelter_count, 1);
        assert!(sim.evacuees.iter().all(|e| e.state == EvacueeState::Evacuating));
    }

    #[test]
    fn zero_limit_spawns_everyone() {
        let zero = corridor(7).population_limit(Some(0)).build().unwrap();
        let none = corridor(7).population_limit(None).build().unwrap();
        assert_eq!(none.population(), 7);
        assert_eq!(zero.population(), 7);
        assert_eq!(zero.stats().counts.total(), 7);
    }

    #[test]
    fn evacuees_without_shelters_rejected() {
        let err = SimBuilder::new(SimConfig::default(), DijkstraRouter)
            .roads([road(2)])
            .buildings([building(node(0), 3)])
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SimError::NoShelters { evacuees: 3 }));
    }

    #[test]
    fn evacuees_without_roads_rejected() {
        let err = SimBuilder::new(SimConfig::default(), DijkstraRouter)
            .buildings([building(node(0), 1)])
            .shelters([shelter(node(1), None, "a")])
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SimError::Init(_)));
    }

    #[test]
    fn invalid_config_rejected() {
        let cfg = SimConfig { tick_seconds: 0.0, ..SimConfig::default() };
        let err = SimBuilder::new(cfg, DijkstraRouter).build().err().unwrap();
        assert!(matches!(err, SimError::Core(_)));
    }

    #[test]
    fn polygon_config_needs_loaded_zones() {
        let cfg = SimConfig {
            hazard: HazardConfig::Polygons { path: "inundation.geojson".into() },
            ..SimConfig::default()
        };
        let explicit = corridor(1).hazard(HazardModel::none());
        assert!(explicit.build().is_ok());
        let err = SimBuilder::new(cfg, DijkstraRouter).build().err().unwrap();
        assert!(matches!(err, SimError::Hazard(_)));
    }

    #[test]
    fn first_segment_occupied_at_start() {
        let sim = corridor(3).build().unwrap();
        let loads = sim.congestion_snapshot();
        assert_eq!(loads.len(), 5);
        assert_eq!(loads.iter().map(|l| l.density).sum::<u32>(), 3);
        assert!(loads.iter().all(|l| l.capacity == 8));
    }

    #[test]
    fn nearest_shelter_assigned() {
        let sim = SimBuilder::new(SimConfig::default(), DijkstraRouter)
            .roads([road(10)])
            .buildings([building(node(1), 1), building(node(9), 1)])
            .shelters([shelter(node(0), None, "south"), shelter(node(10), None, "north")])
            .build()
            .unwrap();
        assert_eq!(sim.evacuees[0].shelter, Some(ShelterId(0)));
        assert_eq!(sim.evacuees[1].shelter, Some(ShelterId(1)));
    }

    #[test]
    fn disconnected_home_is_stuck() {
        let sim = SimBuilder::new(SimConfig::default(), DijkstraRouter)
            .roads([vec![c(0.0, 0.0), c(0.0, STEP_DEG)], vec![c(1.0, 0.0), c(1.0, STEP_DEG)]])
            .buildings([building(c(0.0, 0.0), 2)])
            .shelters([shelter(c(1.0, STEP_DEG), None, "island")])
            .build()
            .unwrap();
        assert_eq!(sim.stats().counts.stuck, 2);
        assert!(sim.evacuees.iter().all(|e| e.route.is_empty()));
        assert_eq!(sim.congestion.total_density(), 0);
    }

    #[test]
    fn home_on_shelter_node_is_stuck() {
        let sim = SimBuilder::new(SimConfig::default(), DijkstraRouter)
            .roads([road(2)])
            .buildings([building(node(2), 1)])
            .shelters([shelter(node(2), None, "here")])
            .build()
            .unwrap();
        assert_eq!(sim.evacuees[0].state, EvacueeState::Stuck);
    }
}

// ── Step pipeline ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod pipeline {
    use super::*;

    #[test]
    fn corridor_evacuates_everyone() {
        let mut sim = corridor(3).build().unwrap();
        let ticks = sim.run_until_settled(2_000, &mut NoopObserver);

        // 5 × ~100.08 m at 1.4 m/s.
        assert!((355..=360).contains(&ticks), "settled after {ticks} ticks");
        let stats = sim.stats();
        assert_eq!(stats.counts.safe, 3);
        assert_eq!(stats.reached, 3);
        assert_eq!(stats.shelters[0].occupants, 3);
        assert_eq!(sim.congestion.total_density(), 0);
        assert_no_terminal_occupancy(&sim);
    }

    #[test]
    fn history_records_each_step() {
        let mut sim = corridor(1).build().unwrap();
        sim.step();
        sim.step();
        let last = sim.step();
        assert_eq!(sim.history().len(), 3);
        assert_eq!(last.tick, Tick(3));
        assert_eq!(last.time_secs, 3.0);
        assert_eq!(sim.history()[0].tick, Tick(1));
        assert_eq!(last.hazard.current_time_secs, 3.0);
    }

    #[test]
    fn observer_sees_every_step() {
        let mut sim = corridor(2).build().unwrap();
        let mut obs = Counting::default();
        sim.run_ticks(4, &mut obs);
        assert_eq!((obs.starts, obs.ends, obs.snapshots), (4, 4, 4));
        assert_eq!(obs.finished, Some(Tick(4)));
        assert_eq!(obs.last.map(|s| s.counts.evacuating), Some(2));
    }

    #[test]
    fn positions_move_towards_shelter() {
        let mut sim = corridor(1).build().unwrap();
        sim.run_ticks(10, &mut NoopObserver);
        let p = sim.agent_positions()[0];
        assert_eq!(p.id, AgentId(0));
        assert_eq!(p.state, EvacueeState::Evacuating);
        assert_eq!(p.lon, 0.0);
        // ~14 m north of home.
        assert!(p.lat > 0.0001 && p.lat < 0.00015, "lat {}", p.lat);
    }

    #[test]
    fn stuck_sessions_settle_immediately() {
        let mut sim = SimBuilder::new(SimConfig::default(), DijkstraRouter)
            .roads([vec![c(0.0, 0.0), c(0.0, STEP_DEG)], vec![c(1.0, 0.0), c(1.0, STEP_DEG)]])
            .buildings([building(c(0.0, 0.0), 1)])
            .shelters([shelter(c(1.0, STEP_DEG), None, "island")])
            .build()
            .unwrap();
        assert_eq!(sim.run_until_settled(100, &mut NoopObserver), 0);
        sim.step();
        assert_eq!(sim.evacuees[0].pos, c(0.0, 0.0));
    }

    #[test]
    fn same_seed_same_outcome() {
        let run = || {
            let mut sim = SimBuilder::new(
                SimConfig { segment_capacity: 1, ..SimConfig::default() },
                DijkstraRouter,
            )
            .roads([road(5)])
            .buildings([building(node(0), 6), building(node(1), 4)])
            .shelters([shelter(node(5), Some(5), "a"), shelter(node(0), None, "b")])
            .build()
            .unwrap();
            sim.run_ticks(150, &mut NoopObserver);
            sim.agent_positions()
        };
        assert_eq!(run(), run());
    }
}

// ── Hazard overtake ───────────────────────────────────────────────────────────

#[cfg(test)]
mod overtake {
    use super::*;

    #[test]
    fn advancing_front_overtakes_walkers() {
        // Front starts 600 m north at 10 m/s; walkers head straight into it.
        let hazard = HazardModel::propagation(vec![node(6)], 10.0).unwrap();
        let mut sim = corridor(2).hazard(hazard).build().unwrap();
        let ticks = sim.run_until_settled(2_000, &mut NoopObserver);

        assert!(ticks < 60, "settled after {ticks} ticks");
        let stats = sim.stats();
        assert_eq!(stats.counts.overtaken, 2);
        assert_eq!(stats.counts.safe, 0);
        assert_eq!(stats.shelters[0].occupants, 0);
        assert_eq!(sim.congestion.total_density(), 0);
        assert_no_terminal_occupancy(&sim);
    }

    #[test]
    fn zone_floods_at_its_arrival_time() {
        let zone = geo::Polygon::new(
            geo::LineString::from(vec![(-0.001, -0.001), (0.001, -0.001), (0.001, 0.002), (-0.001, 0.002)]),
            vec![],
        );
        let hazard = HazardModel::polygons(vec![HazardZone::new(vec![zone], Some(20.0))]).unwrap();
        let mut sim = corridor(2).hazard(hazard).build().unwrap();

        sim.run_ticks(19, &mut NoopObserver);
        assert_eq!(sim.stats().counts.evacuating, 2);
        assert!(sim.hazard_snapshot().inundated().next().is_none());

        sim.step();
        assert_eq!(sim.stats().counts.overtaken, 2);
        assert_eq!(sim.hazard_snapshot().inundated().count(), 1);
        assert_no_terminal_occupancy(&sim);
    }

    #[test]
    fn no_hazard_never_overtakes() {
        let mut sim = corridor(2).hazard(HazardModel::none()).build().unwrap();
        sim.run_until_settled(2_000, &mut NoopObserver);
        assert_eq!(sim.stats().counts.overtaken, 0);
        assert!(sim.hazard_snapshot().is_empty());
    }

    #[test]
    fn imminent_water_reroute_never_walks_backwards() {
        // The whole corridor floods long after the walk ends, but inside a
        // threshold wide enough that every tick reroutes.
        let zone = geo::Polygon::new(
            geo::LineString::from(vec![(-0.001, -0.001), (0.001, -0.001), (0.001, 0.006), (-0.001, 0.006)]),
            vec![],
        );
        let hazard = HazardModel::polygons(vec![HazardZone::new(vec![zone], Some(10_000.0))]).unwrap();
        let config = SimConfig { reroute_threshold_secs: 20_000.0, ..SimConfig::default() };
        let mut sim = SimBuilder::new(config, DijkstraRouter)
            .roads([road(5)])
            .buildings([building(node(0), 1)])
            .shelters([shelter(node(5), None, "hill")])
            .hazard(hazard)
            .build()
            .unwrap();

        let id = AgentId(0);
        sim.run_ticks(110, &mut NoopObserver);
        let before = sim.evacuee(id).unwrap().clone();
        assert_eq!(before.state, EvacueeState::Evacuating);
        assert!(before.cursor.progress > 0.0);

        // An explicit recompute mid-edge leaves the walker where it is.
        assert!(sim.recompute_route(id));
        let after = sim.evacuee(id).unwrap();
        assert_eq!(after.pos, before.pos);
        assert_eq!(after.cursor, before.cursor);

        let mut last = before.pos.lat;
        while sim.evacuee(id).unwrap().state == EvacueeState::Evacuating {
            sim.step();
            let lat = sim.evacuee(id).unwrap().pos.lat;
            assert!(lat >= last, "stepped back from {last} to {lat} at {}", sim.clock);
            last = lat;
            assert!(sim.clock.current_tick < Tick(2_000));
        }
        assert_eq!(sim.evacuee(id).unwrap().state, EvacueeState::Safe);
        assert_eq!(sim.stats().counts.overtaken, 0);
    }
}

// ── Shelter capacity and rerouting ────────────────────────────────────────────

#[cfg(test)]
mod capacity {
    use super::*;

    fn two_shelters(near_home: u32, far_home: u32) -> Sim {
        SimBuilder::new(SimConfig::default(), DijkstraRouter)
            .roads([road(10)])
            .buildings([building(node(4), near_home), building(node(0), far_home)])
            .shelters([shelter(node(5), Some(1), "small"), shelter(node(10), None, "big")])
            .build()
            .unwrap()
    }

    #[test]
    fn full_shelter_triggers_reroute() {
        let mut sim = two_shelters(1, 1);
        assert_eq!(sim.evacuees[1].shelter, Some(ShelterId(0)));

        sim.run_until_settled(3_000, &mut NoopObserver);
        let stats = sim.stats();
        assert_eq!(stats.counts.safe, 2);
        assert_eq!(sim.evacuees[1].shelter, Some(ShelterId(1)));
        assert_eq!(stats.shelters[0].occupants, 1);
        assert_eq!(stats.shelters[1].occupants, 1);
    }

    #[test]
    fn simultaneous_arrivals_counted_up_to_capacity() {
        // Three evacuees reach the one-place shelter on the same tick.  All
        // are safe; only one is counted.
        let mut sim = two_shelters(3, 0);
        sim.run_until_settled(3_000, &mut NoopObserver);
        let stats = sim.stats();
        assert_eq!(stats.counts.safe, 3);
        assert_eq!(stats.shelters[0].occupants, 1);
        assert_eq!(stats.shelters[1].occupants, 0);
        for s in &stats.shelters {
            assert!(s.occupants <= s.capacity);
        }
    }

    #[test]
    fn reroute_fails_without_accepting_shelter() {
        let mut sim = SimBuilder::new(SimConfig::default(), DijkstraRouter)
            .roads([road(5)])
            .buildings([building(node(4), 1), building(node(0), 1)])
            .shelters([shelter(node(5), Some(1), "only")])
            .build()
            .unwrap();
        sim.run_ticks(80, &mut NoopObserver);
        assert_eq!(sim.evacuees[0].state, EvacueeState::Safe);

        let before = sim.evacuees[1].route.clone();
        assert!(!sim.recompute_route(AgentId(1)));
        assert_eq!(sim.evacuees[1].route, before);

        sim.run_until_settled(1_000, &mut NoopObserver);
        assert_eq!(sim.evacuees[1].state, EvacueeState::Safe);
        assert_eq!(sim.shelters[0].occupants(), 1);
    }

    #[test]
    fn recompute_ignores_terminal_and_unknown_agents() {
        let mut sim = two_shelters(1, 0);
        assert!(!sim.recompute_route(AgentId(7)));
        sim.run_until_settled(1_000, &mut NoopObserver);
        assert!(!sim.recompute_route(AgentId(0)));
    }

    #[test]
    fn recompute_on_open_shelter_keeps_target() {
        let mut sim = two_shelters(0, 1);
        sim.run_ticks(5, &mut NoopObserver);
        assert!(sim.recompute_route(AgentId(0)));
        assert_eq!(sim.evacuees[0].shelter, Some(ShelterId(0)));
        assert_eq!(sim.evacuees[0].state, EvacueeState::Evacuating);
    }
}
