//! Unit tests for ev-mobility.

use ev_agent::{Evacuee, EvacueeState};
use ev_core::{AgentId, Coordinate, ShelterId};
use ev_hazard::HazardModel;
use ev_spatial::{DijkstraRouter, RoadNetwork, RoadNetworkBuilder};

use crate::{CongestionModel, MobilityEngine};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn c(lon: f64, lat: f64) -> Coordinate {
    Coordinate::new(lon, lat)
}

/// ~100 m of latitude.
const STEP_DEG: f64 = 0.0009;

/// Straight north-running road of `n` equal ~100 m segments.
fn straight_road(n: usize) -> Vec<Coordinate> {
    (0..=n).map(|i| c(0.0, i as f64 * STEP_DEG)).collect()
}

fn network_of(line: &[Coordinate]) -> RoadNetwork {
    let mut b = RoadNetworkBuilder::new();
    b.add_line(line);
    b.build()
}

fn congestion_for(network: &RoadNetwork, capacity: u32) -> CongestionModel {
    let mut cm = CongestionModel::new(capacity, 0.8);
    cm.register_network(network);
    cm
}

fn engine() -> MobilityEngine<DijkstraRouter> {
    MobilityEngine::new(DijkstraRouter, 1.0, 1.0)
}

fn evacuee(id: u32, home: Coordinate) -> Evacuee {
    Evacuee::new(AgentId(id), home, 1.4)
}

// ── CongestionModel ───────────────────────────────────────────────────────────

#[cfg(test)]
mod congestion {
    use super::*;

    #[test]
    fn register_is_idempotent_and_unordered() {
        let mut cm = CongestionModel::default();
        assert!(cm.register(c(0.0, 0.0), c(0.0, 1.0)));
        assert!(!cm.register(c(0.0, 1.0), c(0.0, 0.0)));
        assert!(!cm.register_with_capacity(c(0.0, 0.0), c(0.0, 1.0), 99));
        assert_eq!(cm.len(), 1);
        assert_eq!(cm.capacity(c(0.0, 1.0), c(0.0, 0.0)), Some(8));
    }

    #[test]
    fn enter_leave_both_directions() {
        let mut cm = CongestionModel::default();
        cm.register(c(0.0, 0.0), c(0.0, 1.0));
        cm.enter(c(0.0, 0.0), c(0.0, 1.0));
        cm.enter(c(0.0, 1.0), c(0.0, 0.0));
        assert_eq!(cm.density(c(0.0, 0.0), c(0.0, 1.0)), Some(2));
        cm.leave(c(0.0, 1.0), c(0.0, 0.0));
        assert_eq!(cm.density(c(0.0, 0.0), c(0.0, 1.0)), Some(1));
    }

    #[test]
    fn leave_clamps_at_zero() {
        let mut cm = CongestionModel::default();
        cm.register(c(0.0, 0.0), c(0.0, 1.0));
        cm.leave(c(0.0, 0.0), c(0.0, 1.0));
        cm.leave(c(0.0, 0.0), c(0.0, 1.0));
        assert_eq!(cm.density(c(0.0, 0.0), c(0.0, 1.0)), Some(0));
    }

    #[test]
    fn unregistered_segment_is_a_silent_no_op() {
        let mut cm = CongestionModel::default();
        assert!(!cm.enter(c(5.0, 5.0), c(6.0, 6.0)));
        assert!(!cm.leave(c(5.0, 5.0), c(6.0, 6.0)));
        assert_eq!(cm.density(c(5.0, 5.0), c(6.0, 6.0)), None);
        assert_eq!(cm.speed_multiplier(c(5.0, 5.0), c(6.0, 6.0)), 1.0);
        assert!(cm.is_empty());
    }

    #[test]
    fn register_network_covers_every_segment() {
        let net = network_of(&straight_road(4));
        let cm = congestion_for(&net, 8);
        assert_eq!(cm.len(), 4);
        for (a, b) in net.segment_coords() {
            assert_eq!(cm.density(a, b), Some(0));
        }
    }

    #[test]
    fn two_evacuees_on_a_capacity_one_segment() {
        let road = straight_road(1);
        let net = network_of(&road);
        let mut cm = congestion_for(&net, 1);
        let eng = engine();

        let mut e0 = evacuee(0, road[0]);
        let mut e1 = evacuee(1, road[0]);
        eng.assign_route(&mut e0, road.clone(), ShelterId(0), &mut cm).unwrap();
        eng.assign_route(&mut e1, road.clone(), ShelterId(0), &mut cm).unwrap();

        assert_eq!(cm.density(road[0], road[1]), Some(2));
        let m = cm.speed_multiplier(road[0], road[1]);
        assert!((m - 0.5556).abs() < 1e-4, "got {m}");
    }

    #[test]
    fn intensity_saturates_at_one() {
        let mut cm = CongestionModel::new(2, 0.8);
        cm.register(c(0.0, 0.0), c(0.0, 1.0));
        cm.enter(c(0.0, 0.0), c(0.0, 1.0));
        assert_eq!(cm.entry(c(0.0, 0.0), c(0.0, 1.0)).unwrap().intensity(), 0.5);
        for _ in 0..3 {
            cm.enter(c(0.0, 0.0), c(0.0, 1.0));
        }
        assert_eq!(cm.entry(c(0.0, 0.0), c(0.0, 1.0)).unwrap().intensity(), 1.0);
        assert_eq!(cm.total_density(), 4);
    }
}

// ── Congestion properties ─────────────────────────────────────────────────────

#[cfg(test)]
mod congestion_props {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Density tracks enters minus leaves, floored at zero at every step.
        #[test]
        fn density_never_negative(ops in proptest::collection::vec(any::<bool>(), 0..200)) {
            let (a, b) = (c(0.0, 0.0), c(0.0, 1.0));
            let mut cm = CongestionModel::default();
            cm.register(a, b);
            let mut expected: u32 = 0;
            for enter in ops {
                if enter {
                    cm.enter(a, b);
                    expected += 1;
                } else {
                    cm.leave(a, b);
                    expected = expected.saturating_sub(1);
                }
                prop_assert_eq!(cm.density(a, b), Some(expected));
            }
        }

        /// 1.0 up to capacity, then strictly decreasing and still positive.
        #[test]
        fn multiplier_shape(capacity in 1u32..20, strength in 0.01f64..5.0, extra in 1u32..40) {
            let (a, b) = (c(0.0, 0.0), c(0.0, 1.0));
            let mut cm = CongestionModel::new(capacity, strength);
            cm.register(a, b);

            let mut prev = cm.speed_multiplier(a, b);
            prop_assert_eq!(prev, 1.0);
            for d in 1..=capacity + extra {
                cm.enter(a, b);
                let m = cm.speed_multiplier(a, b);
                prop_assert!(m > 0.0 && m <= 1.0);
                if d <= capacity {
                    prop_assert_eq!(m, 1.0);
                } else {
                    prop_assert!(m < prev);
                }
                prev = m;
            }
        }
    }
}

// ── Route assignment ──────────────────────────────────────────────────────────

#[cfg(test)]
mod assignment {
    use super::*;
    use crate::MobilityError;

    #[test]
    fn assign_starts_evacuating_on_first_segment() {
        let road = straight_road(2);
        let net = network_of(&road);
        let mut cm = congestion_for(&net, 8);
        let mut e = evacuee(0, road[0]);

        engine().assign_route(&mut e, road.clone(), ShelterId(3), &mut cm).unwrap();
        assert_eq!(e.state, EvacueeState::Evacuating);
        assert_eq!(e.shelter, Some(ShelterId(3)));
        assert_eq!(cm.density(road[0], road[1]), Some(1));
        assert_eq!(cm.density(road[1], road[2]), Some(0));
        assert!(e.occupied.is_some());
    }

    #[test]
    fn short_route_marks_stuck() {
        let mut cm = CongestionModel::default();
        let mut e = evacuee(0, c(0.0, 0.0));
        let err = engine()
            .assign_route(&mut e, vec![c(0.0, 0.0)], ShelterId(0), &mut cm)
            .unwrap_err();
        assert!(matches!(err, MobilityError::RouteTooShort { len: 1, .. }));
        assert_eq!(e.state, EvacueeState::Stuck);
        assert!(e.shelter.is_none());
    }

    #[test]
    fn plan_route_rejects_single_node_paths() {
        let road = straight_road(1);
        let net = network_of(&road);
        let eng = engine();
        // Both points snap to the same node.
        let err = eng.plan_route(AgentId(0), &net, c(0.0, -1.0), c(0.0, -2.0)).unwrap_err();
        assert!(matches!(err, MobilityError::RouteTooShort { len: 1, .. }));
        assert_eq!(eng.plan_route(AgentId(0), &net, c(0.0, -1.0), c(0.0, 2.0)).unwrap(), road);
    }

    #[test]
    fn plan_route_on_empty_network_is_a_routing_error() {
        let net = RoadNetwork::empty();
        let err = engine().plan_route(AgentId(0), &net, c(0.0, 0.0), c(1.0, 1.0)).unwrap_err();
        assert!(matches!(err, MobilityError::Routing(_)));
    }

    #[test]
    fn reassignment_moves_occupancy() {
        let road = straight_road(3);
        let net = network_of(&road);
        let mut cm = congestion_for(&net, 8);
        let eng = engine();
        let mut e = evacuee(0, road[0]);

        eng.assign_route(&mut e, road.clone(), ShelterId(0), &mut cm).unwrap();
        eng.assign_route(&mut e, road[2..].to_vec(), ShelterId(1), &mut cm).unwrap();
        assert_eq!(cm.density(road[0], road[1]), Some(0));
        assert_eq!(cm.density(road[2], road[3]), Some(1));
        assert_eq!(cm.total_density(), 1);
    }
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod movement {
    use super::*;
    use crate::{MobilityError, Movement};

    #[test]
    fn walks_speed_times_tick() {
        let road = straight_road(1);
        let net = network_of(&road);
        let mut cm = congestion_for(&net, 8);
        let hazard = HazardModel::none();
        let eng = engine();
        let mut e = evacuee(0, road[0]);
        eng.assign_route(&mut e, road.clone(), ShelterId(0), &mut cm).unwrap();

        let m = eng.advance(&mut e, &mut cm, &hazard, 1.0).unwrap();
        assert_eq!(m, Movement::Moved);
        let walked = road[0].distance_m(e.pos);
        assert!((walked - 1.4).abs() < 1e-6, "got {walked}");
    }

    #[test]
    fn arrival_tick_count_matches_route_length() {
        let road = straight_road(3);
        let net = network_of(&road);
        let mut cm = congestion_for(&net, 8);
        let hazard = HazardModel::none();
        let eng = engine();
        let mut e = evacuee(0, road[0]);
        eng.assign_route(&mut e, road.clone(), ShelterId(0), &mut cm).unwrap();

        let total: f64 = road.windows(2).map(|w| w[0].distance_m(w[1])).sum();
        let expected = (total / 1.4).ceil() as i64;

        let mut ticks = 0i64;
        loop {
            ticks += 1;
            let m = eng.advance(&mut e, &mut cm, &hazard, ticks as f64).unwrap();
            if let Movement::Arrived { shelter } = m {
                assert_eq!(shelter, Some(ShelterId(0)));
                break;
            }
            assert!(ticks < 10_000, "never arrived");
        }
        assert!((ticks - expected).abs() <= 1, "arrived after {ticks}, expected {expected}");
        assert_eq!(e.state, EvacueeState::Safe);
        assert!(e.reached);
        assert_eq!(e.pos, road[3]);
        assert_eq!(cm.total_density(), 0);
    }

    #[test]
    fn occupancy_follows_the_walker() {
        let road = straight_road(2);
        let net = network_of(&road);
        let mut cm = congestion_for(&net, 8);
        let hazard = HazardModel::none();
        let eng = MobilityEngine::new(DijkstraRouter, 80.0, 1.0); // 112 m per tick
        let mut e = evacuee(0, road[0]);
        eng.assign_route(&mut e, road.clone(), ShelterId(0), &mut cm).unwrap();

        eng.advance(&mut e, &mut cm, &hazard, 80.0).unwrap();
        assert_eq!(e.cursor.segment, 1);
        assert_eq!(cm.density(road[0], road[1]), Some(0));
        assert_eq!(cm.density(road[1], road[2]), Some(1));
        // Position lies on the second segment.
        assert!(e.pos.lat > road[1].lat && e.pos.lat < road[2].lat);
    }

    #[test]
    fn congestion_slows_movement() {
        let road = straight_road(1);
        let net = network_of(&road);
        let mut cm = congestion_for(&net, 1);
        let hazard = HazardModel::none();
        let eng = engine();
        let mut e0 = evacuee(0, road[0]);
        let mut e1 = evacuee(1, road[0]);
        eng.assign_route(&mut e0, road.clone(), ShelterId(0), &mut cm).unwrap();
        eng.assign_route(&mut e1, road.clone(), ShelterId(0), &mut cm).unwrap();

        eng.advance(&mut e0, &mut cm, &hazard, 1.0).unwrap();
        let walked = road[0].distance_m(e0.pos);
        assert!((walked - 1.4 / 1.8).abs() < 1e-6, "got {walked}");
    }

    #[test]
    fn zero_length_segment_is_hopped() {
        let a = c(0.0, 0.0);
        let b = c(0.0, STEP_DEG);
        let mut cm = CongestionModel::default();
        cm.register(a, b);
        let hazard = HazardModel::none();
        let eng = engine();
        let mut e = evacuee(0, a);
        eng.assign_route(&mut e, vec![a, a, b], ShelterId(0), &mut cm).unwrap();

        eng.advance(&mut e, &mut cm, &hazard, 1.0).unwrap();
        assert_eq!(e.cursor.segment, 1);
        assert_eq!(cm.density(a, b), Some(1));
        // The full budget was still spent on the real segment.
        assert!((a.distance_m(e.pos) - 1.4).abs() < 1e-6);
    }

    #[test]
    fn overtaken_when_position_is_flooded() {
        let road = straight_road(2);
        let net = network_of(&road);
        let mut cm = congestion_for(&net, 8);
        // Source at the destination: the front reaches mid-route quickly.
        let hazard = HazardModel::propagation(vec![road[2]], 1_000.0).unwrap();
        let eng = engine();
        let mut e = evacuee(0, road[0]);
        eng.assign_route(&mut e, road.clone(), ShelterId(0), &mut cm).unwrap();

        let m = eng.advance(&mut e, &mut cm, &hazard, 10.0).unwrap();
        assert_eq!(m, Movement::Overtaken);
        assert_eq!(e.state, EvacueeState::Overtaken);
        assert!(!e.reached);
        assert!(e.occupied.is_none());
        assert_eq!(cm.total_density(), 0);
    }

    #[test]
    fn terminal_states_do_not_move() {
        let road = straight_road(1);
        let net = network_of(&road);
        let mut cm = congestion_for(&net, 8);
        let hazard = HazardModel::none();
        let eng = engine();
        let mut e = evacuee(0, road[0]);
        eng.assign_route(&mut e, road.clone(), ShelterId(0), &mut cm).unwrap();
        assert!(eng.overtake(&mut e, &mut cm));

        let pos = e.pos;
        assert_eq!(eng.advance(&mut e, &mut cm, &hazard, 1.0).unwrap(), Movement::Skipped);
        assert_eq!(e.pos, pos);
        assert!(!eng.overtake(&mut e, &mut cm));
        assert!(eng.assign_route(&mut e, road.clone(), ShelterId(0), &mut cm).is_err());
        assert!(!eng.mark_stuck(&mut e, &mut cm));
        assert_eq!(e.state, EvacueeState::Overtaken);
        assert_eq!(cm.total_density(), 0);
    }

    #[test]
    fn corrupt_cursor_is_reported() {
        let road = straight_road(1);
        let mut cm = CongestionModel::default();
        let hazard = HazardModel::none();
        let eng = engine();
        let mut e = evacuee(0, road[0]);
        eng.assign_route(&mut e, road, ShelterId(0), &mut cm).unwrap();
        e.cursor.segment = 7;
        assert!(matches!(
            eng.advance(&mut e, &mut cm, &hazard, 1.0),
            Err(MobilityError::CursorOutOfBounds { segment: 7, len: 2, .. })
        ));
    }
}

// ── Rerouting ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod reroute {
    use super::*;
    use crate::Reroute;

    #[test]
    fn continuing_path_keeps_cursor() {
        let road = straight_road(3);
        let net = network_of(&road);
        let mut cm = congestion_for(&net, 8);
        let eng = engine();
        let mut e = evacuee(0, road[0]);
        eng.assign_route(&mut e, road.clone(), ShelterId(0), &mut cm).unwrap();
        e.cursor.segment = 1;
        e.cursor.progress = 0.4;

        for tail in [road[1..].to_vec(), road[2..].to_vec()] {
            let r = eng.reroute(&mut e, tail, ShelterId(0), &mut cm).unwrap();
            assert_eq!(r, Reroute::Continued);
            assert_eq!(e.cursor.segment, 1);
            assert_eq!(e.cursor.progress, 0.4);
        }
    }

    #[test]
    fn different_path_or_shelter_replaces_route() {
        let road = straight_road(3);
        let net = network_of(&road);
        let mut cm = congestion_for(&net, 8);
        let eng = engine();
        let mut e = evacuee(0, road[0]);
        eng.assign_route(&mut e, road.clone(), ShelterId(0), &mut cm).unwrap();
        e.cursor.segment = 1;

        let r = eng.reroute(&mut e, road[2..].to_vec(), ShelterId(1), &mut cm).unwrap();
        assert_eq!(r, Reroute::Replaced);
        assert_eq!(e.cursor.segment, 0);
        assert_eq!(e.shelter, Some(ShelterId(1)));
        assert_eq!(e.route, road[2..].to_vec());
    }

    #[test]
    fn reroute_requires_evacuating() {
        let mut cm = CongestionModel::default();
        let mut e = evacuee(0, c(0.0, 0.0));
        assert!(engine().reroute(&mut e, straight_road(1), ShelterId(0), &mut cm).is_err());
        assert_eq!(e.state, EvacueeState::Idle);
    }
}
