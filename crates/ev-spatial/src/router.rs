//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! `ev-mobility` calls routing via the [`Router`] trait, so an A* or
//! hazard-aware router can be swapped in without touching the movement code.
//!
//! # Cost units
//!
//! Costs are planar degree-space lengths (`RoadNetwork::edge_weight`).

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use ev_core::{Coordinate, EdgeId, NodeId};

use crate::network::RoadNetwork;
use crate::{SpatialError, SpatialResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// A path through the graph as an ordered node sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Nodes from source to destination, inclusive.  A single node when the
    /// source and destination coincide.
    pub nodes: Vec<NodeId>,
    /// Sum of planar edge weights.
    pub total_weight: f64,
}

impl Route {
    /// `true` if the route has no segment to walk.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() < 2
    }

    pub fn coordinates(&self, network: &RoadNetwork) -> Vec<Coordinate> {
        self.nodes.iter().map(|&n| network.node_position(n)).collect()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
pub trait Router: Send + Sync {
    /// Compute a route between two graph nodes.
    ///
    /// `from == to` yields a single-node route rather than an error.
    fn route(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> SpatialResult<Route>;

    /// Snap both points to their nearest nodes, then route between them.
    fn route_between(
        &self,
        network: &RoadNetwork,
        start: Coordinate,
        end: Coordinate,
    ) -> SpatialResult<Route> {
        let from = network.nearest_node(start).ok_or(SpatialError::EmptyNetwork)?;
        let to = network.nearest_node(end).ok_or(SpatialError::EmptyNetwork)?;
        self.route(network, from, to)
    }
}

/// Node sequence of the shortest path between the nodes nearest `start` and
/// `end`.  Empty if the network is empty or no path exists.
///
/// The endpoints are graph nodes, not `start`/`end` themselves.
pub fn shortest_path<R: Router + ?Sized>(
    network: &RoadNetwork,
    router: &R,
    start: Coordinate,
    end: Coordinate,
) -> Vec<Coordinate> {
    router
        .route_between(network, start, end)
        .map(|r| r.coordinates(network))
        .unwrap_or_default()
}

impl RoadNetwork {
    /// [`shortest_path`] with the default [`DijkstraRouter`].
    pub fn shortest_path(&self, start: Coordinate, end: Coordinate) -> Vec<Coordinate> {
        shortest_path(self, &DijkstraRouter, start, end)
    }
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the CSR road graph, minimising planar
/// edge weight.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> SpatialResult<Route> {
        dijkstra(network, from, to)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Totally ordered `f64` cost for the heap.
#[derive(Copy, Clone, Debug)]
struct Cost(f64);

impl PartialEq for Cost {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

fn dijkstra(network: &RoadNetwork, from: NodeId, to: NodeId) -> SpatialResult<Route> {
    let n = network.node_count();
    if from.index() >= n || to.index() >= n {
        return Err(SpatialError::NoRoute { from, to });
    }
    if from == to {
        return Ok(Route { nodes: vec![from], total_weight: 0.0 });
    }

    let mut dist      = vec![f64::INFINITY; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0.0;

    // Secondary key NodeId keeps tie-breaking deterministic.
    let mut heap: BinaryHeap<Reverse<(Cost, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((Cost(0.0), from)));

    while let Some(Reverse((Cost(cost), node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(network, &prev_edge, from, to, cost));
        }

        // Stale heap entry.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in network.out_edges(node) {
            let neighbor = network.edge_to[edge.index()];
            let new_cost = cost + network.edge_weight[edge.index()];

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((Cost(new_cost), neighbor)));
            }
        }
    }

    Err(SpatialError::NoRoute { from, to })
}

fn reconstruct(
    network: &RoadNetwork,
    prev_edge: &[EdgeId],
    from: NodeId,
    to: NodeId,
    total_weight: f64,
) -> Route {
    let mut nodes = vec![to];
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        cur = network.edge_from[e.index()];
        nodes.push(cur);
    }
    nodes.reverse();
    Route { nodes, total_weight }
}
