//! Road network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Every road segment is undirected and is stored as two directed edges.
//! All edge arrays are sorted by source node and indexed by `EdgeId`.
//!
//! # Node identity
//!
//! Nodes are keyed by [`NodeKey`], the coordinate quantised to 1e-7 degrees.
//! Two input coordinates that quantise to the same key are the same node;
//! the first one seen becomes the node's stored position.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lon, lat)` to the nearest `NodeId`.  Used
//! to snap homes, shelters and mid-segment agent positions to road nodes.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::{FxHashMap, FxHashSet};

use ev_core::{Coordinate, EdgeId, NodeId};

// ── NodeKey ───────────────────────────────────────────────────────────────────

/// Quantisation step for node identity, in degrees (≈1 cm at the equator).
pub const NODE_KEY_PRECISION_DEG: f64 = 1e-7;

/// Fixed-precision coordinate key used for node identity and for keying
/// congestion segments.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeKey {
    pub lon: i64,
    pub lat: i64,
}

impl NodeKey {
    pub fn of(c: Coordinate) -> Self {
        Self {
            lon: (c.lon / NODE_KEY_PRECISION_DEG).round() as i64,
            lat: (c.lat / NODE_KEY_PRECISION_DEG).round() as i64,
        }
    }
}

impl From<Coordinate> for NodeKey {
    fn from(c: Coordinate) -> Self {
        NodeKey::of(c)
    }
}

/// Unordered pair of [`NodeKey`]s identifying an undirected road segment.
///
/// `SegmentKey::new(a, b) == SegmentKey::new(b, a)`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentKey {
    pub lo: NodeKey,
    pub hi: NodeKey,
}

impl SegmentKey {
    pub fn new(a: Coordinate, b: Coordinate) -> Self {
        Self::from_keys(NodeKey::of(a), NodeKey::of(b))
    }

    pub fn from_keys(a: NodeKey, b: NodeKey) -> Self {
        if a <= b { Self { lo: a, hi: b } } else { Self { lo: b, hi: a } }
    }

    /// Both endpoints quantise to the same node.
    pub fn is_degenerate(self) -> bool {
        self.lo == self.hi
    }
}

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2], // [lon, lat]
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared planar distance in degree space.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlon = self.point[0] - point[0];
        let dlat = self.point[1] - point[1];
        dlon * dlon + dlat * dlat
    }
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Undirected road graph in CSR format plus a spatial index for snapping.
///
/// Read-only after [`RoadNetworkBuilder::build`].  Congestion state lives
/// outside the graph, in `ev-mobility`.
pub struct RoadNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<Coordinate>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId) ─────────────────────────────────────
    pub edge_from: Vec<NodeId>,
    pub edge_to: Vec<NodeId>,

    /// Planar degree-space length.  Used as Dijkstra cost.
    pub edge_weight: Vec<f64>,

    // ── Lookup ────────────────────────────────────────────────────────────
    key_index: FxHashMap<NodeKey, NodeId>,
    spatial_idx: RTree<NodeEntry>,
}

impl RoadNetwork {
    /// A network with no nodes.  Every routing request against it fails.
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    /// Directed edge count (twice the segment count).
    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    /// Undirected road segment count.
    pub fn segment_count(&self) -> usize {
        self.edge_to.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(EdgeId::from_index)
    }

    #[inline]
    pub fn node_position(&self, node: NodeId) -> Coordinate {
        self.node_pos[node.index()]
    }

    /// Every undirected segment exactly once, as `(lower id, higher id)`.
    pub fn segments(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.edge_from
            .iter()
            .zip(&self.edge_to)
            .filter(|(a, b)| a < b)
            .map(|(&a, &b)| (a, b))
    }

    /// Every undirected segment as a coordinate pair.
    pub fn segment_coords(&self) -> impl Iterator<Item = (Coordinate, Coordinate)> + '_ {
        self.segments()
            .map(|(a, b)| (self.node_position(a), self.node_position(b)))
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The node whose key equals `pos`'s key, if any.
    pub fn node_at(&self, pos: Coordinate) -> Option<NodeId> {
        self.key_index.get(&NodeKey::of(pos)).copied()
    }

    /// The node nearest to `pos` by planar distance.
    ///
    /// Returns `None` only if the network has no nodes.  Tie order between
    /// equidistant nodes is unspecified.
    pub fn nearest_node(&self, pos: Coordinate) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lon, pos.lat])
            .map(|e| e.id)
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// Nodes are deduplicated by [`NodeKey`] and segments by their unordered
/// endpoint pair; self-loops are dropped.
///
/// # Example
///
/// ```
/// use ev_core::Coordinate;
/// use ev_spatial::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// b.add_line(&[
///     Coordinate::new(122.690, 14.290),
///     Coordinate::new(122.691, 14.290),
///     Coordinate::new(122.691, 14.291),
/// ]);
/// let net = b.build();
/// assert_eq!(net.node_count(), 3);
/// assert_eq!(net.segment_count(), 2);
/// ```
pub struct RoadNetworkBuilder {
    nodes:     Vec<Coordinate>,
    key_index: FxHashMap<NodeKey, NodeId>,
    segments:  Vec<(NodeId, NodeId)>,
    seen:      FxHashSet<(NodeId, NodeId)>,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self {
            nodes:     Vec::new(),
            key_index: FxHashMap::default(),
            segments:  Vec::new(),
            seen:      FxHashSet::default(),
        }
    }

    /// Add a node, or return the existing node with the same key.
    pub fn add_node(&mut self, pos: Coordinate) -> NodeId {
        let next = NodeId::from_index(self.nodes.len());
        let id = *self.key_index.entry(NodeKey::of(pos)).or_insert(next);
        if id == next {
            self.nodes.push(pos);
        }
        id
    }

    /// Add an undirected segment.  Returns `false` if it was a self-loop or
    /// already present.
    pub fn add_road(&mut self, a: NodeId, b: NodeId) -> bool {
        if a == b {
            return false;
        }
        let pair = if a < b { (a, b) } else { (b, a) };
        if !self.seen.insert(pair) {
            return false;
        }
        self.segments.push(pair);
        true
    }

    /// Decompose a polyline into consecutive segments.
    pub fn add_line(&mut self, line: &[Coordinate]) {
        let mut prev: Option<NodeId> = None;
        for &c in line {
            let id = self.add_node(c);
            if let Some(p) = prev {
                self.add_road(p, id);
            }
            prev = Some(id);
        }
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn segment_count(&self) -> usize { self.segments.len() }

    /// Consume the builder and produce a [`RoadNetwork`].
    pub fn build(self) -> RoadNetwork {
        let node_count = self.nodes.len();
        let nodes = self.nodes;

        // Both directions of every segment, sorted by source for CSR.
        let mut raw: Vec<(NodeId, NodeId)> = self
            .segments
            .iter()
            .flat_map(|&(a, b)| [(a, b), (b, a)])
            .collect();
        raw.sort_unstable();

        let edge_from: Vec<NodeId> = raw.iter().map(|e| e.0).collect();
        let edge_to:   Vec<NodeId> = raw.iter().map(|e| e.1).collect();
        let edge_weight: Vec<f64> = raw
            .iter()
            .map(|&(a, b)| nodes[a.index()].planar_distance(nodes[b.index()]))
            .collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for &(from, _) in &raw {
            node_out_start[from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, raw.len());

        let entries: Vec<NodeEntry> = nodes
            .iter()
            .enumerate()
            .map(|(i, pos)| NodeEntry {
                point: [pos.lon, pos.lat],
                id: NodeId::from_index(i),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        RoadNetwork {
            node_pos: nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_weight,
            key_index: self.key_index,
            spatial_idx,
        }
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
