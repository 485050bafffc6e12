//! Directed road graph used by the road travel-time model.
//!
//! Edges are stored in CSR order: all outgoing edges of node `n` sit in the
//! index range `node_out_start[n] .. node_out_start[n + 1]` of the parallel
//! `edge_*` vectors.  Node positions also feed an R-tree, so pickup and
//! center coordinates can be snapped to their nearest intersection.
//!
//! Connectivity repair ([`RoadNetwork::induced_subgraph`]) and the undirected
//! fallback graph ([`RoadNetwork::undirected_mirror`]) each build a fresh
//! network.

use rstar::RTree;
use rstar::primitives::GeomWithData;

use pt_core::{EdgeId, GeoPoint, NodeId};

/// `[lat, lon]` point tagged with its node.  Nearest-neighbor queries use
/// squared degree distance, which ranks correctly at city scale.
type SnapEntry = GeomWithData<[f64; 2], NodeId>;

/// Road graph in CSR layout with a snapping index.
///
/// Fields are public for the router's inner loop.  Build one with
/// [`RoadNetworkBuilder`] or from a [`RoadGraphArtifact`](crate::RoadGraphArtifact).
#[derive(Clone)]
pub struct RoadNetwork {
    /// Indexed by `NodeId`.
    pub node_pos:       Vec<GeoPoint>,
    /// CSR row offsets, `node_count + 1` entries.
    pub node_out_start: Vec<u32>,
    /// Indexed by `EdgeId`.
    pub edge_from:      Vec<NodeId>,
    pub edge_to:        Vec<NodeId>,
    pub edge_length_m:  Vec<f32>,
    /// Dijkstra cost: milliseconds at the speed profile the graph was built
    /// with.
    pub edge_travel_ms: Vec<u32>,

    snap_index: RTree<SnapEntry>,
}

impl RoadNetwork {
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    fn out_range(&self, node: NodeId) -> std::ops::Range<usize> {
        self.node_out_start[node.index()] as usize..self.node_out_start[node.index() + 1] as usize
    }

    /// Outgoing edges of `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_range(node).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.out_range(node).len()
    }

    /// Nearest intersection to `pos`; `None` on an empty network.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.snap_index.nearest_neighbor(&[pos.lat, pos.lon]).map(|e| e.data)
    }

    /// Subgraph on the nodes with `keep[n]`, renumbered densely in order.
    /// Edges with a dropped endpoint are removed.
    pub fn induced_subgraph(&self, keep: &[bool]) -> RoadNetwork {
        debug_assert_eq!(keep.len(), self.node_count());

        let kept = keep.iter().filter(|k| **k).count();
        let mut b = RoadNetworkBuilder::with_capacity(kept, self.edge_count());
        let remap: Vec<Option<NodeId>> = self
            .node_pos
            .iter()
            .zip(keep)
            .map(|(&pos, &k)| k.then(|| b.add_node(pos)))
            .collect();

        for e in 0..self.edge_count() {
            if let (Some(from), Some(to)) =
                (remap[self.edge_from[e].index()], remap[self.edge_to[e].index()])
            {
                b.add_directed_edge(from, to, self.edge_length_m[e], self.edge_travel_ms[e]);
            }
        }
        b.build()
    }

    /// Same nodes; each directed edge `u → v` yields both `u → v` and `v → u`
    /// with the same cost.  Parallel edges are kept.
    pub fn undirected_mirror(&self) -> RoadNetwork {
        let mut b = RoadNetworkBuilder::with_capacity(self.node_count(), 2 * self.edge_count());
        for &pos in &self.node_pos {
            b.add_node(pos);
        }
        for e in 0..self.edge_count() {
            let (u, v) = (self.edge_from[e], self.edge_to[e]);
            b.add_road(u, v, self.edge_length_m[e], self.edge_travel_ms[e]);
        }
        b.build()
    }
}

impl std::fmt::Debug for RoadNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoadNetwork")
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .finish()
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Collects nodes and directed edges in any order; [`build`](Self::build)
/// lays them out in CSR order (a counting sort on the source node, so a
/// node's edges keep their insertion order).
///
/// ```
/// use pt_core::GeoPoint;
/// use pt_spatial::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// let depot = b.add_node(GeoPoint::new(37.50, 127.00));
/// let stop = b.add_node(GeoPoint::new(37.51, 127.00));
/// b.add_road(depot, stop, 1_100.0, 132_000); // 1.1 km at 30 km/h
/// let net = b.build();
/// assert_eq!(net.edge_count(), 2);
/// ```
#[derive(Default)]
pub struct RoadNetworkBuilder {
    nodes: Vec<GeoPoint>,
    edges: Vec<(NodeId, NodeId, f32, u32)>,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            edges: Vec::with_capacity(edges),
        }
    }

    /// Ids are assigned sequentially from 0.
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        self.nodes.push(pos);
        NodeId(self.nodes.len() as u32 - 1)
    }

    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, length_m: f32, travel_ms: u32) {
        self.edges.push((from, to, length_m, travel_ms));
    }

    /// Two-way segment.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, length_m: f32, travel_ms: u32) {
        self.add_directed_edge(a, b, length_m, travel_ms);
        self.add_directed_edge(b, a, length_m, travel_ms);
    }

    pub fn build(self) -> RoadNetwork {
        let n = self.nodes.len();
        let m = self.edges.len();

        let mut node_out_start = vec![0u32; n + 1];
        for &(from, ..) in &self.edges {
            node_out_start[from.index() + 1] += 1;
        }
        for i in 0..n {
            node_out_start[i + 1] += node_out_start[i];
        }

        let mut edge_from = vec![NodeId::INVALID; m];
        let mut edge_to = vec![NodeId::INVALID; m];
        let mut edge_length_m = vec![0.0f32; m];
        let mut edge_travel_ms = vec![0u32; m];
        let mut cursor: Vec<u32> = node_out_start[..n].to_vec();
        for (from, to, length_m, travel_ms) in self.edges {
            let slot = cursor[from.index()] as usize;
            cursor[from.index()] += 1;
            edge_from[slot] = from;
            edge_to[slot] = to;
            edge_length_m[slot] = length_m;
            edge_travel_ms[slot] = travel_ms;
        }

        let snap_index = RTree::bulk_load(
            self.nodes
                .iter()
                .enumerate()
                .map(|(i, p)| SnapEntry::new([p.lat, p.lon], NodeId(i as u32)))
                .collect(),
        );

        RoadNetwork {
            node_pos: self.nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            edge_travel_ms,
            snap_index,
        }
    }
}
