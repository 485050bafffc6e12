//! Shortest paths over a [`RoadNetwork`].
//!
//! Costs are integer milliseconds from `edge_travel_ms`; [`Route::minutes`]
//! converts to the simulation's float-minute clock.  The road travel-time
//! model only sees the [`Router`] trait, so another engine can replace
//! [`DijkstraRouter`].

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use pt_core::{EdgeId, NodeId};

use crate::network::RoadNetwork;
use crate::SpatialError;

/// A fastest path: its edges from source to target and their summed cost.
#[derive(Debug, Clone)]
pub struct Route {
    pub edges:           Vec<EdgeId>,
    pub total_travel_ms: u64,
}

#[inline]
pub fn ms_to_minutes(ms: u64) -> f64 {
    ms as f64 / 60_000.0
}

impl Route {
    pub fn minutes(&self) -> f64 {
        ms_to_minutes(self.total_travel_ms)
    }

    /// Source and target are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Routing engine shared by every group of a run, hence `Send + Sync`.
pub trait Router: Send + Sync {
    /// `from == to` gives an empty route.  No path gives
    /// [`SpatialError::NoRoute`]; an id outside the network gives
    /// [`SpatialError::NodeNotFound`].
    fn route(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> Result<Route, SpatialError>;

    /// Cost of the fastest path only, with the same errors as
    /// [`route`](Router::route).
    fn travel_ms(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> Result<u64, SpatialError> {
        self.route(network, from, to).map(|r| r.total_travel_ms)
    }
}

/// Binary-heap Dijkstra that stops when the target is settled.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraRouter;

impl DijkstraRouter {
    fn check(network: &RoadNetwork, from: NodeId, to: NodeId) -> Result<(), SpatialError> {
        for id in [from, to] {
            if id.index() >= network.node_count() {
                return Err(SpatialError::NodeNotFound(id));
            }
        }
        Ok(())
    }
}

impl Router for DijkstraRouter {
    fn route(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> Result<Route, SpatialError> {
        Self::check(network, from, to)?;
        if from == to {
            return Ok(Route { edges: Vec::new(), total_travel_ms: 0 });
        }

        let mut search = Search::new(network.node_count(), from, true);
        match search.run(network, to) {
            Some(cost) => Ok(Route { edges: search.path(network, from, to), total_travel_ms: cost }),
            None => Err(SpatialError::NoRoute { from, to }),
        }
    }

    fn travel_ms(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> Result<u64, SpatialError> {
        Self::check(network, from, to)?;
        if from == to {
            return Ok(0);
        }
        Search::new(network.node_count(), from, false)
            .run(network, to)
            .ok_or(SpatialError::NoRoute { from, to })
    }
}

/// Per-query Dijkstra state.
struct Search {
    dist: Vec<u64>,
    /// Predecessor edges; left empty for cost-only queries.
    via:  Vec<Option<EdgeId>>,
    /// Ties pop the lower `NodeId` first, so equal-cost paths are stable.
    heap: BinaryHeap<Reverse<(u64, NodeId)>>,
}

impl Search {
    fn new(n: usize, source: NodeId, with_path: bool) -> Self {
        let mut dist = vec![u64::MAX; n];
        dist[source.index()] = 0;
        let mut heap = BinaryHeap::new();
        heap.push(Reverse((0, source)));
        let via = if with_path { vec![None; n] } else { Vec::new() };
        Self { dist, via, heap }
    }

    /// Settle nodes until `target` pops; its cost, or `None` if unreachable.
    fn run(&mut self, net: &RoadNetwork, target: NodeId) -> Option<u64> {
        while let Some(Reverse((cost, node))) = self.heap.pop() {
            if node == target {
                return Some(cost);
            }
            if cost > self.dist[node.index()] {
                continue;
            }
            for e in net.out_edges(node) {
                let next = net.edge_to[e.index()];
                let c = cost.saturating_add(u64::from(net.edge_travel_ms[e.index()]));
                if c < self.dist[next.index()] {
                    self.dist[next.index()] = c;
                    if let Some(slot) = self.via.get_mut(next.index()) {
                        *slot = Some(e);
                    }
                    self.heap.push(Reverse((c, next)));
                }
            }
        }
        None
    }

    fn path(&self, net: &RoadNetwork, source: NodeId, target: NodeId) -> Vec<EdgeId> {
        let mut edges = Vec::new();
        let mut cur = target;
        while cur != source {
            let Some(&Some(e)) = self.via.get(cur.index()) else { break };
            edges.push(e);
            cur = net.edge_from[e.index()];
        }
        edges.reverse();
        edges
    }
}
