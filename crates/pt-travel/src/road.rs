//! Road-graph travel-time model.
//!
//! # Query path
//!
//! ```text
//! (a, b) ──snap (cached by 1e-5° key)──▶ (u, v)
//!   u == v                      → SAME_NODE_MINUTES
//!   directed shortest path      → minutes          ┐
//!   undirected mirror path      → minutes          ├ cached by (u, v)
//!   neither                     → geometric estimate┘
//! ```
//!
//! Mean and sample are identical: the road model has no operational noise
//! layer.
//!
//! # Construction
//!
//! [`RoadTimeModel::new`] takes a weighted network, keeps its largest
//! well-connected component, and builds the undirected mirror.  The input
//! network is consumed; nothing is shared with other models.

use tracing::{debug, info, warn};

use pt_core::config::TimeModelConfig;
use pt_core::{GeoPoint, NodeId, StreamRng};
use pt_spatial::components::{keep_largest_component, keep_largest_component_with};
use pt_spatial::{ms_to_minutes, DijkstraRouter, RoadGraphArtifact, RoadNetwork, Router, SpatialError, SpeedProfile};

use crate::cache::{BoundedCache, CacheStats};
use crate::model::TravelTimeModel;
use crate::TravelResult;

/// Duration charged when both ends snap to the same road node.
pub const SAME_NODE_MINUTES: f64 = 0.1;

/// Scalar parameters of the road model.
#[derive(Clone, Debug)]
pub struct RoadParams {
    pub fallback_speed_kmh:  f64,
    pub speed_multiplier:    f64,
    pub detour_factor:       f64,
    pub node_cache_capacity: usize,
    pub path_cache_capacity: usize,
    /// Override of the strong-component threshold; `None` uses
    /// `max(1000, 5% of nodes)`.
    pub min_scc_nodes:       Option<usize>,
}

impl RoadParams {
    pub fn from_config(cfg: &TimeModelConfig) -> Self {
        Self {
            fallback_speed_kmh:  cfg.road.fallback_speed_kmh,
            speed_multiplier:    cfg.speed_multiplier,
            detour_factor:       cfg.detour_factor,
            node_cache_capacity: cfg.road.node_cache_capacity,
            path_cache_capacity: cfg.road.path_cache_capacity,
            min_scc_nodes:       None,
        }
    }
}

impl Default for RoadParams {
    fn default() -> Self {
        Self::from_config(&TimeModelConfig::default())
    }
}

pub struct RoadTimeModel<R: Router = DijkstraRouter> {
    directed:   RoadNetwork,
    undirected: RoadNetwork,
    router:     R,
    params:     RoadParams,
    node_cache: BoundedCache<(i64, i64), NodeId>,
    /// `None` records that neither graph has a path.
    path_cache: BoundedCache<(NodeId, NodeId), Option<f64>>,
}

impl RoadTimeModel<DijkstraRouter> {
    /// Build from a weighted network with the default Dijkstra router.
    pub fn new(network: RoadNetwork, params: RoadParams) -> TravelResult<Self> {
        Self::with_router(network, params, DijkstraRouter)
    }

    /// Load the artifact named by the configuration, weight it with the
    /// configured speed profile, and build the model.
    pub fn from_config(cfg: &TimeModelConfig) -> TravelResult<Self> {
        let artifact = RoadGraphArtifact::load_dir(&cfg.road.graph_dir)?;
        let profile = SpeedProfile::from_config(&cfg.road, cfg.speed_multiplier);
        let network = artifact.build_network(&profile)?;
        Self::new(network, RoadParams::from_config(cfg))
    }
}

impl<R: Router> RoadTimeModel<R> {
    pub fn with_router(network: RoadNetwork, params: RoadParams, router: R) -> TravelResult<Self> {
        let (directed, kind) = match params.min_scc_nodes {
            Some(min) => keep_largest_component_with(&network, min),
            None => keep_largest_component(&network),
        };
        if directed.is_empty() {
            return Err(SpatialError::EmptyGraph("no nodes after connectivity repair".into()).into());
        }
        let undirected = directed.undirected_mirror();
        info!(
            nodes = directed.node_count(),
            edges = directed.edge_count(),
            component = ?kind,
            "road travel-time model ready"
        );

        Ok(Self {
            directed,
            undirected,
            router,
            node_cache: BoundedCache::new(params.node_cache_capacity),
            path_cache: BoundedCache::new(params.path_cache_capacity),
            params,
        })
    }

    /// The repaired directed network queries run against.
    pub fn network(&self) -> &RoadNetwork {
        &self.directed
    }

    pub fn node_cache_stats(&self) -> CacheStats {
        self.node_cache.stats()
    }

    pub fn path_cache_stats(&self) -> CacheStats {
        self.path_cache.stats()
    }

    /// Nearest road node to `p`, keyed at ~1 m precision.
    pub fn nearest_node(&self, p: GeoPoint) -> NodeId {
        let key = p.rounded_key();
        self.node_cache.get_or_insert_with(key, || {
            let snapped = GeoPoint::new(key.0 as f64 / 1e5, key.1 as f64 / 1e5);
            // `new` rejects empty networks, so a nearest node always exists.
            self.directed.snap_to_node(snapped).unwrap_or(NodeId(0))
        })
    }

    /// Shortest-path minutes between two nodes: directed graph first, then
    /// the undirected mirror.  `None` if neither has a path.
    pub fn node_pair_minutes(&self, u: NodeId, v: NodeId) -> Option<f64> {
        self.path_cache.get_or_insert_with((u, v), || {
            if let Ok(ms) = self.router.travel_ms(&self.directed, u, v) {
                return Some(ms_to_minutes(ms));
            }
            match self.router.travel_ms(&self.undirected, u, v) {
                Ok(ms) => {
                    debug!(%u, %v, "no directed path; using undirected mirror");
                    Some(ms_to_minutes(ms))
                }
                Err(_) => None,
            }
        })
    }

    /// Last-resort estimate when the graph has no path at all.
    pub fn fallback_minutes(&self, a: GeoPoint, b: GeoPoint) -> f64 {
        let km = a.distance_km(b) * self.params.detour_factor;
        let speed = (self.params.fallback_speed_kmh * self.params.speed_multiplier).max(1.0);
        km / speed * 60.0
    }
}

impl<R: Router> TravelTimeModel for RoadTimeModel<R> {
    fn mean_minutes(&self, a: GeoPoint, b: GeoPoint) -> f64 {
        let u = self.nearest_node(a);
        let v = self.nearest_node(b);
        if u == v {
            return SAME_NODE_MINUTES;
        }
        match self.node_pair_minutes(u, v) {
            Some(m) => m,
            None => {
                warn!(%a, %b, "no road path in either direction; using geometric estimate");
                self.fallback_minutes(a, b)
            }
        }
    }

    fn sample_minutes(&self, a: GeoPoint, b: GeoPoint, _rng: &mut StreamRng) -> f64 {
        self.mean_minutes(a, b)
    }

    fn name(&self) -> &'static str {
        "road"
    }

    fn report_stats(&self) {
        let (nodes, paths) = (self.node_cache_stats(), self.path_cache_stats());
        debug!(
            node_hits = nodes.hits,
            node_misses = nodes.misses,
            node_hit_rate = nodes.hit_rate(),
            path_hits = paths.hits,
            path_misses = paths.misses,
            path_hit_rate = paths.hit_rate(),
            path_entries = paths.len,
            "road cache stats"
        );
    }
}

impl<R: Router> std::fmt::Debug for RoadTimeModel<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoadTimeModel")
            .field("network", &self.directed)
            .field("params", &self.params)
            .finish()
    }
}
