//! Road-graph artifact: the on-disk form of a road network.
//!
//! An artifact directory holds two CSV files:
//!
//! ```text
//! nodes.csv   node_id,lat,lon
//! edges.csv   from,to,length_m,highway,maxspeed
//! ```
//!
//! `node_id` is any integer (typically an OSM node id); edges refer to it.
//! `highway` and `maxspeed` may be empty.  Edges are directed; a two-way
//! road appears twice.
//!
//! Acquiring the artifact (download, OSM extract) is outside this crate,
//! except for the optional PBF reader in [`crate::osm`].  Weights are not
//! stored: [`RoadGraphArtifact::build_network`] derives them from a
//! [`SpeedProfile`] so one artifact serves every speed scenario.

use std::fs::File;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use pt_core::{GeoPoint, NodeId, PtError};

use crate::network::{RoadNetwork, RoadNetworkBuilder};
use crate::speed::{normalize_highway, SpeedProfile};
use crate::{SpatialError, SpatialResult};

pub const NODES_FILE: &str = "nodes.csv";
pub const EDGES_FILE: &str = "edges.csv";

const NODE_COLUMNS: &[&str] = &["node_id", "lat", "lon"];
const EDGE_COLUMNS: &[&str] = &["from", "to", "length_m"];

/// One row of `nodes.csv`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArtifactNode {
    pub node_id: i64,
    pub lat:     f64,
    pub lon:     f64,
}

/// One row of `edges.csv`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArtifactEdge {
    pub from:     i64,
    pub to:       i64,
    pub length_m: f64,
    #[serde(default)]
    pub highway:  String,
    #[serde(default)]
    pub maxspeed: Option<String>,
}

/// Nodes and directed edges, as loaded from disk.
#[derive(Clone, Debug, Default)]
pub struct RoadGraphArtifact {
    pub nodes: Vec<ArtifactNode>,
    pub edges: Vec<ArtifactEdge>,
}

impl RoadGraphArtifact {
    /// Read `nodes.csv` and `edges.csv` from `dir`.
    pub fn load_dir(dir: &Path) -> SpatialResult<Self> {
        let nodes = read_table::<ArtifactNode>(&dir.join(NODES_FILE), "nodes.csv", NODE_COLUMNS)?;
        let edges = read_table::<ArtifactEdge>(&dir.join(EDGES_FILE), "edges.csv", EDGE_COLUMNS)?;
        info!(dir = %dir.display(), nodes = nodes.len(), edges = edges.len(), "loaded road graph artifact");
        Ok(Self { nodes, edges })
    }

    /// Write the artifact to `dir` (created if missing).
    pub fn write_dir(&self, dir: &Path) -> SpatialResult<()> {
        std::fs::create_dir_all(dir)?;
        let mut w = csv::Writer::from_path(dir.join(NODES_FILE))?;
        for n in &self.nodes {
            w.serialize(n)?;
        }
        w.flush()?;
        let mut w = csv::Writer::from_path(dir.join(EDGES_FILE))?;
        for e in &self.edges {
            w.serialize(e)?;
        }
        w.flush()?;
        Ok(())
    }

    /// Build the weighted directed network under `profile`.
    ///
    /// Fails with [`SpatialError::UnknownArtifactNode`] if an edge refers to
    /// a node id missing from `nodes`.
    pub fn build_network(&self, profile: &SpeedProfile) -> SpatialResult<RoadNetwork> {
        let mut b = RoadNetworkBuilder::with_capacity(self.nodes.len(), self.edges.len());
        let mut ids: FxHashMap<i64, NodeId> = FxHashMap::default();
        ids.reserve(self.nodes.len());

        for n in &self.nodes {
            let id = b.add_node(GeoPoint::new(n.lat, n.lon));
            ids.insert(n.node_id, id);
        }
        for e in &self.edges {
            let from = *ids.get(&e.from).ok_or(SpatialError::UnknownArtifactNode(e.from))?;
            let to   = *ids.get(&e.to).ok_or(SpatialError::UnknownArtifactNode(e.to))?;
            let class = normalize_highway(&e.highway);
            let maxspeed = e.maxspeed.as_deref().filter(|s| !s.trim().is_empty());
            let travel_ms = profile.travel_ms(e.length_m, &class, maxspeed);
            b.add_directed_edge(from, to, e.length_m.max(0.0) as f32, travel_ms);
        }
        Ok(b.build())
    }
}

fn read_table<T: serde::de::DeserializeOwned>(
    path: &Path,
    table: &'static str,
    required: &[&str],
) -> SpatialResult<Vec<T>> {
    let file = File::open(path).map_err(|e| {
        PtError::Config(format!("cannot open road graph table {}: {e}", path.display()))
    })?;
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);
    let header: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    if let Some(err) = PtError::check_columns(table, required, &header) {
        return Err(err.into());
    }
    let mut rows = Vec::new();
    for rec in rdr.deserialize() {
        rows.push(rec?);
    }
    Ok(rows)
}
