//! OSM PBF loader, enabled with the `osm` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use pt_spatial::osm::load_from_pbf;
//!
//! let artifact = load_from_pbf(Path::new("seoul.osm.pbf"))?;
//! artifact.write_dir(Path::new("data/graph"))?;
//! ```
//!
//! # What is loaded
//!
//! Only drivable `highway=*` ways are kept (see [`is_drivable`]).  Each way
//! becomes directed artifact edges between consecutive way nodes, carrying
//! the raw `highway` and `maxspeed` tags; speeds are resolved later by a
//! [`SpeedProfile`](crate::SpeedProfile).  One-way roads add a single edge
//! (reversed for `oneway=-1`); two-way roads add both directions.
//!
//! # Memory note
//!
//! The loader buffers all OSM node positions for the first pass because ways
//! reference nodes by OSM id.  The map is dropped once edges are built.

use std::path::Path;

use osmpbf::{Element, ElementReader};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::info;

use pt_core::GeoPoint;

use crate::artifact::{ArtifactEdge, ArtifactNode, RoadGraphArtifact};
use crate::SpatialError;

// ── Public entry point ────────────────────────────────────────────────────────

/// Read a road-graph artifact from an OSM PBF file.
///
/// # Errors
///
/// Returns [`SpatialError::Osm`] on parse errors.
pub fn load_from_pbf(path: &Path) -> Result<RoadGraphArtifact, SpatialError> {
    let reader = ElementReader::from_path(path).map_err(|e| SpatialError::Osm(e.to_string()))?;

    let mut all_nodes: FxHashMap<i64, GeoPoint> = FxHashMap::default();
    let mut road_ways: Vec<OsmWay> = Vec::new();

    reader
        .for_each(|elem| match elem {
            Element::Node(n) => {
                all_nodes.insert(n.id(), GeoPoint::new(n.lat(), n.lon()));
            }
            Element::DenseNode(n) => {
                all_nodes.insert(n.id(), GeoPoint::new(n.lat(), n.lon()));
            }
            Element::Way(w) => {
                let tags: Vec<(&str, &str)> = w.tags().collect();
                let tag = |key: &str| tags.iter().find(|(k, _)| *k == key).map(|(_, v)| *v);
                let Some(highway) = tag("highway").filter(|hw| is_drivable(hw)) else {
                    return;
                };
                road_ways.push(OsmWay {
                    refs:     w.refs().collect(),
                    highway:  highway.to_string(),
                    maxspeed: tag("maxspeed").map(str::to_string),
                    oneway:   oneway(highway, tag("oneway")),
                });
            }
            _ => {}
        })
        .map_err(|e| SpatialError::Osm(e.to_string()))?;

    let road_node_ids: FxHashSet<i64> = road_ways
        .iter()
        .flat_map(|w| w.refs.iter().copied())
        .collect();

    let mut artifact = RoadGraphArtifact::default();
    let mut ids: Vec<i64> = road_node_ids
        .into_iter()
        .filter(|id| all_nodes.contains_key(id))
        .collect();
    ids.sort_unstable();
    for id in ids {
        if let Some(pos) = all_nodes.get(&id) {
            artifact.nodes.push(ArtifactNode { node_id: id, lat: pos.lat, lon: pos.lon });
        }
    }

    for way in &road_ways {
        for pair in way.refs.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (Some(&pa), Some(&pb)) = (all_nodes.get(&a), all_nodes.get(&b)) else {
                continue;
            };
            let length_m = pa.distance_m(pb);
            let mut push = |from: i64, to: i64| {
                artifact.edges.push(ArtifactEdge {
                    from,
                    to,
                    length_m,
                    highway:  way.highway.clone(),
                    maxspeed: way.maxspeed.clone(),
                });
            };
            match way.oneway {
                OneWay::No      => { push(a, b); push(b, a); }
                OneWay::Forward => push(a, b),
                OneWay::Reverse => push(b, a),
            }
        }
    }

    info!(
        path = %path.display(),
        nodes = artifact.nodes.len(),
        edges = artifact.edges.len(),
        "read OSM road graph"
    );
    Ok(artifact)
}

// ── Internal types ────────────────────────────────────────────────────────────

struct OsmWay {
    refs:     Vec<i64>,
    highway:  String,
    maxspeed: Option<String>,
    oneway:   OneWay,
}

#[derive(Copy, Clone)]
enum OneWay {
    No,
    Forward,
    Reverse,
}

// ── Tag helpers ───────────────────────────────────────────────────────────────

/// `false` for `highway` values a vehicle cannot use.
fn is_drivable(highway: &str) -> bool {
    !matches!(
        highway,
        "footway" | "path" | "cycleway" | "pedestrian" | "steps" | "track"
            | "bridleway" | "corridor" | "proposed" | "construction" | "platform"
    )
}

/// Motorways are implicitly one-way in OSM convention.
fn oneway(highway: &str, tag: Option<&str>) -> OneWay {
    match tag {
        Some("yes" | "1" | "true") => OneWay::Forward,
        Some("-1" | "reverse")     => OneWay::Reverse,
        Some("no" | "0" | "false") => OneWay::No,
        _ if matches!(highway, "motorway" | "motorway_link") => OneWay::Forward,
        _ => OneWay::No,
    }
}
