//! `pt-spatial`: road graph, speed resolution, spatial indexing, and routing.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                 |
//! |----------------|----------------------------------------------------------|
//! | [`artifact`]   | `RoadGraphArtifact`, `nodes.csv` / `edges.csv` I/O       |
//! | [`speed`]      | road-class normalization, `maxspeed` parsing, `SpeedProfile` |
//! | [`network`]    | `RoadNetwork` (CSR + R-tree), `RoadNetworkBuilder`       |
//! | [`components`] | SCC / WCC labelling, `keep_largest_component`            |
//! | [`router`]     | `Router` trait, `Route`, `DijkstraRouter`                |
//! | [`osm`]        | `load_from_pbf` (feature = `"osm"` only)                 |
//! | [`error`]      | `SpatialError`, `SpatialResult<T>`                       |
//!
//! # Pipeline
//!
//! ```text
//! RoadGraphArtifact ──SpeedProfile──▶ RoadNetwork ──repair──▶ RoadNetwork
//!                                                    └──mirror──▶ RoadNetwork (undirected)
//! ```
//!
//! Each step produces a new network; the loaded artifact is never mutated,
//! so one artifact can back several runs with different speed profiles.
//!
//! # Feature flags
//!
//! | Flag  | Effect                                       |
//! |-------|----------------------------------------------|
//! | `osm` | Enables OSM PBF loading via the `osmpbf` crate. |

pub mod artifact;
pub mod components;
pub mod error;
pub mod network;
pub mod router;
pub mod speed;

#[cfg(feature = "osm")]
pub mod osm;

#[cfg(test)]
mod tests;

pub use artifact::{ArtifactEdge, ArtifactNode, RoadGraphArtifact};
pub use components::{keep_largest_component, ComponentKind, Components};
pub use error::{SpatialError, SpatialResult};
pub use network::{RoadNetwork, RoadNetworkBuilder};
pub use router::{ms_to_minutes, DijkstraRouter, Route, Router};
pub use speed::SpeedProfile;
