//! Spatial-subsystem error type.

use thiserror::Error;

use pt_core::{NodeId, PtError};

/// Errors produced by `pt-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("edge references unknown artifact node {0}")]
    UnknownArtifactNode(i64),

    #[error("road graph is empty: {0}")]
    EmptyGraph(String),

    #[error(transparent)]
    Core(#[from] PtError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "osm")]
    #[error("OSM parse error: {0}")]
    Osm(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
