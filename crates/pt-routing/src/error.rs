//! Routing error type.

use thiserror::Error;

use pt_core::PtError;

#[derive(Debug, Error)]
pub enum RoutingError {
    /// A matrix does not match the point set it is supposed to describe.
    #[error("distance matrix is {rows}x{cols}, expected {expected}x{expected}")]
    Shape { expected: usize, rows: usize, cols: usize },

    /// A point set must contain at least the depot.
    #[error("point set is empty; index 0 must be the depot")]
    EmptyPointSet,

    #[error(transparent)]
    Core(#[from] PtError),
}

pub type RoutingResult<T> = Result<T, RoutingError>;
