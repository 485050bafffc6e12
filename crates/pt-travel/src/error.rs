//! Travel-time error type.

use thiserror::Error;

use pt_core::PtError;
use pt_spatial::SpatialError;

/// Errors raised while constructing a travel-time model.
///
/// Queries never fail: missing road paths degrade to the geometric estimate.
#[derive(Debug, Error)]
pub enum TravelError {
    #[error(transparent)]
    Core(#[from] PtError),

    #[error("road graph: {0}")]
    Spatial(#[from] SpatialError),
}

pub type TravelResult<T> = Result<T, TravelError>;
