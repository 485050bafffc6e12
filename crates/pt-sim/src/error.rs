use thiserror::Error;

use pt_core::PtError;
use pt_routing::RoutingError;
use pt_travel::TravelError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Core(#[from] PtError),

    #[error("travel-time model error: {0}")]
    Travel(#[from] TravelError),

    #[error("routing error for vehicle {vehicle}: {source}")]
    Routing {
        vehicle: String,
        #[source]
        source:  RoutingError,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type SimResult<T> = Result<T, SimError>;
