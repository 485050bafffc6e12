//! `pt-routing`: distance matrices and tour sequencing.
//!
//! Given one vehicle group's point set (index 0 = depot, then pickups), this
//! crate builds the mean and sampled travel-time matrices and orders the
//! pickups into a round trip.
//!
//! # Crate layout
//!
//! | Module               | Contents                                       |
//! |----------------------|------------------------------------------------|
//! | [`matrix`]           | `DistanceMatrix`, `GroupMatrices`, `build_matrices` |
//! | [`tour`]             | `Tour`, the depot-pinned visiting order        |
//! | [`nearest_neighbor`] | greedy construction                            |
//! | [`two_opt`]          | segment-reversal local search                  |
//! | [`tabu`]             | swap-based tabu search                         |
//! | [`regret`]           | regret-2 insertion construction                |
//! | [`genetic`]          | order-crossover genetic refinement             |
//! | [`sequencer`]        | `Sequencer`: strategy selection                |
//! | [`error`]            | `RoutingError`, `RoutingResult<T>`             |
//!
//! Every heuristic returns a tour `[0, …, 0]` visiting each pickup once and
//! never moves the depot.  Randomized heuristics draw only from the
//! [`StreamRng`](pt_core::StreamRng) passed in.

pub mod error;
pub mod genetic;
pub mod matrix;
pub mod nearest_neighbor;
pub mod regret;
pub mod sequencer;
pub mod tabu;
pub mod tour;
pub mod two_opt;


pub use error::{RoutingError, RoutingResult};
pub use matrix::{build_matrices, DistanceMatrix, GroupMatrices};
pub use sequencer::Sequencer;
pub use tour::{Tour, DEPOT};
