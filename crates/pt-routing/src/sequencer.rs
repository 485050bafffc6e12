//! Strategy selection for tour sequencing.
//!
//! | Strategy           | Pipeline                                          |
//! |--------------------|---------------------------------------------------|
//! | `nearest_neighbor` | nearest neighbor                                  |
//! | `two_opt`          | nearest neighbor → 2-opt                          |
//! | `tabu`             | nearest neighbor → tabu (2-opt below 6 positions) |
//! | `regret_hybrid`    | regret-2 → 2-opt → tabu → genetic (≥ 5 pickups)   |
//!
//! A sequencing call is a pure function of the cost matrix, the strategy,
//! and the heuristic RNG the caller passes in.

use tracing::trace;

use pt_core::config::{DistanceKind, RoutingConfig, Strategy};
use pt_core::{GeoPoint, StreamRng};

use crate::genetic::{genetic_refine, GeneticParams};
use crate::matrix::DistanceMatrix;
use crate::nearest_neighbor::nearest_neighbor;
use crate::regret::regret_insertion;
use crate::tabu::{tabu_search, TabuParams, MIN_TABU_LEN};
use crate::tour::Tour;
use crate::two_opt::two_opt;
use crate::{RoutingError, RoutingResult};

/// Fewest pickups for the hybrid pipeline's genetic stage.
pub const MIN_GENETIC_PICKUPS: usize = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct Sequencer {
    pub strategy:           Strategy,
    pub distance:           DistanceKind,
    pub two_opt_max_passes: usize,
    pub tabu:               TabuParams,
    pub genetic:            GeneticParams,
}

impl Sequencer {
    pub fn new(strategy: Strategy) -> Self {
        Self::from_config(&RoutingConfig { strategy, ..RoutingConfig::default() })
    }

    pub fn from_config(cfg: &RoutingConfig) -> Self {
        Self {
            strategy:           cfg.strategy,
            distance:           cfg.distance,
            two_opt_max_passes: cfg.two_opt_max_passes,
            tabu: TabuParams {
                iterations: cfg.tabu.iterations,
                tenure:     cfg.tabu.tenure,
            },
            genetic: GeneticParams {
                population:    cfg.genetic.population,
                generations:   cfg.genetic.generations,
                mutation_rate: cfg.genetic.mutation_rate,
                elite:         cfg.genetic.elite,
                parent_pool:   cfg.genetic.parent_pool,
            },
        }
    }

    /// Sequence a point set, choosing the cost source by `self.distance`:
    /// the mean travel-time matrix, or planar distance between coordinates.
    pub fn sequence_points(
        &self,
        points: &[GeoPoint],
        mean: &DistanceMatrix,
        rng: &mut StreamRng,
    ) -> RoutingResult<Tour> {
        if points.is_empty() {
            return Err(RoutingError::EmptyPointSet);
        }
        mean.check_size(points.len())?;
        match self.distance {
            DistanceKind::TravelTime => self.sequence(mean, rng),
            DistanceKind::Euclidean => self.sequence(&DistanceMatrix::planar(points), rng),
        }
    }

    /// Sequence directly over a cost matrix.
    pub fn sequence(&self, m: &DistanceMatrix, rng: &mut StreamRng) -> RoutingResult<Tour> {
        if m.size() == 0 {
            return Err(RoutingError::EmptyPointSet);
        }

        let tour = match self.strategy {
            Strategy::NearestNeighbor => nearest_neighbor(m),
            Strategy::TwoOpt => two_opt(&nearest_neighbor(m), m, self.two_opt_max_passes),
            Strategy::Tabu => tabu_search(&nearest_neighbor(m), m, self.tabu, rng),
            Strategy::RegretHybrid => {
                let t = regret_insertion(m);
                let t = two_opt(&t, m, self.two_opt_max_passes);
                let t = tabu_search(&t, m, self.tabu, rng);
                let pickups = m.size() - 1;
                if pickups >= MIN_GENETIC_PICKUPS && t.len() >= MIN_TABU_LEN {
                    genetic_refine(&t, m, self.genetic, rng)
                } else {
                    t
                }
            }
        };

        debug_assert!(tour.is_valid(m.size()), "invalid tour {tour} for {} points", m.size());
        trace!(strategy = %self.strategy, tour = %tour, cost = tour.cost(m), "sequenced");
        Ok(tour)
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::from_config(&RoutingConfig::default())
    }
}
