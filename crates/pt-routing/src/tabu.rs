//! Tabu search over random pairwise swaps.
//!
//! Each iteration draws two distinct interior positions and swaps them.  The
//! move is identified by the pair of pickup indices it exchanges; after it is
//! applied, the same pair stays tabu for `tenure` iterations.  A tabu move is
//! still taken when it beats the best tour seen so far (aspiration).  The
//! current tour may get worse; the best one is tracked separately.
//!
//! Below [`MIN_TABU_LEN`] positions there are too few swaps for a tabu list
//! to matter, and a short 2-opt run is used instead.

use rustc_hash::FxHashMap;

use pt_core::StreamRng;

use crate::matrix::DistanceMatrix;
use crate::tour::Tour;
use crate::two_opt::two_opt;

/// Shortest tour (positions, depot visits included) searched with tabu.
pub const MIN_TABU_LEN: usize = 6;

/// 2-opt pass cap for tours below [`MIN_TABU_LEN`].
pub const SMALL_TOUR_TWO_OPT_PASSES: usize = 10;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TabuParams {
    pub iterations: usize,
    pub tenure:     usize,
}

impl Default for TabuParams {
    fn default() -> Self {
        Self { iterations: 200, tenure: 20 }
    }
}

pub fn tabu_search(tour: &Tour, m: &DistanceMatrix, params: TabuParams, rng: &mut StreamRng) -> Tour {
    let n = tour.len();
    if n < MIN_TABU_LEN {
        return two_opt(tour, m, SMALL_TOUR_TWO_OPT_PASSES);
    }

    let mut best = tour.as_slice().to_vec();
    let mut best_cost = m.path_cost(&best);
    let mut cur = best.clone();
    let mut cand = best.clone();

    let mut tabu = TabuList::default();

    for t in 0..params.iterations {
        let (i, k) = rng.distinct_pair(1..n - 1);
        let (a, b) = (cur[i], cur[k]);
        let mv = swap_move(a, b);

        cand.copy_from_slice(&cur);
        cand.swap(i, k);
        let c = m.path_cost(&cand);

        if admissible(&tabu, mv, t, c, best_cost) {
            std::mem::swap(&mut cur, &mut cand);
            tabu.forbid(mv, t, params.tenure);
            if c < best_cost {
                best.copy_from_slice(&cur);
                best_cost = c;
            }
        }
    }

    Tour::from_vec(best)
}

/// A swap move, keyed by the unordered pair of pickups it exchanges.
pub type SwapMove = (usize, usize);

pub fn swap_move(a: usize, b: usize) -> SwapMove {
    (a.min(b), a.max(b))
}

/// Move → first iteration at which it is allowed again.
#[derive(Debug, Default)]
pub struct TabuList(FxHashMap<SwapMove, usize>);

impl TabuList {
    /// Forbid `mv` for iterations `t + 1 .. t + tenure`.
    pub fn forbid(&mut self, mv: SwapMove, t: usize, tenure: usize) {
        self.0.insert(mv, t + tenure);
    }

    pub fn is_tabu(&self, mv: SwapMove, t: usize) -> bool {
        self.0.get(&mv).is_some_and(|&until| until > t)
    }
}

/// Whether the search may take `mv` at iteration `t`, given the candidate
/// cost `c`.  Tabu moves pass only when they beat `best_cost`.
pub fn admissible(tabu: &TabuList, mv: SwapMove, t: usize, c: f64, best_cost: f64) -> bool {
    !tabu.is_tabu(mv, t) || c < best_cost
}
