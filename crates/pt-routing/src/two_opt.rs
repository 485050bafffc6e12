//! 2-opt local search with the depot pinned at both ends.
//!
//! # Algorithm
//!
//! For every pair of interior positions `i < k`, reverse `tour[i..=k]` and
//! keep the result if it lowers the total cost by more than
//! [`IMPROVEMENT_EPS`].  Accepted moves take effect immediately
//! (first improvement); a pass that accepts nothing ends the search.
//!
//! Road-model matrices are asymmetric, so reversing a segment also changes
//! the cost of every edge inside it.  Each candidate is therefore re-costed
//! in full rather than with the symmetric four-edge delta.
//!
//! # Complexity
//!
//! O(n³) per pass.  Groups hold one vehicle's worth of pickups, so `n` stays
//! small.

use crate::matrix::DistanceMatrix;
use crate::tour::Tour;

/// Minimum gain for a move to count as an improvement.
pub const IMPROVEMENT_EPS: f64 = 1e-9;

/// Improve `tour` by segment reversals for at most `max_passes` passes.
///
/// The returned tour never costs more than the input.
pub fn two_opt(tour: &Tour, m: &DistanceMatrix, max_passes: usize) -> Tour {
    let mut best = tour.as_slice().to_vec();
    let n = best.len();
    // Need at least two interior positions to reverse anything.
    if n < 4 {
        return tour.clone();
    }
    let mut best_cost = m.path_cost(&best);
    let mut cand = best.clone();

    for _ in 0..max_passes {
        let mut improved = false;
        for i in 1..n - 2 {
            for k in (i + 1)..n - 1 {
                cand.copy_from_slice(&best);
                cand[i..=k].reverse();
                let c = m.path_cost(&cand);
                if c + IMPROVEMENT_EPS < best_cost {
                    std::mem::swap(&mut best, &mut cand);
                    best_cost = c;
                    improved = true;
                }
            }
        }
        if !improved {
            break;
        }
    }

    Tour::from_vec(best)
}
