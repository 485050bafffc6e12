//! Greedy nearest-neighbor construction.

use crate::matrix::DistanceMatrix;
use crate::tour::{Tour, DEPOT};

/// From the depot, repeatedly move to the closest unvisited index, then
/// return to the depot.  Ties go to the lowest index.  O(n²).
pub fn nearest_neighbor(m: &DistanceMatrix) -> Tour {
    let n = m.size();
    if n <= 1 {
        return Tour::empty();
    }

    let mut visited = vec![false; n];
    visited[DEPOT] = true;
    let mut order = Vec::with_capacity(n + 1);
    order.push(DEPOT);
    let mut cur = DEPOT;

    for _ in 1..n {
        let mut best: Option<(usize, f64)> = None;
        for j in 1..n {
            if visited[j] {
                continue;
            }
            let d = m.get(cur, j);
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((j, d));
            }
        }
        let Some((next, _)) = best else { break };
        visited[next] = true;
        order.push(next);
        cur = next;
    }

    order.push(DEPOT);
    Tour::from_vec(order)
}
