//! Regret-2 insertion.
//!
//! Seed the tour with the pickup pair `(a, b)` minimizing
//! `d(0,a) + d(a,b) + d(b,0)`.  Then, while pickups remain, compute for each
//! one the cheapest and second-cheapest insertion cost over all current tour
//! edges, and insert the pickup whose difference (its regret) is largest at
//! its cheapest position.  Pickups that would suffer most from waiting go
//! first.
//!
//! Ties keep the first candidate in index order, and the first position
//! among equal insertion costs.

use crate::matrix::DistanceMatrix;
use crate::tour::{Tour, DEPOT};

pub fn regret_insertion(m: &DistanceMatrix) -> Tour {
    let n = m.size();
    let mut unvisited: Vec<usize> = (1..n).collect();

    match unvisited.len() {
        0 => return Tour::empty(),
        1 => return Tour::from_stops(&unvisited),
        _ => {}
    }

    let mut seed: Option<(usize, usize, f64)> = None;
    for &a in &unvisited {
        for &b in &unvisited {
            if a == b {
                continue;
            }
            let c = m.get(DEPOT, a) + m.get(a, b) + m.get(b, DEPOT);
            if seed.is_none_or(|(_, _, best)| c < best) {
                seed = Some((a, b, c));
            }
        }
    }
    let Some((a, b, _)) = seed else {
        return Tour::from_stops(&unvisited);
    };
    let mut route = vec![DEPOT, a, b, DEPOT];
    unvisited.retain(|&x| x != a && x != b);

    while !unvisited.is_empty() {
        // (position in `unvisited`, insert position, regret)
        let mut pick: Option<(usize, usize, f64)> = None;

        for (ui, &c) in unvisited.iter().enumerate() {
            let mut first = f64::INFINITY;
            let mut second = f64::INFINITY;
            let mut first_pos = 1;
            for pos in 1..route.len() {
                let (p, q) = (route[pos - 1], route[pos]);
                let delta = m.get(p, c) + m.get(c, q) - m.get(p, q);
                if delta < first {
                    second = first;
                    first = delta;
                    first_pos = pos;
                } else if delta < second {
                    second = delta;
                }
            }
            // With a single insertion edge the regret is the cost itself.
            let regret = if second.is_finite() { second - first } else { first };
            if pick.is_none_or(|(_, _, r)| regret > r) {
                pick = Some((ui, first_pos, regret));
            }
        }

        let Some((ui, pos, _)) = pick else { break };
        let c = unvisited.remove(ui);
        route.insert(pos, c);
    }

    Tour::from_vec(route)
}
