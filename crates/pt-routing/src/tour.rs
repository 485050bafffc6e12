//! Round-trip visiting orders.

use std::fmt;

use crate::matrix::DistanceMatrix;

/// Depot index in every point set.
pub const DEPOT: usize = 0;

/// A visiting order `[0, p₁, …, pₙ, 0]` over a point set of `n + 1` indices.
///
/// Every heuristic returns a `Tour` that starts and ends at the depot and
/// visits each pickup exactly once; [`Tour::is_valid`] checks this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour(Vec<usize>);

impl Tour {
    /// `[0, 0]`: the tour of a group with no pickups.
    pub fn empty() -> Self {
        Tour(vec![DEPOT, DEPOT])
    }

    /// `[0, stops…, 0]`.
    pub fn from_stops(stops: &[usize]) -> Self {
        let mut v = Vec::with_capacity(stops.len() + 2);
        v.push(DEPOT);
        v.extend_from_slice(stops);
        v.push(DEPOT);
        Tour(v)
    }

    /// Wrap a full index sequence without checking it.
    pub(crate) fn from_vec(order: Vec<usize>) -> Self {
        Tour(order)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.0
    }

    /// Positions including both depot visits.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` for `[0, 0]`.
    pub fn is_empty(&self) -> bool {
        self.0.len() <= 2
    }

    /// Pickup indices in visiting order.
    pub fn stops(&self) -> &[usize] {
        if self.0.len() <= 2 { &[] } else { &self.0[1..self.0.len() - 1] }
    }

    /// Total cost of the round trip under `m`.
    pub fn cost(&self, m: &DistanceMatrix) -> f64 {
        m.path_cost(&self.0)
    }

    /// Depot at both ends and every index of `0..n` other than the depot
    /// exactly once in between.
    pub fn is_valid(&self, n: usize) -> bool {
        let t = &self.0;
        if n == 0 || t.len() != n + 1 || t[0] != DEPOT || t[t.len() - 1] != DEPOT {
            return false;
        }
        let mut seen = vec![false; n];
        for &i in &t[1..t.len() - 1] {
            if i == DEPOT || i >= n || seen[i] {
                return false;
            }
            seen[i] = true;
        }
        true
    }
}

impl fmt::Display for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}
