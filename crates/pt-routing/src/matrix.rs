//! Dense distance matrices over a group's point set.
//!
//! Index 0 is always the depot; indices `1..n` are pickups in group order.
//! Entries are minutes for travel-time matrices and degrees for planar ones.
//! Diagonals are zero.  Matrices from the road model are asymmetric.

use pt_core::{GeoPoint, StreamRng};
use pt_travel::TravelTimeModel;

use crate::{RoutingError, RoutingResult};

/// A dense n×n matrix stored in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// All-zero matrix.
    pub fn new(size: usize) -> Self {
        Self { data: vec![0.0; size * size], size }
    }

    /// Wrap an explicit row-major grid.
    pub fn from_data(size: usize, data: Vec<f64>) -> RoutingResult<Self> {
        if data.len() != size * size {
            let rows = if size == 0 { 0 } else { data.len() / size };
            return Err(RoutingError::Shape { expected: size, rows, cols: size });
        }
        Ok(Self { data, size })
    }

    /// Build from nested rows, checking that the grid is square.
    pub fn from_rows(rows: &[Vec<f64>]) -> RoutingResult<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for row in rows {
            if row.len() != n {
                return Err(RoutingError::Shape { expected: n, rows: n, cols: row.len() });
            }
            data.extend_from_slice(row);
        }
        Ok(Self { data, size: n })
    }

    /// Planar degree-space distances between raw coordinates.
    pub fn planar(points: &[GeoPoint]) -> Self {
        let n = points.len();
        let mut m = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = points[i].planar_distance(points[j]);
                m.set(i, j, d);
                m.set(j, i, d);
            }
        }
        m
    }

    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    #[inline]
    pub fn set(&mut self, from: usize, to: usize, value: f64) {
        self.data[from * self.size + to] = value;
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// `true` if `m[i][j]` and `m[j][i]` agree within `tol` everywhere.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Fail with [`RoutingError::Shape`] unless the matrix is `n`×`n`.
    pub fn check_size(&self, n: usize) -> RoutingResult<()> {
        if self.size == n {
            Ok(())
        } else {
            Err(RoutingError::Shape { expected: n, rows: self.size, cols: self.size })
        }
    }

    /// Sum of consecutive leg costs along `order`.
    pub fn path_cost(&self, order: &[usize]) -> f64 {
        order.windows(2).map(|w| self.get(w[0], w[1])).sum()
    }
}

/// Mean and sampled travel-time matrices for one point set.
#[derive(Debug, Clone)]
pub struct GroupMatrices {
    /// Deterministic durations; drives sequencing and the promised timeline.
    pub mean:   DistanceMatrix,
    /// Independently sampled durations; drives the actual timeline.
    pub actual: DistanceMatrix,
}

/// Query `model` for every ordered pair `i != j` of `points`.
///
/// Pairs are visited row by row, so the sampled matrix is a deterministic
/// function of the point set and `rng`'s seed.
pub fn build_matrices<M>(points: &[GeoPoint], model: &M, rng: &mut StreamRng) -> GroupMatrices
where
    M: TravelTimeModel + ?Sized,
{
    let n = points.len();
    let mut mean = DistanceMatrix::new(n);
    let mut actual = DistanceMatrix::new(n);
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            mean.set(i, j, model.mean_minutes(points[i], points[j]).max(0.0));
            actual.set(i, j, model.sample_minutes(points[i], points[j], rng).max(0.0));
        }
    }
    GroupMatrices { mean, actual }
}
