//! Cumulative arrival times along a tour.
//!
//! A timeline sums the leg durations of a tour under one matrix and pins the
//! result to a single anchor: either the time of the first stop or the time
//! of the last.  Each vehicle gets two:
//!
//! - **promised**: mean matrix, anchored so the final center arrival lands
//!   exactly on the slot time.
//! - **actual**: sampled matrix, anchored at the promised departure.  The
//!   vehicle leaves when promised and then experiences different durations.

use pt_routing::{DistanceMatrix, Tour};

/// Which end of the timeline is fixed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TimelineAnchor {
    /// Time of the first stop.
    Start(f64),
    /// Time of the last stop; the start is back-solved as `end - total`.
    End(f64),
}

impl Default for TimelineAnchor {
    fn default() -> Self {
        TimelineAnchor::Start(0.0)
    }
}

/// One time per tour position, non-decreasing.
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline(Vec<f64>);

impl Timeline {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Time at tour position `pos`.
    #[inline]
    pub fn at(&self, pos: usize) -> f64 {
        self.0[pos]
    }

    pub fn start(&self) -> f64 {
        self.0.first().copied().unwrap_or(0.0)
    }

    pub fn end(&self) -> f64 {
        self.0.last().copied().unwrap_or(0.0)
    }

    pub fn duration(&self) -> f64 {
        self.end() - self.start()
    }
}

/// Propagate `tour` through `m` from `anchor`.
pub fn simulate_timeline(tour: &Tour, m: &DistanceMatrix, anchor: TimelineAnchor) -> Timeline {
    let legs: Vec<f64> = tour.as_slice().windows(2).map(|w| m.get(w[0], w[1])).collect();
    let total: f64 = legs.iter().sum();

    let start = match anchor {
        TimelineAnchor::Start(t) => t,
        TimelineAnchor::End(t) => t - total,
    };

    let mut times = Vec::with_capacity(legs.len() + 1);
    let mut t = start;
    times.push(t);
    for leg in legs {
        t += leg;
        times.push(t);
    }
    Timeline(times)
}
