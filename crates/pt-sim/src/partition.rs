//! Splitting one (center, slot, class) group into vehicle loads.
//!
//! Both policies fill vehicles with consecutive blocks of `capacity`
//! requests and stop at `max_vehicles`.  Requests past
//! `capacity × max_vehicles` are dropped: no overflow vehicle is created and
//! no error is raised, so KPI comparisons across sweeps see the same fleet
//! ceiling.
//!
//! | Policy            | Order before chunking                         |
//! |-------------------|-----------------------------------------------|
//! | `chunk`           | arrival order                                 |
//! | `center_distance` | ascending great-circle distance to the center |

use tracing::warn;

use pt_core::config::PartitionPolicy;
use pt_core::{GeoPoint, PtError, Request};

use crate::SimResult;

/// Partition `requests` into at most `max_vehicles` loads of at most
/// `capacity` requests each.
///
/// Fails with a configuration error if either bound is zero.  An empty input
/// yields no loads.
pub fn partition<'a>(
    requests: &[&'a Request],
    center: GeoPoint,
    policy: PartitionPolicy,
    capacity: usize,
    max_vehicles: usize,
) -> SimResult<Vec<Vec<&'a Request>>> {
    if capacity == 0 {
        return Err(PtError::Config("vehicle capacity must be > 0 (got 0)".into()).into());
    }
    if max_vehicles == 0 {
        return Err(PtError::Config("max_vehicles_per_center_slot must be > 0 (got 0)".into()).into());
    }

    let mut ordered: Vec<&'a Request> = requests.to_vec();
    if policy == PartitionPolicy::CenterDistance {
        // Stable, so equidistant requests keep arrival order.
        ordered.sort_by(|a, b| {
            center.distance_km(a.pickup).total_cmp(&center.distance_km(b.pickup))
        });
    }

    let loads: Vec<Vec<&'a Request>> = ordered
        .chunks(capacity)
        .take(max_vehicles)
        .map(<[&Request]>::to_vec)
        .collect();

    let placed: usize = loads.iter().map(Vec::len).sum();
    if placed < ordered.len() {
        warn!(
            dropped = ordered.len() - placed,
            capacity,
            max_vehicles,
            "requests beyond fleet ceiling dropped"
        );
    }
    Ok(loads)
}
