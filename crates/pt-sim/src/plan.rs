//! Per-vehicle planning: points, matrices, tour, timelines, and the records
//! derived from them.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use pt_core::rng::mix_key;
use pt_core::{CenterId, GeoPoint, Request, RngStream, SlotTime, StreamRng, VehicleClass};
use pt_routing::{build_matrices, GroupMatrices, Sequencer, Tour, DEPOT};
use pt_travel::TravelTimeModel;

use crate::timeline::{simulate_timeline, Timeline, TimelineAnchor};
use crate::{SimError, SimResult};

// ── GroupKey ──────────────────────────────────────────────────────────────────

/// One (center, slot, class) demand group.  Ordering is the group loop order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub center: CenterId,
    pub slot:   SlotTime,
    pub class:  VehicleClass,
}

impl GroupKey {
    pub fn of(request: &Request) -> Self {
        Self { center: request.center, slot: request.slot, class: request.class }
    }

    /// `v{center}_{slot}_{class}_{index}`.
    pub fn vehicle_id(&self, index: usize) -> String {
        format!("v{}_{}_{}_{}", self.center, self.slot, self.class, index)
    }

    /// Stable RNG key for vehicle `index` of this group.
    pub fn seed_key(&self, index: usize) -> u64 {
        mix_key(&[
            self.center.0 as u64,
            self.slot.minutes() as u64,
            self.class.ordinal(),
            index as u64,
        ])
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.center, self.slot, self.class)
    }
}

// ── Records ───────────────────────────────────────────────────────────────────

/// Promised and actual times for one passenger.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventTimes {
    #[serde(rename = "pickup_promise_min")]
    pub pickup_promise: f64,
    #[serde(rename = "pickup_actual_min")]
    pub pickup_actual:  f64,
    #[serde(rename = "center_promise_min")]
    pub center_promise: f64,
    #[serde(rename = "center_actual_min")]
    pub center_actual:  f64,
    /// Actual center arrival minus actual pickup.
    #[serde(rename = "ride_time_min")]
    pub ride_time:      f64,
}

impl EventTimes {
    #[inline]
    pub fn pickup_lateness(&self) -> f64 {
        self.pickup_actual - self.pickup_promise
    }

    #[inline]
    pub fn center_lateness(&self) -> f64 {
        self.center_actual - self.center_promise
    }
}

/// One passenger's pickup and delivery.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub key:        GroupKey,
    pub vehicle_id: String,
    pub request_id: String,
    /// Index into the vehicle's point set.
    pub node:       usize,
    /// Position in the tour.
    pub stop_seq:   usize,
    pub pickup:     GeoPoint,
    pub center:     GeoPoint,
    pub times:      EventTimes,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StopKind {
    Depot,
    Pickup,
    Center,
}

impl StopKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StopKind::Depot  => "depot",
            StopKind::Pickup => "pickup",
            StopKind::Center => "center",
        }
    }
}

impl fmt::Display for StopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stop {
    pub seq:        usize,
    pub node:       usize,
    pub kind:       StopKind,
    pub location:   GeoPoint,
    /// Set for pickups only.
    pub request_id: Option<String>,
}

/// Vehicle-level summary handed to writers and map export.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleRoute {
    pub vehicle_id:      String,
    pub key:             GroupKey,
    pub center_location: GeoPoint,
    pub tour:            Tour,
    pub stops:           Vec<Stop>,
    pub promise_start:   f64,
    pub promise_end:     f64,
    pub actual_start:    f64,
    pub actual_end:      f64,
}

impl VehicleRoute {
    pub fn actual_duration(&self) -> f64 {
        self.actual_end - self.actual_start
    }
}

// ── VehicleGroupPlan ──────────────────────────────────────────────────────────

/// Everything computed for one vehicle.  Read-only once built.
#[derive(Clone, Debug)]
pub struct VehicleGroupPlan {
    pub key:        GroupKey,
    pub index:      usize,
    pub vehicle_id: String,
    /// Index 0 is the center; `i ≥ 1` is `requests[i - 1]`'s pickup.
    pub points:     Vec<GeoPoint>,
    pub requests:   Vec<Request>,
    pub matrices:   GroupMatrices,
    pub tour:       Tour,
    pub promised:   Timeline,
    pub actual:     Timeline,
}

impl VehicleGroupPlan {
    /// Plan one vehicle load.  `None` for an empty load.
    ///
    /// Travel-time noise and heuristic moves each draw from their own stream
    /// keyed by `(key, index)`, so the plan does not depend on which other
    /// vehicles were planned before it.
    pub fn build<M>(
        key: GroupKey,
        index: usize,
        center: GeoPoint,
        load: &[&Request],
        model: &M,
        sequencer: &Sequencer,
        seed: u64,
    ) -> SimResult<Option<Self>>
    where
        M: TravelTimeModel + ?Sized,
    {
        if load.is_empty() {
            return Ok(None);
        }
        let vehicle_id = key.vehicle_id(index);

        let mut points = Vec::with_capacity(load.len() + 1);
        points.push(center);
        points.extend(load.iter().map(|r| r.pickup));

        let seed_key = key.seed_key(index);
        let mut travel_rng = StreamRng::for_key(seed, RngStream::TravelTime, seed_key);
        let mut heuristic_rng = StreamRng::for_key(seed, RngStream::Heuristic, seed_key);

        let matrices = build_matrices(&points, model, &mut travel_rng);
        let tour = sequencer
            .sequence_points(&points, &matrices.mean, &mut heuristic_rng)
            .map_err(|source| SimError::Routing { vehicle: vehicle_id.clone(), source })?;

        let promised = simulate_timeline(&tour, &matrices.mean, TimelineAnchor::End(key.slot.minutes()));
        let actual = simulate_timeline(&tour, &matrices.actual, TimelineAnchor::Start(promised.start()));

        debug!(
            vehicle = %vehicle_id,
            pickups = load.len(),
            tour = %tour,
            promise_start = promised.start(),
            actual_end = actual.end(),
            "vehicle planned"
        );

        Ok(Some(Self {
            key,
            index,
            vehicle_id,
            points,
            requests: load.iter().map(|r| (*r).clone()).collect(),
            matrices,
            tour,
            promised,
            actual,
        }))
    }

    pub fn center(&self) -> GeoPoint {
        self.points[DEPOT]
    }

    /// One event per pickup, in visiting order.
    pub fn events(&self) -> Vec<Event> {
        let center_promise = self.promised.end();
        let center_actual = self.actual.end();
        self.tour
            .as_slice()
            .iter()
            .enumerate()
            .filter(|&(_, &node)| node != DEPOT)
            .map(|(pos, &node)| {
                let pickup_actual = self.actual.at(pos);
                Event {
                    key:        self.key,
                    vehicle_id: self.vehicle_id.clone(),
                    request_id: self.requests[node - 1].id.clone(),
                    node,
                    stop_seq:   pos,
                    pickup:     self.points[node],
                    center:     self.center(),
                    times: EventTimes {
                        pickup_promise: self.promised.at(pos),
                        pickup_actual,
                        center_promise,
                        center_actual,
                        ride_time: center_actual - pickup_actual,
                    },
                }
            })
            .collect()
    }

    pub fn route(&self) -> VehicleRoute {
        let last = self.tour.len() - 1;
        let stops = self
            .tour
            .as_slice()
            .iter()
            .enumerate()
            .map(|(pos, &node)| {
                let kind = match (node, pos) {
                    (DEPOT, p) if p == last => StopKind::Center,
                    (DEPOT, _) => StopKind::Depot,
                    _ => StopKind::Pickup,
                };
                Stop {
                    seq:        pos,
                    node,
                    kind,
                    location:   self.points[node],
                    request_id: (node != DEPOT).then(|| self.requests[node - 1].id.clone()),
                }
            })
            .collect();

        VehicleRoute {
            vehicle_id:      self.vehicle_id.clone(),
            key:             self.key,
            center_location: self.center(),
            tour:            self.tour.clone(),
            stops,
            promise_start:   self.promised.start(),
            promise_end:     self.promised.end(),
            actual_start:    self.actual.start(),
            actual_end:      self.actual.end(),
        }
    }
}
